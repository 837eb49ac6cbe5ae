// Shared constants for server timing, protocol, and paths.

pub const SCHEMA_VERSION: &str = "1.0";
/// Fast poll driving lap/table/graph refresh. One real update per lap, but
/// the feed is checked every second for anything that happened.
pub const LAP_TICK_MS: u64 = 1_000;
/// Slow poll driving fuel-map refresh.
pub const FUEL_TICK_MS: u64 = 5_000;
pub const DATA_DIR: &str = "data";
pub const LAP_FILE_PREFIX: &str = "laps_";
pub const LAP_FILE_EXT: &str = "json";
