// Live session aggregate owned by the ingestion side, read-only here.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub best_lap_ms: Option<u64>,
    pub max_speed_kph: f32,
    pub min_body_height_mm: f32,
}
