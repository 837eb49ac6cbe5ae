// One telemetry record, immutable once captured.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Distance traveled since the lap started, meters.
    pub distance_m: f32,
    pub speed_kph: f32,
    pub throttle_pct: f32,
    pub brake_pct: f32,
    pub pos_x: f32,
    pub pos_z: f32,
    pub fuel_level: f32,
    /// Time since the lap started at capture, milliseconds.
    pub elapsed_ms: u32,
}

impl Sample {
    /// Coasting share: neither throttle nor brake applied.
    pub fn coast_pct(&self) -> f32 {
        (100.0 - self.throttle_pct - self.brake_pct).max(0.0)
    }
}
