// A completed circuit: ordered samples plus summary metadata.

use serde::{Deserialize, Serialize};

use super::Sample;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Lap {
    pub number: i32,
    pub title: String,
    pub lap_time_ms: u64,
    pub fuel_at_start: f32,
    pub fuel_at_end: f32,
    pub full_throttle_ticks: u32,
    pub full_brake_ticks: u32,
    pub no_throttle_ticks: u32,
    pub tire_spin_ticks: u32,
    pub manually_logged: bool,
    pub samples: Vec<Sample>,
}

impl Lap {
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn fuel_consumed(&self) -> f32 {
        self.fuel_at_start - self.fuel_at_end
    }
}
