// HTTP request and response payload types.

use serde::{Deserialize, Serialize};

use lap_core::fuel::FuelMapRow;
use lap_core::selector::ReferenceChoice;

use crate::scheduler::{LapRow, LapSummary};

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Serialize)]
pub struct LapListResponse {
    pub count: usize,
    pub rows: Vec<LapRow>,
    pub reference_choice: ReferenceChoice,
}

#[derive(Serialize)]
pub struct ResetResponse {
    pub status: &'static str,
}

#[derive(Serialize)]
pub struct FinishLapResponse {
    pub logged: bool,
    pub lap: Option<LapSummary>,
}

#[derive(Serialize)]
pub struct ReferenceResponse {
    pub reference_choice: ReferenceChoice,
}

#[derive(Serialize)]
pub struct FuelMapResponse {
    pub rows: Vec<FuelMapRow>,
    pub fuel_remaining: f32,
}

#[derive(Serialize)]
pub struct LapFilesResponse {
    pub files: Vec<String>,
}

#[derive(Serialize)]
pub struct SaveLapsResponse {
    pub path: String,
    pub count: usize,
}

#[derive(Deserialize)]
pub struct LoadLapsRequest {
    pub path: String,
    #[serde(default)]
    pub replace_others: bool,
}

#[derive(Serialize)]
pub struct LoadLapsResponse {
    pub count: usize,
}
