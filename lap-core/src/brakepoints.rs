// Brake-engagement transitions along the 2-D race line.

use serde::Serialize;

use crate::model::Lap;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct BrakePoint {
    pub x: f32,
    pub z: f32,
}

/// Positions where brake input transitions from 0% to non-zero. One point per
/// continuous braking interval; the detector re-arms only once brake returns
/// to 0%. A lap with no samples or no braking yields an empty sequence.
pub fn brake_points(lap: &Lap) -> Vec<BrakePoint> {
    let mut points = Vec::new();
    for pair in lap.samples.windows(2) {
        if pair[0].brake_pct == 0.0 && pair[1].brake_pct > 0.0 {
            points.push(BrakePoint {
                x: pair[1].pos_x,
                z: pair[1].pos_z,
            });
        }
    }
    points
}
