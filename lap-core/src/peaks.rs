// Local speed maxima and minima along the speed-vs-distance curve.

use serde::Serialize;

use crate::resample::ResampledLap;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SpeedExtremum {
    pub speed_kph: f32,
    pub distance_m: f32,
}

/// Extracts speed peaks and valleys, both ordered by ascending distance.
///
/// Runs of equal consecutive speeds are collapsed to their first point before
/// evaluating sign changes, so a plateau counts as a single candidate. A peak
/// is a sign flip of the consecutive difference from non-negative to negative,
/// a valley the flip from non-positive to positive. Constant speed or fewer
/// than 3 distinct points yields two empty vectors.
pub fn speed_peaks_and_valleys(lap: &ResampledLap) -> (Vec<SpeedExtremum>, Vec<SpeedExtremum>) {
    let mut collapsed: Vec<(f32, f32)> = Vec::with_capacity(lap.len());
    for (speed, distance) in lap.speed_kph.iter().zip(lap.distance_m.iter()) {
        match collapsed.last() {
            Some((last_speed, _)) if *last_speed == *speed => {}
            _ => collapsed.push((*speed, *distance)),
        }
    }

    let mut peaks = Vec::new();
    let mut valleys = Vec::new();
    if collapsed.len() < 3 {
        return (peaks, valleys);
    }

    for i in 1..collapsed.len() - 1 {
        let before = collapsed[i].0 - collapsed[i - 1].0;
        let after = collapsed[i + 1].0 - collapsed[i].0;
        let point = SpeedExtremum {
            speed_kph: collapsed[i].0,
            distance_m: collapsed[i].1,
        };
        if before >= 0.0 && after < 0.0 {
            peaks.push(point);
        } else if before <= 0.0 && after > 0.0 {
            valleys.push(point);
        }
    }

    (peaks, valleys)
}
