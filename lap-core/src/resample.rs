// Projects a lap's time-ordered samples onto a strictly increasing distance grid.

use serde::Serialize;

use crate::model::Lap;

/// A lap keyed by distance instead of time. Parallel vectors, one row per
/// distinct distance value.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ResampledLap {
    pub distance_m: Vec<f32>,
    pub speed_kph: Vec<f32>,
    pub throttle_pct: Vec<f32>,
    pub brake_pct: Vec<f32>,
    pub coast_pct: Vec<f32>,
    pub elapsed_ms: Vec<f64>,
    pub pos_x: Vec<f32>,
    pub pos_z: Vec<f32>,
    pub fuel_level: Vec<f32>,
}

impl ResampledLap {
    pub fn len(&self) -> usize {
        self.distance_m.len()
    }

    pub fn is_empty(&self) -> bool {
        self.distance_m.is_empty()
    }
}

/// Sensor jitter and standing starts repeat distance values; the first sample
/// per distinct distance wins and later duplicates are dropped, so the output
/// keys are strictly increasing. An empty lap yields an empty grid, which is
/// also the placeholder when no real lap is selected.
pub fn resample_by_distance(lap: &Lap) -> ResampledLap {
    let mut out = ResampledLap::default();
    let mut last_distance: Option<f32> = None;

    for sample in &lap.samples {
        if let Some(last) = last_distance {
            if sample.distance_m <= last {
                continue;
            }
        }
        last_distance = Some(sample.distance_m);

        out.distance_m.push(sample.distance_m);
        out.speed_kph.push(sample.speed_kph);
        out.throttle_pct.push(sample.throttle_pct);
        out.brake_pct.push(sample.brake_pct);
        out.coast_pct.push(sample.coast_pct());
        out.elapsed_ms.push(sample.elapsed_ms as f64);
        out.pos_x.push(sample.pos_x);
        out.pos_z.push(sample.pos_z);
        out.fuel_level.push(sample.fuel_level);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Sample;

    fn lap_with_distances(distances: &[f32]) -> Lap {
        let samples = distances
            .iter()
            .enumerate()
            .map(|(i, d)| Sample {
                distance_m: *d,
                elapsed_ms: (i * 16) as u32,
                ..Default::default()
            })
            .collect();
        Lap {
            samples,
            ..Default::default()
        }
    }

    #[test]
    fn drops_repeated_distances_keeping_first() {
        let lap = lap_with_distances(&[0.0, 0.0, 0.0, 1.5, 1.5, 3.0]);
        let resampled = resample_by_distance(&lap);

        assert_eq!(resampled.distance_m, vec![0.0, 1.5, 3.0]);
        // First sample at each distance wins.
        assert_eq!(resampled.elapsed_ms, vec![0.0, 48.0, 80.0]);
    }

    #[test]
    fn keys_strictly_increasing_and_no_longer_than_input() {
        let lap = lap_with_distances(&[0.0, 2.0, 2.0, 1.0, 4.0, 4.0, 9.0]);
        let resampled = resample_by_distance(&lap);

        assert!(resampled.len() <= lap.samples.len());
        for pair in resampled.distance_m.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn empty_lap_yields_empty_grid() {
        let resampled = resample_by_distance(&Lap::default());
        assert!(resampled.is_empty());
        assert_eq!(resampled.len(), 0);
    }
}
