// Cumulative elapsed-time delta between two laps at every reference distance.

use serde::Serialize;

use crate::resample::ResampledLap;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct TimeDiffPoint {
    pub distance_m: f32,
    /// Positive when the comparison lap is slower at this distance.
    pub delta_ms: f64,
    pub reference_ms: f64,
    pub comparison_ms: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct TimeDiffSeries {
    pub points: Vec<TimeDiffPoint>,
}

/// Computes `comparison_elapsed(d) - reference_elapsed(d)` at every distance
/// in the reference lap's grid. The comparison lap's elapsed time is linearly
/// interpolated between its bracketing samples; lookups outside its covered
/// range clamp to the nearest known elapsed time instead of extrapolating.
/// Either lap empty yields an empty series.
///
/// This runs on every dirty tick against live data, so it has to tolerate
/// laps of different length and sample density without producing NaN or inf.
pub fn time_diff_by_distance(
    reference: &ResampledLap,
    comparison: &ResampledLap,
) -> TimeDiffSeries {
    if reference.is_empty() || comparison.is_empty() {
        return TimeDiffSeries::default();
    }

    let mut points = Vec::with_capacity(reference.len());
    for (distance, reference_ms) in reference
        .distance_m
        .iter()
        .zip(reference.elapsed_ms.iter())
    {
        let comparison_ms =
            elapsed_at_distance(&comparison.distance_m, &comparison.elapsed_ms, *distance);
        points.push(TimeDiffPoint {
            distance_m: *distance,
            delta_ms: comparison_ms - reference_ms,
            reference_ms: *reference_ms,
            comparison_ms,
        });
    }

    TimeDiffSeries { points }
}

/// Linear interpolation over strictly increasing distances, clamped at both
/// ends.
fn elapsed_at_distance(distances: &[f32], elapsed: &[f64], at: f32) -> f64 {
    debug_assert_eq!(distances.len(), elapsed.len());

    let upper = distances.partition_point(|d| *d < at);
    if upper == 0 {
        return elapsed[0];
    }
    if upper == distances.len() {
        return elapsed[elapsed.len() - 1];
    }

    let (d0, d1) = (distances[upper - 1], distances[upper]);
    let (t0, t1) = (elapsed[upper - 1], elapsed[upper]);
    let span = (d1 - d0) as f64;
    if span <= 0.0 {
        return t0;
    }
    t0 + (t1 - t0) * ((at - d0) as f64 / span)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Lap, Sample};
    use crate::resample::resample_by_distance;

    fn lap_from_pairs(pairs: &[(f32, u32)]) -> ResampledLap {
        let samples = pairs
            .iter()
            .map(|(d, t)| Sample {
                distance_m: *d,
                elapsed_ms: *t,
                ..Default::default()
            })
            .collect();
        resample_by_distance(&Lap {
            samples,
            ..Default::default()
        })
    }

    #[test]
    fn identical_laps_give_all_zero_series() {
        let lap = lap_from_pairs(&[(0.0, 0), (100.0, 5_000), (200.0, 11_000), (300.0, 18_000)]);
        let series = time_diff_by_distance(&lap, &lap);

        assert_eq!(series.points.len(), lap.len());
        for point in &series.points {
            assert_eq!(point.delta_ms, 0.0);
        }
    }

    #[test]
    fn interpolates_between_comparison_samples() {
        let reference = lap_from_pairs(&[(0.0, 0), (50.0, 2_000), (100.0, 4_000)]);
        // Comparison sampled half as densely, uniformly 1000 ms slower per 100 m.
        let comparison = lap_from_pairs(&[(0.0, 0), (100.0, 5_000)]);

        let series = time_diff_by_distance(&reference, &comparison);
        assert_eq!(series.points.len(), 3);
        assert_eq!(series.points[1].comparison_ms, 2_500.0);
        assert_eq!(series.points[1].delta_ms, 500.0);
    }

    #[test]
    fn clamps_beyond_comparison_coverage() {
        let reference = lap_from_pairs(&[(0.0, 0), (100.0, 4_000), (400.0, 16_000)]);
        let comparison = lap_from_pairs(&[(0.0, 0), (200.0, 9_000)]);

        let series = time_diff_by_distance(&reference, &comparison);
        let last = series.points.last().unwrap();
        // 400 m is past the comparison lap's final sample at 200 m.
        assert_eq!(last.comparison_ms, 9_000.0);
        assert!(last.delta_ms.is_finite());
    }

    #[test]
    fn empty_lap_gives_empty_series() {
        let lap = lap_from_pairs(&[(0.0, 0), (100.0, 4_000)]);
        let empty = ResampledLap::default();

        assert!(time_diff_by_distance(&empty, &lap).points.is_empty());
        assert!(time_diff_by_distance(&lap, &empty).points.is_empty());
    }

    #[test]
    fn series_length_matches_reference_grid() {
        let reference = lap_from_pairs(&[(0.0, 0), (10.0, 400), (20.0, 900), (30.0, 1_500)]);
        let comparison = lap_from_pairs(&[(0.0, 0), (30.0, 1_200)]);
        let series = time_diff_by_distance(&reference, &comparison);
        assert_eq!(series.points.len(), reference.len());
    }
}
