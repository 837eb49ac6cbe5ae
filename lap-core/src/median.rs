// Synthetic baseline lap built from per-distance-bucket medians.

use std::collections::BTreeMap;

use crate::model::{Lap, Sample};
use crate::resample::resample_by_distance;

/// Distance bucket width used to line up samples across laps, meters.
const BUCKET_M: f32 = 1.0;

#[derive(Default)]
struct Bucket {
    speed_kph: Vec<f32>,
    throttle_pct: Vec<f32>,
    brake_pct: Vec<f32>,
    pos_x: Vec<f32>,
    pos_z: Vec<f32>,
    fuel_level: Vec<f32>,
    elapsed_ms: Vec<f32>,
}

/// Builds one synthetic lap whose fields at every distance bucket are the
/// statistical median across all laps covering that bucket. Buckets with no
/// contributing lap are omitted, never interpolated. Zero input laps yield
/// the canonical empty placeholder lap.
pub fn median_lap(laps: &[Lap]) -> Lap {
    if laps.is_empty() {
        return Lap::default();
    }

    let mut buckets: BTreeMap<i64, Bucket> = BTreeMap::new();
    for lap in laps {
        let resampled = resample_by_distance(lap);
        let mut last_key: Option<i64> = None;
        for i in 0..resampled.len() {
            let key = (resampled.distance_m[i] / BUCKET_M).round() as i64;
            // One contribution per lap per bucket; the first row wins.
            if last_key == Some(key) {
                continue;
            }
            last_key = Some(key);

            let bucket = buckets.entry(key).or_default();
            bucket.speed_kph.push(resampled.speed_kph[i]);
            bucket.throttle_pct.push(resampled.throttle_pct[i]);
            bucket.brake_pct.push(resampled.brake_pct[i]);
            bucket.pos_x.push(resampled.pos_x[i]);
            bucket.pos_z.push(resampled.pos_z[i]);
            bucket.fuel_level.push(resampled.fuel_level[i]);
            bucket.elapsed_ms.push(resampled.elapsed_ms[i] as f32);
        }
    }

    let samples = buckets
        .into_iter()
        .map(|(key, mut bucket)| Sample {
            distance_m: key as f32 * BUCKET_M,
            speed_kph: median(&mut bucket.speed_kph),
            throttle_pct: median(&mut bucket.throttle_pct),
            brake_pct: median(&mut bucket.brake_pct),
            pos_x: median(&mut bucket.pos_x),
            pos_z: median(&mut bucket.pos_z),
            fuel_level: median(&mut bucket.fuel_level),
            elapsed_ms: median(&mut bucket.elapsed_ms).round() as u32,
        })
        .collect();

    let mut lap_times: Vec<f32> = laps.iter().map(|lap| lap.lap_time_ms as f32).collect();

    Lap {
        number: 0,
        title: "Median Lap".to_string(),
        lap_time_ms: median(&mut lap_times).round() as u64,
        samples,
        ..Default::default()
    }
}

/// Median with the usual even-count convention: mean of the two middle values.
fn median(values: &mut [f32]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    values.sort_by(|a, b| a.total_cmp(b));
    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        values[mid]
    } else {
        (values[mid - 1] + values[mid]) / 2.0
    }
}
