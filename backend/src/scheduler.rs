// Dirty-checking scheduler state and the analytics pipeline it gates.
//
// The previous snapshot is explicit state threaded through `tick` instead of
// module-level globals, so the coalescing rules are testable without timers.

use serde::Serialize;

use lap_core::brakepoints::{brake_points, BrakePoint};
use lap_core::fuel::{fuel_projection, FuelMapRow, FuelModelConfig};
use lap_core::model::{Lap, Session};
use lap_core::peaks::{speed_peaks_and_valleys, SpeedExtremum};
use lap_core::resample::{resample_by_distance, ResampledLap};
use lap_core::selector::{select_comparison_laps, ReferenceChoice};
use lap_core::timediff::{time_diff_by_distance, TimeDiffSeries};

use crate::utils::format_lap_time;

/// Value snapshot of everything the analytics engine reads from the feed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SourceSnapshot {
    pub connected: bool,
    pub laps: Vec<Lap>,
    pub session: Session,
    pub reference_choice: ReferenceChoice,
}

/// Last-processed snapshot. Idle when it matches the feed, Dirty otherwise.
#[derive(Debug, Default)]
pub struct SchedulerState {
    last_laps: Vec<Lap>,
    last_reference_choice: ReferenceChoice,
    last_session: Option<Session>,
    last_connected: Option<bool>,
}

pub struct TickOutcome {
    /// Present exactly when the lap pipeline ran this tick.
    pub analysis: Option<AnalysisBundle>,
    pub connectivity_changed: bool,
    pub session_changed: bool,
}

/// One poll of the feed. Runs the full pipeline at most once, only when the
/// lap list value-changed (length or in-place content) or the reference
/// choice moved. This coalesces any number of feed-side updates between
/// ticks into a single recomputation; the pipeline and downstream rendering
/// dwarf the tick interval, so the backpressure is deliberate.
pub fn tick(state: &mut SchedulerState, snapshot: &SourceSnapshot) -> TickOutcome {
    let connectivity_changed = state.last_connected != Some(snapshot.connected);
    state.last_connected = Some(snapshot.connected);

    let session_changed = state.last_session.as_ref() != Some(&snapshot.session);
    state.last_session = Some(snapshot.session);

    let dirty = snapshot.laps != state.last_laps
        || snapshot.reference_choice != state.last_reference_choice;
    let analysis = if dirty {
        let bundle = run_pipeline(snapshot);
        state.last_laps = snapshot.laps.clone();
        state.last_reference_choice = snapshot.reference_choice;
        Some(bundle)
    } else {
        None
    };

    TickOutcome {
        analysis,
        connectivity_changed,
        session_changed,
    }
}

/// Everything the visualization side needs to redraw after a lap change.
/// Plain serializable values, no behavior attached.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct AnalysisBundle {
    pub last: LapView,
    pub reference: LapView,
    pub median: LapView,
    pub time_diff: TimeDiffSeries,
    pub lap_rows: Vec<LapRow>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct LapView {
    pub summary: Option<LapSummary>,
    pub data: ResampledLap,
    pub peaks: Vec<SpeedExtremum>,
    pub valleys: Vec<SpeedExtremum>,
    pub brake_points: Vec<BrakePoint>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LapSummary {
    pub number: i32,
    pub title: String,
    pub lap_time_ms: u64,
    pub manually_logged: bool,
}

/// Typed lap-table row; formatting into a widget is the UI's problem.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LapRow {
    pub number: i32,
    pub time: String,
    pub time_ms: u64,
    /// Signed gap to the session's best lap, ms.
    pub diff_ms: i64,
    pub fuel_consumed: f32,
    pub full_throttle_ticks: u32,
    pub full_brake_ticks: u32,
    pub no_throttle_ticks: u32,
    pub tire_spin_ticks: u32,
}

/// Runs resampling, extremum extraction, alignment, synthesis, and event
/// detection over the current comparison set. Degenerate input degrades to
/// empty views rather than faulting; this runs unattended on a timer.
pub fn run_pipeline(snapshot: &SourceSnapshot) -> AnalysisBundle {
    let triple = select_comparison_laps(&snapshot.laps, &snapshot.reference_choice);

    let last = lap_view(triple.last.as_ref(), true);
    let reference = lap_view(triple.reference.as_ref(), true);
    let median = lap_view(triple.median.as_ref(), false);

    // Reference supplies the distance axis; the last lap is the comparison.
    let time_diff = if reference.data.is_empty() {
        TimeDiffSeries::default()
    } else {
        time_diff_by_distance(&reference.data, &last.data)
    };

    let lap_rows = lap_rows(&snapshot.laps, snapshot.session.best_lap_ms);

    AnalysisBundle {
        last,
        reference,
        median,
        time_diff,
        lap_rows,
    }
}

fn lap_view(lap: Option<&Lap>, with_markers: bool) -> LapView {
    let Some(lap) = lap else {
        return LapView::default();
    };

    let data = resample_by_distance(lap);
    let (peaks, valleys) = if with_markers {
        speed_peaks_and_valleys(&data)
    } else {
        (Vec::new(), Vec::new())
    };
    let brake_points = if with_markers {
        brake_points(lap)
    } else {
        Vec::new()
    };

    LapView {
        summary: Some(LapSummary {
            number: lap.number,
            title: lap.title.clone(),
            lap_time_ms: lap.lap_time_ms,
            manually_logged: lap.manually_logged,
        }),
        data,
        peaks,
        valleys,
        brake_points,
    }
}

pub fn lap_rows(laps: &[Lap], best_lap_ms: Option<u64>) -> Vec<LapRow> {
    laps.iter()
        .map(|lap| LapRow {
            number: lap.number,
            time: format_lap_time(lap.lap_time_ms),
            time_ms: lap.lap_time_ms,
            diff_ms: best_lap_ms
                .map(|best| lap.lap_time_ms as i64 - best as i64)
                .unwrap_or(0),
            fuel_consumed: lap.fuel_consumed(),
            full_throttle_ticks: lap.full_throttle_ticks,
            full_brake_ticks: lap.full_brake_ticks,
            no_throttle_ticks: lap.no_throttle_ticks,
            tire_spin_ticks: lap.tire_spin_ticks,
        })
        .collect()
}

/// Dirty state for the slower fuel-map poll: recompute only when the newest
/// lap itself changed.
#[derive(Debug, Default)]
pub struct FuelMapState {
    last_lap: Option<Lap>,
}

pub fn fuel_tick(
    state: &mut FuelMapState,
    laps: &[Lap],
    config: &FuelModelConfig,
) -> Option<Vec<FuelMapRow>> {
    let newest = laps.first()?;
    if state.last_lap.as_ref() == Some(newest) {
        return None;
    }
    state.last_lap = Some(newest.clone());
    Some(fuel_projection(newest, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lap_core::model::Sample;

    fn lap(number: i32, lap_time_ms: u64) -> Lap {
        let samples = (0..10)
            .map(|i| Sample {
                distance_m: i as f32 * 50.0,
                speed_kph: 100.0 + (i % 4) as f32 * 20.0,
                elapsed_ms: i as u32 * (lap_time_ms as u32 / 10),
                ..Default::default()
            })
            .collect();
        Lap {
            number,
            lap_time_ms,
            samples,
            ..Default::default()
        }
    }

    fn snapshot_with(laps: Vec<Lap>) -> SourceSnapshot {
        SourceSnapshot {
            connected: true,
            laps,
            ..Default::default()
        }
    }

    #[test]
    fn unchanged_feed_runs_the_pipeline_at_most_once() {
        let mut state = SchedulerState::default();
        let snapshot = snapshot_with(vec![lap(1, 90_000)]);

        let mut pipeline_runs = 0;
        for _ in 0..10 {
            if tick(&mut state, &snapshot).analysis.is_some() {
                pipeline_runs += 1;
            }
        }
        assert_eq!(pipeline_runs, 1);
    }

    #[test]
    fn new_lap_marks_dirty() {
        let mut state = SchedulerState::default();

        let first = snapshot_with(vec![lap(1, 90_000)]);
        assert!(tick(&mut state, &first).analysis.is_some());

        let second = snapshot_with(vec![lap(2, 89_000), lap(1, 90_000)]);
        assert!(tick(&mut state, &second).analysis.is_some());
        assert!(tick(&mut state, &second).analysis.is_none());
    }

    #[test]
    fn in_place_mutation_is_detected() {
        let mut state = SchedulerState::default();

        let mut snapshot = snapshot_with(vec![lap(1, 90_000)]);
        assert!(tick(&mut state, &snapshot).analysis.is_some());

        // Same length, same lap number; only content changed (manual log).
        snapshot.laps[0].manually_logged = true;
        assert!(tick(&mut state, &snapshot).analysis.is_some());
    }

    #[test]
    fn reference_choice_change_marks_dirty() {
        let mut state = SchedulerState::default();

        let mut snapshot = snapshot_with(vec![lap(2, 89_000), lap(1, 90_000)]);
        assert!(tick(&mut state, &snapshot).analysis.is_some());

        snapshot.reference_choice = ReferenceChoice::Explicit { lap_number: 1 };
        let outcome = tick(&mut state, &snapshot);
        let analysis = outcome.analysis.expect("reference change reruns pipeline");
        assert_eq!(analysis.reference.summary.as_ref().unwrap().number, 1);
    }

    #[test]
    fn connectivity_and_session_flags_fire_on_change_only() {
        let mut state = SchedulerState::default();
        let mut snapshot = snapshot_with(Vec::new());

        let first = tick(&mut state, &snapshot);
        assert!(first.connectivity_changed);
        assert!(first.session_changed);
        assert!(first.analysis.is_none());

        let second = tick(&mut state, &snapshot);
        assert!(!second.connectivity_changed);
        assert!(!second.session_changed);

        snapshot.connected = false;
        snapshot.session.max_speed_kph = 280.0;
        let third = tick(&mut state, &snapshot);
        assert!(third.connectivity_changed);
        assert!(third.session_changed);
        assert!(third.analysis.is_none());
    }

    #[test]
    fn pipeline_fills_views_and_rows() {
        let snapshot = SourceSnapshot {
            connected: true,
            laps: vec![lap(2, 89_000), lap(1, 90_000)],
            session: Session {
                best_lap_ms: Some(89_000),
                ..Default::default()
            },
            reference_choice: ReferenceChoice::Unset,
        };
        let bundle = run_pipeline(&snapshot);

        assert_eq!(bundle.last.summary.as_ref().unwrap().number, 2);
        assert_eq!(bundle.reference.summary.as_ref().unwrap().number, 2);
        assert!(bundle.median.summary.is_some());
        assert!(bundle.median.peaks.is_empty());
        assert_eq!(bundle.time_diff.points.len(), bundle.reference.data.len());

        assert_eq!(bundle.lap_rows.len(), 2);
        assert_eq!(bundle.lap_rows[0].diff_ms, 0);
        assert_eq!(bundle.lap_rows[1].diff_ms, 1_000);
    }

    #[test]
    fn empty_feed_degrades_to_empty_bundle() {
        let bundle = run_pipeline(&snapshot_with(Vec::new()));
        assert!(bundle.last.summary.is_none());
        assert!(bundle.last.data.is_empty());
        assert!(bundle.time_diff.points.is_empty());
        assert!(bundle.lap_rows.is_empty());
    }

    #[test]
    fn fuel_tick_recomputes_only_for_a_new_newest_lap() {
        let mut state = FuelMapState::default();
        let config = FuelModelConfig::default();

        assert!(fuel_tick(&mut state, &[], &config).is_none());

        let laps = vec![lap(1, 90_000)];
        assert!(fuel_tick(&mut state, &laps, &config).is_some());
        assert!(fuel_tick(&mut state, &laps, &config).is_none());

        let laps = vec![lap(2, 89_000), lap(1, 90_000)];
        assert!(fuel_tick(&mut state, &laps, &config).is_some());
    }
}
