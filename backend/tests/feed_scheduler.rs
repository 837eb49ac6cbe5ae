// Feed-to-scheduler flow: snapshots, coalescing, and degraded results.

use lap_core::model::{Lap, Sample, Session};
use lap_core::selector::ReferenceChoice;
use lapboard_server::feed::FeedStore;
use lapboard_server::scheduler::{tick, SchedulerState};

fn lap(number: i32, lap_time_ms: u64) -> Lap {
    let samples = (0..20)
        .map(|i| Sample {
            distance_m: i as f32 * 25.0,
            speed_kph: 90.0 + (i % 5) as f32 * 15.0,
            elapsed_ms: i as u32 * (lap_time_ms as u32 / 20),
            brake_pct: if i % 7 == 0 { 60.0 } else { 0.0 },
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

#[test]
fn idle_ticks_between_laps_do_not_recompute() {
    let mut feed = FeedStore::new();
    let mut state = SchedulerState::default();

    feed.set_connected(true);
    feed.publish_lap(lap(1, 92_000));

    let mut pipeline_runs = 0;
    for _ in 0..5 {
        let snapshot = feed.snapshot();
        if tick(&mut state, &snapshot).analysis.is_some() {
            pipeline_runs += 1;
        }
    }
    assert_eq!(pipeline_runs, 1);

    // Several feed-side updates between two polls coalesce into one run.
    feed.publish_lap(lap(2, 91_000));
    feed.publish_lap(lap(3, 90_500));
    feed.update_session(Session {
        best_lap_ms: Some(90_500),
        ..Default::default()
    });

    let outcome = tick(&mut state, &feed.snapshot());
    let analysis = outcome.analysis.expect("one run for all queued changes");
    assert!(outcome.session_changed);
    assert_eq!(analysis.lap_rows.len(), 3);
    assert!(tick(&mut state, &feed.snapshot()).analysis.is_none());
}

#[test]
fn reference_selection_flows_through_to_the_bundle() {
    let mut feed = FeedStore::new();
    let mut state = SchedulerState::default();

    feed.publish_lap(lap(1, 92_000));
    feed.publish_lap(lap(2, 90_000));
    assert!(tick(&mut state, &feed.snapshot()).analysis.is_some());

    feed.set_reference_choice(ReferenceChoice::Explicit { lap_number: 1 });
    let analysis = tick(&mut state, &feed.snapshot())
        .analysis
        .expect("selection change is dirty");
    assert_eq!(analysis.reference.summary.as_ref().unwrap().number, 1);
    assert_eq!(
        analysis.time_diff.points.len(),
        analysis.reference.data.len()
    );
}

#[test]
fn reset_degrades_views_without_faulting() {
    let mut feed = FeedStore::new();
    let mut state = SchedulerState::default();

    feed.publish_lap(lap(1, 92_000));
    feed.publish_lap(lap(2, 90_000));
    assert!(tick(&mut state, &feed.snapshot()).analysis.is_some());

    feed.reset();
    let analysis = tick(&mut state, &feed.snapshot())
        .analysis
        .expect("clearing the list is a value change");
    assert!(analysis.last.summary.is_none());
    assert!(analysis.time_diff.points.is_empty());
    assert!(analysis.lap_rows.is_empty());
}

#[test]
fn manual_lap_log_is_detected_in_place() {
    let mut feed = FeedStore::new();
    let mut state = SchedulerState::default();

    feed.publish_lap(lap(1, 92_000));
    assert!(tick(&mut state, &feed.snapshot()).analysis.is_some());

    // A manually logged lap lands at the head like any other.
    for i in 0..10 {
        feed.push_sample(Sample {
            distance_m: i as f32 * 10.0,
            elapsed_ms: i * 500,
            ..Default::default()
        });
    }
    feed.finish_lap(true);

    let analysis = tick(&mut state, &feed.snapshot())
        .analysis
        .expect("manual log is a lap-list change");
    assert!(analysis.last.summary.as_ref().unwrap().manually_logged);
}
