// Background polling tasks driving the analytics pipeline and fuel map.

use std::sync::atomic::AtomicU64;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, RwLock};
use tokio::time::{self, Instant};
use tracing::info;

use lap_core::fuel::FuelModelConfig;

use crate::constants::{FUEL_TICK_MS, LAP_TICK_MS, SCHEMA_VERSION};
use crate::feed::FeedStore;
use crate::scheduler::{self, FuelMapState, SchedulerState};
use crate::utils::{monotonic_ms, next_sequence, now_epoch_ms};
use crate::ws::{AnalysisUpdateMessage, ConnectivityMessage, FuelMapMessage, SessionUpdateMessage};

/// Fast tick: poll the feed, rerun the pipeline when its value changed, and
/// broadcast the results. Pipeline runs never overlap; everything that
/// happened between two ticks collapses into one recomputation.
pub async fn lap_update_task(
    feed: Arc<RwLock<FeedStore>>,
    tx: broadcast::Sender<String>,
    sequence: Arc<AtomicU64>,
    start: Instant,
) {
    let mut interval = time::interval(Duration::from_millis(LAP_TICK_MS));
    let mut state = SchedulerState::default();

    loop {
        interval.tick().await;
        let snapshot = { feed.read().await.snapshot() };
        let outcome = scheduler::tick(&mut state, &snapshot);

        if outcome.connectivity_changed {
            let message = ConnectivityMessage {
                schema_version: SCHEMA_VERSION,
                timestamp_ms: now_epoch_ms(),
                monotonic_ms: monotonic_ms(start),
                sequence: next_sequence(sequence.as_ref()),
                message_type: "connectivity",
                connected: snapshot.connected,
            };
            if let Ok(payload) = serde_json::to_string(&message) {
                let _ = tx.send(payload);
            }
        }

        if outcome.session_changed {
            let message = SessionUpdateMessage {
                schema_version: SCHEMA_VERSION,
                timestamp_ms: now_epoch_ms(),
                monotonic_ms: monotonic_ms(start),
                sequence: next_sequence(sequence.as_ref()),
                message_type: "session_update",
                session: snapshot.session,
            };
            if let Ok(payload) = serde_json::to_string(&message) {
                let _ = tx.send(payload);
            }
        }

        if let Some(analysis) = outcome.analysis {
            info!(laps = snapshot.laps.len(), "lap data changed, pipeline ran");
            let message = AnalysisUpdateMessage {
                schema_version: SCHEMA_VERSION,
                timestamp_ms: now_epoch_ms(),
                monotonic_ms: monotonic_ms(start),
                sequence: next_sequence(sequence.as_ref()),
                message_type: "analysis_update",
                analysis,
            };
            if let Ok(payload) = serde_json::to_string(&message) {
                let _ = tx.send(payload);
            }
        }
    }
}

/// Slow tick: project fuel consumption across mixture settings whenever a
/// new lap has landed since the last projection.
pub async fn fuel_map_task(
    feed: Arc<RwLock<FeedStore>>,
    tx: broadcast::Sender<String>,
    sequence: Arc<AtomicU64>,
    start: Instant,
    fuel_config: FuelModelConfig,
) {
    let mut interval = time::interval(Duration::from_millis(FUEL_TICK_MS));
    let mut state = FuelMapState::default();

    loop {
        interval.tick().await;
        let (laps, fuel_remaining) = {
            let feed = feed.read().await;
            let fuel = feed.laps().first().map(|lap| lap.fuel_at_end).unwrap_or(0.0);
            (feed.laps().to_vec(), fuel)
        };

        if let Some(rows) = scheduler::fuel_tick(&mut state, &laps, &fuel_config) {
            info!(settings = rows.len(), "fuel map recomputed");
            let message = FuelMapMessage {
                schema_version: SCHEMA_VERSION,
                timestamp_ms: now_epoch_ms(),
                monotonic_ms: monotonic_ms(start),
                sequence: next_sequence(sequence.as_ref()),
                message_type: "fuel_map",
                rows,
                fuel_remaining,
            };
            if let Ok(payload) = serde_json::to_string(&message) {
                let _ = tx.send(payload);
            }
        }
    }
}
