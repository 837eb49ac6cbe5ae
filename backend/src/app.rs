// Application state shared by tasks and HTTP handlers.

use std::path::PathBuf;
use std::sync::atomic::AtomicU64;
use std::sync::Arc;

use tokio::sync::{broadcast, RwLock};
use tokio::time::Instant;

use lap_core::fuel::FuelModelConfig;

use crate::feed::FeedStore;

#[derive(Clone)]
pub struct AppState {
    /// Serialized analytics messages fanned out to WebSocket clients.
    pub tx: broadcast::Sender<String>,
    pub sequence: Arc<AtomicU64>,
    pub start_instant: Instant,
    pub feed: Arc<RwLock<FeedStore>>,
    pub fuel_config: FuelModelConfig,
    pub data_dir: PathBuf,
}
