// Lapboard analytics server entry point.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::atomic::AtomicU64;
use std::sync::Arc;

use tokio::sync::{broadcast, RwLock};
use tokio::time::Instant;
use tracing::{error, info, warn};

use lap_core::fuel::FuelModelConfig;

use lapboard_server::app::AppState;
use lapboard_server::constants::DATA_DIR;
use lapboard_server::feed::{FeedStore, IngestConfig};
use lapboard_server::http;
use lapboard_server::lapfile;
use lapboard_server::tasks;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    // The ingestion collaborator is the one hard startup requirement;
    // report the misconfiguration once and stop.
    let ingest = match IngestConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!(%err, "ingestion endpoint not configured");
            std::process::exit(1);
        }
    };

    let bind = env::var("HTTP_BIND").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = env::var("HTTP_PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(9955);
    let addr: SocketAddr = format!("{}:{}", bind, port)
        .parse()
        .expect("invalid HTTP_BIND or HTTP_PORT");

    let data_dir = env::var("LAPBOARD_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DATA_DIR));

    let feed = Arc::new(RwLock::new(FeedStore::new()));

    if let Ok(path) = env::var("LAPBOARD_LOAD_LAPS") {
        let path = PathBuf::from(path);
        match lapfile::load_laps(&path).await {
            Ok(laps) => {
                info!(count = laps.len(), path = %path.display(), "laps preloaded");
                feed.write().await.load_laps(laps, true);
            }
            Err(err) => {
                warn!(?err, path = %path.display(), "failed to preload laps");
            }
        }
    }

    let (tx, _) = broadcast::channel::<String>(256);
    let sequence = Arc::new(AtomicU64::new(0));
    let fuel_config = FuelModelConfig::default();
    let start_instant = Instant::now();

    info!(playstation_ip = %ingest.playstation_ip, "expecting telemetry feed");

    let lap_feed = feed.clone();
    let lap_tx = tx.clone();
    let lap_seq = sequence.clone();
    let lap_start = start_instant;
    tokio::spawn(async move {
        tasks::lap_update_task(lap_feed, lap_tx, lap_seq, lap_start).await;
    });

    let fuel_feed = feed.clone();
    let fuel_tx = tx.clone();
    let fuel_seq = sequence.clone();
    let fuel_start = start_instant;
    let fuel_task_config = fuel_config.clone();
    tokio::spawn(async move {
        tasks::fuel_map_task(fuel_feed, fuel_tx, fuel_seq, fuel_start, fuel_task_config).await;
    });

    let app_state = AppState {
        tx,
        sequence,
        start_instant,
        feed,
        fuel_config,
        data_dir,
    };

    let app = http::router(app_state);

    info!(%addr, "starting server");
    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await
        .expect("server failed");
}
