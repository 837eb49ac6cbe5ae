// HTTP handlers and routing.

use std::path::PathBuf;

use axum::extract::State as AxumState;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use tracing::{info, warn};

use lap_core::fuel::fuel_projection;
use lap_core::selector::ReferenceChoice;

use crate::app::AppState;
use crate::lapfile;
use crate::scheduler::{lap_rows, LapSummary};
use crate::ws::ws_handler;

mod types;
use types::*;

pub fn router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/laps", get(get_laps))
        .route("/api/laps/reset", axum::routing::post(reset_laps))
        .route("/api/laps/finish", axum::routing::post(finish_lap))
        .route(
            "/api/laps/reference",
            get(get_reference).post(set_reference),
        )
        .route("/api/fuelmap", get(get_fuel_map))
        .route("/api/laps/files", get(get_lap_files))
        .route("/api/laps/save", axum::routing::post(save_laps))
        .route("/api/laps/load", axum::routing::post(load_laps))
        .route("/ws", get(ws_handler))
        .with_state(app_state)
}

async fn health() -> impl IntoResponse {
    Json(HealthResponse { status: "ok" })
}

async fn get_laps(AxumState(app_state): AxumState<AppState>) -> impl IntoResponse {
    let feed = app_state.feed.read().await;
    Json(LapListResponse {
        count: feed.laps().len(),
        rows: lap_rows(feed.laps(), feed.session().best_lap_ms),
        reference_choice: feed.reference_choice(),
    })
}

async fn reset_laps(AxumState(app_state): AxumState<AppState>) -> impl IntoResponse {
    app_state.feed.write().await.reset();
    info!("lap list reset");
    Json(ResetResponse { status: "reset" })
}

/// Manual lap boundary, the "Log Lap Now" button.
async fn finish_lap(AxumState(app_state): AxumState<AppState>) -> impl IntoResponse {
    let lap = app_state.feed.write().await.finish_lap(true);
    match &lap {
        Some(lap) => info!(number = lap.number, time = %lap.title, "lap logged manually"),
        None => info!("manual lap log requested with no samples"),
    }
    Json(FinishLapResponse {
        logged: lap.is_some(),
        lap: lap.map(|lap| LapSummary {
            number: lap.number,
            title: lap.title.clone(),
            lap_time_ms: lap.lap_time_ms,
            manually_logged: lap.manually_logged,
        }),
    })
}

async fn get_reference(AxumState(app_state): AxumState<AppState>) -> impl IntoResponse {
    let choice = app_state.feed.read().await.reference_choice();
    Json(ReferenceResponse {
        reference_choice: choice,
    })
}

async fn set_reference(
    AxumState(app_state): AxumState<AppState>,
    Json(choice): Json<ReferenceChoice>,
) -> impl IntoResponse {
    info!(?choice, "reference selection changed");
    app_state.feed.write().await.set_reference_choice(choice);
    Json(ReferenceResponse {
        reference_choice: choice,
    })
}

/// On-demand fuel projection for the newest lap; the slow broadcast tick is
/// the usual delivery path.
async fn get_fuel_map(AxumState(app_state): AxumState<AppState>) -> impl IntoResponse {
    let feed = app_state.feed.read().await;
    let (rows, fuel_remaining) = match feed.laps().first() {
        Some(lap) => (
            fuel_projection(lap, &app_state.fuel_config),
            lap.fuel_at_end,
        ),
        None => (Vec::new(), 0.0),
    };
    Json(FuelMapResponse {
        rows,
        fuel_remaining,
    })
}

async fn get_lap_files(AxumState(app_state): AxumState<AppState>) -> impl IntoResponse {
    let files = lapfile::list_lap_files(&app_state.data_dir).await;
    Json(LapFilesResponse {
        files: files
            .iter()
            .map(|path| path.to_string_lossy().to_string())
            .collect(),
    })
}

async fn save_laps(AxumState(app_state): AxumState<AppState>) -> impl IntoResponse {
    let laps = { app_state.feed.read().await.laps().to_vec() };
    match lapfile::save_laps(&app_state.data_dir, &laps).await {
        Ok(path) => {
            info!(count = laps.len(), path = %path.display(), "laps saved");
            Json(SaveLapsResponse {
                path: path.to_string_lossy().to_string(),
                count: laps.len(),
            })
            .into_response()
        }
        Err(err) => {
            warn!(?err, "failed to save laps");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn load_laps(
    AxumState(app_state): AxumState<AppState>,
    Json(request): Json<LoadLapsRequest>,
) -> impl IntoResponse {
    let path = PathBuf::from(&request.path);
    match lapfile::load_laps(&path).await {
        Ok(laps) => {
            let count = laps.len();
            info!(count, path = %path.display(), replace = request.replace_others, "laps loaded");
            app_state
                .feed
                .write()
                .await
                .load_laps(laps, request.replace_others);
            Json(LoadLapsResponse { count }).into_response()
        }
        Err(err) => {
            warn!(?err, path = %path.display(), "failed to load laps");
            StatusCode::BAD_REQUEST.into_response()
        }
    }
}
