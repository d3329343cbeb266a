use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use tracing::{error, instrument};

use crate::scan::dto::{ScanErrorBody, ScanOutcome, ScanRequest, ScanResponse};
use crate::scan::service;
use crate::state::AppState;

pub fn scan_routes() -> Router<AppState> {
    Router::new().route("/scan/run-scan", post(run_scan))
}

#[instrument(skip(state, payload))]
pub async fn run_scan(
    State(state): State<AppState>,
    Json(payload): Json<ScanRequest>,
) -> Result<Json<ScanResponse>, (StatusCode, Json<ScanErrorBody>)> {
    match service::run_scan(&state, &payload.access_token, &payload.repo_name).await {
        Ok(data) => Ok(Json(ScanResponse {
            message: "Scan completed successfully".into(),
            response: ScanOutcome {
                status: "completed".into(),
                data,
            },
        })),
        Err(e) => {
            error!(error = %e, repo = %payload.repo_name, "scan failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ScanErrorBody {
                    error: e.to_string(),
                }),
            ))
        }
    }
}
