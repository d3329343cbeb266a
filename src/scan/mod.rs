use crate::state::AppState;
use axum::Router;
use thiserror::Error;

mod dto;
pub mod handlers;
pub mod service;

/// Failures of the scan pipeline. Every variant aborts the whole call; the
/// handler reports the text to the client as-is.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("GitHub request failed: {0}")]
    Github(String),

    #[error("AI request failed: {0}")]
    Ai(String),

    #[error("Malformed AI response: {0}")]
    MalformedResponse(String),
}

pub fn router() -> Router<AppState> {
    handlers::scan_routes()
}
