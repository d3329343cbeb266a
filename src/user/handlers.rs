use anyhow::Context;
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};

use crate::{
    auth::jwt::AuthUser,
    error::ApiError,
    state::AppState,
    user::{
        dto::{CompleteProfileRequest, CompleteProfileResponse},
        repo::{mark_profile_complete_tx, UserProfile},
    },
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/user/complete-profile", post(complete_profile))
        .route("/user/profile", get(get_profile))
}

/// Upserts the caller's profile and flips the completeness flag, atomically.
#[instrument(skip(state, payload))]
pub async fn complete_profile(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Json(payload): Json<CompleteProfileRequest>,
) -> Result<Json<CompleteProfileResponse>, ApiError> {
    let mut tx = state.db.begin().await.context("begin tx")?;
    UserProfile::upsert_tx(&mut tx, claims.sub, &payload).await?;
    mark_profile_complete_tx(&mut tx, claims.sub).await?;
    tx.commit().await.context("commit tx")?;

    info!(user_id = %claims.sub, "profile completed");
    Ok(Json(CompleteProfileResponse {
        message: "Profile completed successfully".into(),
        user_id: claims.sub,
    }))
}

#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> Result<Json<UserProfile>, ApiError> {
    let profile = UserProfile::find_by_user(&state.db, claims.sub)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(profile))
}
