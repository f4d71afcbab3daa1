use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Router,
};
use serde::Serialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::middleware::auth::AuthActor;
use crate::response::ApiResponse;
use crate::state::AppState;
use wayfare_domain::{LikeTarget, TargetKind, ToggleState};

#[derive(Debug, Serialize)]
struct LikeToggleResponse {
    state: ToggleState,
    #[serde(rename = "likeCount")]
    like_count: i64,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/{kind}/{id}/like", post(toggle_like))
        .route("/likes/{kind}", get(list_liked))
}

async fn toggle_like(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthActor>,
    Path((kind, id)): Path<(String, Uuid)>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let kind: TargetKind = kind.parse()?;
    let target = LikeTarget { kind, id };

    let (toggled, like_count) = state.social.toggle_like(actor.0, target).await?;

    let (status, message) = match toggled {
        ToggleState::Added => (StatusCode::CREATED, format!("{} liked successfully.", kind)),
        ToggleState::Removed => (StatusCode::OK, format!("{} unliked successfully.", kind)),
    };

    Ok(ApiResponse::with_status(
        status,
        LikeToggleResponse {
            state: toggled,
            like_count,
        },
        message,
    ))
}

async fn list_liked(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthActor>,
    Path(kind): Path<String>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let kind: TargetKind = kind.parse()?;
    let liked = state.social.liked(actor.0, kind).await?;

    Ok(ApiResponse::ok(
        liked,
        format!("Liked {}s fetched successfully.", kind),
    ))
}
