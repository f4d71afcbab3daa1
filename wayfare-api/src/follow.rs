use axum::{
    extract::{Path, State},
    routing::{get, post},
    Extension, Router,
};
use serde::Serialize;

use crate::error::AppError;
use crate::middleware::auth::AuthActor;
use crate::response::ApiResponse;
use crate::state::AppState;
use wayfare_domain::ToggleState;

#[derive(Debug, Serialize)]
struct ToggleResponse {
    state: ToggleState,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/follow/{user_name}", post(toggle_follow))
        .route("/follow/{user_name}/followers", get(list_followers))
        .route("/follow/{user_name}/following", get(list_following))
}

async fn toggle_follow(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthActor>,
    Path(user_name): Path<String>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let toggled = state.social.toggle_follow(actor.0, &user_name).await?;

    let message = match toggled {
        ToggleState::Added => "User followed successfully",
        ToggleState::Removed => "User unfollowed successfully",
    };
    Ok(ApiResponse::ok(ToggleResponse { state: toggled }, message))
}

async fn list_followers(
    State(state): State<AppState>,
    Extension(_actor): Extension<AuthActor>,
    Path(user_name): Path<String>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let followers = state.social.followers(&user_name).await?;
    Ok(ApiResponse::ok(followers, "Followers fetched successfully"))
}

async fn list_following(
    State(state): State<AppState>,
    Extension(_actor): Extension<AuthActor>,
    Path(user_name): Path<String>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let following = state.social.following(&user_name).await?;
    Ok(ApiResponse::ok(
        following,
        "Followings fetched successfully",
    ))
}
