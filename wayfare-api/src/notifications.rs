use axum::{
    extract::{Path, Query, State},
    routing::{get, patch},
    Extension, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::middleware::auth::AuthActor;
use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
struct NotificationFilter {
    #[serde(rename = "isRead")]
    is_read: Option<bool>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/notifications", get(list_notifications))
        .route(
            "/notifications/{id}",
            patch(mark_read).delete(delete_notification),
        )
}

async fn list_notifications(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthActor>,
    Query(filter): Query<NotificationFilter>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let notifications = state.notifications.list(actor.0, filter.is_read).await?;
    Ok(ApiResponse::ok(
        notifications,
        "Notifications retrieved successfully.",
    ))
}

async fn mark_read(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthActor>,
    Path(id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let notification = state.notifications.mark_read(id, actor.0).await?;
    Ok(ApiResponse::ok(
        notification,
        "Notification marked as read.",
    ))
}

async fn delete_notification(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthActor>,
    Path(id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    state.notifications.delete(id, actor.0).await?;
    Ok(ApiResponse::ok(
        serde_json::Value::Null,
        "Notification deleted successfully.",
    ))
}
