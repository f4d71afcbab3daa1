use axum::{
    extract::{Path, State},
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::middleware::auth::AuthActor;
use crate::response::ApiResponse;
use crate::state::AppState;
use wayfare_domain::{DomainError, TravelPackage};

#[derive(Debug, Deserialize)]
struct CreatePackageRequest {
    title: String,
    description: String,
    price: i64,
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
    max_slots: i32,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/packages", post(create_package))
        .route("/packages/{id}", get(get_package))
}

async fn create_package(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthActor>,
    Json(req): Json<CreatePackageRequest>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let agency_id = actor.require_agency()?;

    let package = TravelPackage::new(
        agency_id,
        req.title,
        req.description,
        req.price,
        req.start_date,
        req.end_date,
        req.max_slots,
    )?;
    state.packages.insert(&package).await?;

    Ok(ApiResponse::created(
        package,
        "Package created successfully.",
    ))
}

async fn get_package(
    State(state): State<AppState>,
    Extension(_actor): Extension<AuthActor>,
    Path(id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let package = state
        .packages
        .find(id)
        .await?
        .ok_or(DomainError::NotFound("package"))?;

    Ok(ApiResponse::ok(package, "Package retrieved successfully."))
}
