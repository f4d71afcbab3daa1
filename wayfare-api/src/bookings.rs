use axum::{
    extract::{Path, State},
    routing::{get, patch, post},
    Extension, Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::middleware::auth::AuthActor;
use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
struct CreateBookingRequest {
    package_id: Uuid,
    slots_booked: i32,
}

#[derive(Debug, Deserialize)]
struct BookingActionRequest {
    action: String,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/bookings", post(create_booking))
        .route(
            "/bookings/{id}",
            get(get_booking).delete(delete_booking),
        )
        .route("/bookings/{id}/action", patch(handle_booking_action))
}

async fn create_booking(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthActor>,
    Json(req): Json<CreateBookingRequest>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let traveler_id = actor.require_traveler()?;

    let booking = state
        .bookings
        .create(traveler_id, req.package_id, req.slots_booked)
        .await?;

    Ok(ApiResponse::created(
        booking,
        "Booking request sent successfully.",
    ))
}

async fn handle_booking_action(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthActor>,
    Path(booking_id): Path<Uuid>,
    Json(req): Json<BookingActionRequest>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let agency_id = actor.require_agency()?;

    let (booking, message) = match req.action.as_str() {
        "accept" => (
            state.bookings.accept(booking_id, agency_id).await?,
            "Booking accepted successfully.",
        ),
        "reject" => (
            state.bookings.reject(booking_id, agency_id).await?,
            "Booking rejected successfully.",
        ),
        _ => {
            return Err(AppError::Validation(
                "Invalid action. Use 'accept' or 'reject'.".to_string(),
            ))
        }
    };

    Ok(ApiResponse::ok(booking, message))
}

async fn get_booking(
    State(state): State<AppState>,
    Extension(_actor): Extension<AuthActor>,
    Path(booking_id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let details = state.bookings.get(booking_id).await?;
    Ok(ApiResponse::ok(details, "Booking retrieved successfully."))
}

async fn delete_booking(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthActor>,
    Path(booking_id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let agency_id = actor.require_agency()?;
    state.bookings.delete(booking_id, agency_id).await?;

    Ok(ApiResponse::ok(
        serde_json::Value::Null,
        "Booking deleted successfully.",
    ))
}
