use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;
use wayfare_domain::{ActorRef, ActorType};

/// Token claims. Issuance lives with the external credential service; this
/// layer only verifies and turns a token into an actor identity.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: Uuid,
    pub actor_type: ActorType,
    pub exp: usize,
}

/// The authenticated caller, inserted as a request extension and passed
/// explicitly into every core operation.
#[derive(Debug, Clone, Copy)]
pub struct AuthActor(pub ActorRef);

impl AuthActor {
    /// Agency-only routes (booking accept/reject/delete, package creation).
    pub fn require_agency(&self) -> Result<Uuid, AppError> {
        match self.0.actor_type {
            ActorType::Agency => Ok(self.0.actor_id),
            ActorType::Traveler => Err(AppError::Forbidden(
                "This action requires an agency account.".to_string(),
            )),
        }
    }

    /// Traveler-only routes (booking creation).
    pub fn require_traveler(&self) -> Result<Uuid, AppError> {
        match self.0.actor_type {
            ActorType::Traveler => Ok(self.0.actor_id),
            ActorType::Agency => Err(AppError::Forbidden(
                "This action requires a traveler account.".to_string(),
            )),
        }
    }
}

pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthorized("Malformed Authorization header".to_string()))?;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(state.auth.secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| AppError::Unauthorized(format!("Invalid token: {}", e)))?;

    let claims = token_data.claims;
    req.extensions_mut().insert(AuthActor(ActorRef {
        actor_type: claims.actor_type,
        actor_id: claims.sub,
    }));

    Ok(next.run(req).await)
}
