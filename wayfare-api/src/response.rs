use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

/// Stable success envelope: `{status, data, message}`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub status: u16,
    pub data: T,
    pub message: String,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T, message: impl Into<String>) -> (StatusCode, Json<Self>) {
        Self::with_status(StatusCode::OK, data, message)
    }

    pub fn created(data: T, message: impl Into<String>) -> (StatusCode, Json<Self>) {
        Self::with_status(StatusCode::CREATED, data, message)
    }

    pub fn with_status(
        status: StatusCode,
        data: T,
        message: impl Into<String>,
    ) -> (StatusCode, Json<Self>) {
        (
            status,
            Json(Self {
                status: status.as_u16(),
                data,
                message: message.into(),
            }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_shape() {
        let (status, Json(body)) = ApiResponse::ok(serde_json::json!({"x": 1}), "done");
        assert_eq!(status, StatusCode::OK);

        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["status"], 200);
        assert_eq!(value["data"]["x"], 1);
        assert_eq!(value["message"], "done");
    }
}
