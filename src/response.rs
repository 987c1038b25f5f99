use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// JSON envelope shared by every endpoint: `{status_code, message, data?}`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub status_code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            status_code: StatusCode::OK.as_u16().to_string(),
            message: message.into(),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    pub fn status(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status_code: status.as_u16().to_string(),
            message: message.into(),
            data: None,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = self
            .status_code
            .parse::<u16>()
            .ok()
            .and_then(|c| StatusCode::from_u16(c).ok())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

/// Distance endpoint reports its result under `distance` rather than `data`.
#[derive(Debug, Serialize)]
pub struct DistanceResponse {
    pub status_code: String,
    pub message: String,
    pub distance: String,
}

impl DistanceResponse {
    pub fn ok(distance: String) -> Self {
        Self {
            status_code: StatusCode::OK.as_u16().to_string(),
            message: "Distance calculated successfully".into(),
            distance,
        }
    }
}

impl IntoResponse for DistanceResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}
