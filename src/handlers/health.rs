use axum::{Json, http::StatusCode};

use crate::models::{DefaultResponse, StatusResponse};

pub async fn health_handler() -> (StatusCode, Json<DefaultResponse<()>>) {
    (
        StatusCode::OK,
        Json(DefaultResponse {
            payload: None,
            status: StatusResponse::new(StatusCode::OK, "Service is healthy", "HC_200_OK"),
        }),
    )
}
