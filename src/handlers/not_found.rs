use axum::{Json, http::StatusCode};

use crate::models::{StatusOnlyResponse, StatusResponse};

// fallback for every unknown route
pub async fn not_found_handler() -> (StatusCode, Json<StatusOnlyResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(StatusOnlyResponse {
            status: StatusResponse::new(
                StatusCode::NOT_FOUND,
                "The requested resource was not found",
                "RT_404_NOT_FOUND",
            ),
        }),
    )
}
