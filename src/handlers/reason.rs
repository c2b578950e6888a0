use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use std::sync::Arc;
use tracing::{debug, error};

use crate::metrics::REASONS_SERVED;
use crate::models::{DefaultResponse, ReasonPayload, StatusResponse};
use crate::state::AppState;

type ReasonResponse = (StatusCode, Json<DefaultResponse<ReasonPayload>>);

fn failure(status: StatusCode, message: String, code: &'static str) -> ReasonResponse {
    (
        status,
        Json(DefaultResponse {
            payload: None,
            status: StatusResponse::new(status, message, code),
        }),
    )
}

// GET /reason?lang=de
//
// Query pairs are taken raw so repeated keys never fail extraction; the
// first non-empty `lang` wins.
pub async fn reason_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<Vec<(String, String)>>,
) -> ReasonResponse {
    let lang = params
        .into_iter()
        .find(|(key, value)| key == "lang" && !value.is_empty())
        .map(|(_, value)| value)
        .unwrap_or_else(|| state.default_language.clone());

    if !state.reasons.is_supported(&lang) {
        debug!(lang = %lang, "Unsupported language requested");
        return failure(
            StatusCode::BAD_REQUEST,
            format!("Invalid language. Supported: {}", state.reasons.languages().join(", ")),
            "RE_400_INVALID_LANGUAGE",
        );
    }

    let reason = match state.reasons.get_reason(&lang) {
        Ok(reason) => reason,
        Err(e) => {
            error!(lang = %lang, error = %e, "Could not serve reason");
            return failure(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to load reasons".to_string(),
                "RE_500_LOAD_ERROR",
            );
        }
    };

    REASONS_SERVED.inc();

    (
        StatusCode::OK,
        Json(DefaultResponse {
            payload: Some(ReasonPayload { reason }),
            status: StatusResponse::new(
                StatusCode::OK,
                "Reason delivered successfully.",
                "RE_200_REASON_DELIVERED",
            ),
        }),
    )
}
