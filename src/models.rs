use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

// Status block present in every response
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct StatusResponse {
    pub status: u16,
    pub message: String,
    pub code: &'static str,
}

impl StatusResponse {
    pub fn new(status: StatusCode, message: impl Into<String>, code: &'static str) -> Self {
        Self {
            status: status.as_u16(),
            message: message.into(),
            code,
        }
    }
}

// Standard envelope, Payload is null when there is nothing to return
#[derive(Serialize, Debug)]
#[serde(rename_all = "PascalCase")]
pub struct DefaultResponse<T: Serialize> {
    pub payload: Option<T>,
    pub status: StatusResponse,
}

// Envelope used by the not-found and rate-limit paths, no Payload key at all
#[derive(Serialize, Debug)]
#[serde(rename_all = "PascalCase")]
pub struct StatusOnlyResponse {
    pub status: StatusResponse,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ReasonPayload {
    pub reason: String,
}
