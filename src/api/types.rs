use serde::Serialize;

use crate::models::FieldErrors;

/// Body of every non-2xx response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<FieldErrors>,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            fields: None,
        }
    }

    pub fn with_fields(message: impl Into<String>, fields: FieldErrors) -> Self {
        Self {
            error: message.into(),
            fields: Some(fields),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub uptime_seconds: u64,
    pub tracked_searches: u64,
}
