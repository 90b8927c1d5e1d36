//! API error response body

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body written for every failed request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// HTTP status code, repeated in the body
    pub status: u16,

    /// Human-readable error message
    pub message: String,

    /// Structured details, e.g. schema validation errors
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ErrorResponse {
    /// Create a new error response
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            details: None,
        }
    }

    /// Attach structured details
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_details_omitted_when_absent() {
        let body = serde_json::to_value(ErrorResponse::new(404, "missing")).unwrap();
        assert_eq!(body, json!({ "status": 404, "message": "missing" }));
    }

    #[test]
    fn test_details_serialized() {
        let response = ErrorResponse::new(400, "Invalid request body!")
            .with_details(json!([{ "message": "bad" }]));
        let body = serde_json::to_value(response).unwrap();
        assert_eq!(body["details"][0]["message"], "bad");
    }
}
