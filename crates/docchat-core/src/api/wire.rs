//! JSON bodies exchanged with the document backend.
//!
//! Response fields are optional on purpose: presence is checked by the
//! client so a missing field becomes `ApiError::MalformedResponse`.

use serde::{Deserialize, Serialize};

use super::ApiError;

#[derive(Serialize)]
pub(crate) struct ChatRequest<'a> {
    pub question: &'a str,
}

#[derive(Deserialize)]
pub(crate) struct UploadResponse {
    pub filename: Option<String>,
    pub message: Option<String>,
}

#[derive(Deserialize)]
pub(crate) struct ChatResponse {
    pub answer: Option<String>,
}

/// Shape of the health and reset endpoints
#[derive(Deserialize)]
pub(crate) struct MessageResponse {
    pub message: Option<String>,
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: Option<serde_json::Value>,
}

/// Pull a human-readable `detail` out of an error body.
///
/// Only string details count; validation errors arrive as arrays and fall
/// back to the exchange's generic message.
pub(crate) fn error_detail(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    match parsed.detail? {
        serde_json::Value::String(detail) if !detail.trim().is_empty() => Some(detail),
        _ => None,
    }
}

pub(crate) fn required<T>(value: Option<T>, field: &'static str) -> Result<T, ApiError> {
    value.ok_or(ApiError::MalformedResponse { field })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_detail_string() {
        assert_eq!(
            error_detail(r#"{"detail":"Vector store is not initialized."}"#),
            Some("Vector store is not initialized.".to_string())
        );
    }

    #[test]
    fn test_error_detail_missing_or_unusable() {
        assert_eq!(error_detail(r#"{"error":"nope"}"#), None);
        assert_eq!(error_detail("Internal Server Error"), None);
        assert_eq!(error_detail(r#"{"detail":""}"#), None);
        assert_eq!(
            error_detail(r#"{"detail":[{"loc":["body","question"],"msg":"field required"}]}"#),
            None
        );
    }

    #[test]
    fn test_chat_request_shape() {
        let json = serde_json::to_value(ChatRequest { question: "Hi" }).unwrap();
        assert_eq!(json, serde_json::json!({ "question": "Hi" }));
    }

    #[test]
    fn test_required_reports_field() {
        let missing: Option<String> = None;
        assert_eq!(
            required(missing, "answer"),
            Err(ApiError::MalformedResponse { field: "answer" })
        );
    }
}
