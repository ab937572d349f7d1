//! API error types.
//!
//! Two families reach the user: the server rejected the request (it may have
//! said why in a `detail` field), or the request never produced a usable
//! response. Both are terminal for the attempt; nothing here retries.

use serde::Deserialize;
use thiserror::Error;

use crate::StorageError;

/// Errors returned by [`crate::Api`] operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Server answered with a non-success status
    #[error("request rejected with status {status}{}", detail.as_deref().map(|d| format!(": {d}")).unwrap_or_default())]
    Rejected {
        /// HTTP status code
        status: u16,
        /// Human-readable reason from the response body, if any
        detail: Option<String>,
    },

    /// Network failure before a response arrived
    #[error("transport error: {0}")]
    Transport(String),

    /// Response arrived but could not be decoded
    #[error("malformed response: {0}")]
    Decode(String),

    /// Credential could not be read from local storage
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl ApiError {
    /// Build a rejection from a response status and raw body.
    ///
    /// The body's `detail` field is used only when it is a string; structured
    /// details (validation error lists) carry no user-facing text.
    pub fn rejected(status: u16, body: &str) -> Self {
        Self::Rejected { status, detail: extract_detail(body) }
    }

    /// Server-provided reason. `None` for transport and decode failures.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Rejected { detail, .. } => detail.as_deref(),
            Self::Transport(_) | Self::Decode(_) | Self::Storage(_) => None,
        }
    }

    /// Message to show the user: the server's detail, else `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        self.detail().unwrap_or(fallback).to_string()
    }

    /// True if the server refused the credential.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Rejected { status: 401 | 403, .. })
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<serde_json::Value>,
}

fn extract_detail(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    match parsed.detail? {
        serde_json::Value::String(detail) if !detail.is_empty() => Some(detail),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn string_detail_is_user_message() {
        let err = ApiError::rejected(404, r#"{"detail": "Recipient not found"}"#);
        assert_eq!(err.user_message("Failed to send message"), "Recipient not found");
    }

    #[test]
    fn structured_detail_falls_back() {
        let body = r#"{"detail": [{"loc": ["body", "amount"], "msg": "field required"}]}"#;
        let err = ApiError::rejected(422, body);
        assert_eq!(err.detail(), None);
        assert_eq!(err.user_message("Recharge failed"), "Recharge failed");
    }

    #[test]
    fn non_json_body_falls_back() {
        let err = ApiError::rejected(502, "<html>Bad Gateway</html>");
        assert_eq!(err.user_message("Login failed"), "Login failed");
    }

    #[test]
    fn transport_error_uses_fallback() {
        let err = ApiError::Transport("connection refused".into());
        assert_eq!(err.user_message("Login failed"), "Login failed");
        assert!(!err.is_unauthorized());
    }

    #[test]
    fn unauthorized_statuses() {
        assert!(ApiError::rejected(401, "").is_unauthorized());
        assert!(ApiError::rejected(403, "").is_unauthorized());
        assert!(!ApiError::rejected(400, "").is_unauthorized());
    }

    #[test]
    fn display_includes_detail() {
        let err = ApiError::rejected(400, r#"{"detail": "Insufficient credits"}"#);
        assert_eq!(err.to_string(), "request rejected with status 400: Insufficient credits");
    }

    proptest! {
        #[test]
        fn string_detail_survives_any_content(detail in "\\PC{1,80}", status in 400u16..600) {
            let body = serde_json::json!({ "detail": detail }).to_string();
            let err = ApiError::rejected(status, &body);
            prop_assert_eq!(err.user_message("fallback"), detail);
        }

        #[test]
        fn arbitrary_bodies_never_panic(body in ".{0,200}", status in 400u16..600) {
            let err = ApiError::rejected(status, &body);
            prop_assert!(!err.user_message("fallback").is_empty());
        }
    }
}
