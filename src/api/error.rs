//! Client-side error taxonomy and server message extraction.
//!
//! Every failed call maps to one of four user-facing kinds. The server
//! reports failures as JSON with an `error`, `message` or `detail` field;
//! when none is present the operation's generic fallback string is used.

use thiserror::Error;

/// Error raised by [`ApiClient`](crate::api::ApiClient) operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing, invalid or expired session token.
    #[error("authentication failed: {0}")]
    Auth(String),
    /// Malformed or rejected submitted fields.
    #[error("validation failed: {0}")]
    Validation(String),
    /// Unsupported file type/size or a server-side parse failure.
    #[error("upload rejected: {0}")]
    Upload(String),
    /// Transport failure or an unclassifiable server status.
    #[error("network error: {0}")]
    Network(String),
    /// The owning view was unmounted while the call was in flight.
    #[error("request cancelled")]
    Cancelled,
}

/// Which operation produced a response, for status classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorContext {
    Login,
    Register,
    Upload,
    General,
}

impl ApiError {
    /// Message suitable for inline display in a view.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Auth(m)
            | ApiError::Validation(m)
            | ApiError::Upload(m)
            | ApiError::Network(m) => m.clone(),
            ApiError::Cancelled => "Request cancelled".to_string(),
        }
    }

    pub fn is_auth(&self) -> bool {
        matches!(self, ApiError::Auth(_))
    }

    /// Map an HTTP status plus extracted message to an error kind.
    ///
    /// 401/403 always mean the credential was rejected. 4xx on the upload
    /// endpoint is the server refusing the artifact. The login endpoint
    /// reports bad credentials as 400, so that context maps 400 to `Auth`
    /// as well. Everything unclassifiable is surfaced as `Network`.
    pub(crate) fn classify(status: u16, message: String, ctx: ErrorContext) -> Self {
        match (status, ctx) {
            (401 | 403, _) => ApiError::Auth(message),
            (400, ErrorContext::Login) => ApiError::Auth(message),
            (400..=499, ErrorContext::Upload) => ApiError::Upload(message),
            (400 | 409 | 422, ErrorContext::Register) => ApiError::Validation(message),
            (400 | 422, ErrorContext::General) => ApiError::Validation(message),
            _ => ApiError::Network(message),
        }
    }
}

/// Pull a human-readable message out of a JSON error body.
///
/// Tries `error`, then `message`, then `detail` (the service mixes all
/// three across endpoints); falls back to the caller-provided string.
pub(crate) fn extract_message(body: &str, fallback: &str) -> String {
    if let Ok(json) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["error", "message", "detail"] {
            if let Some(msg) = json.get(key).and_then(|v| v.as_str()) {
                if !msg.is_empty() {
                    return msg.to_string();
                }
            }
        }
    }
    fallback.to_string()
}
