//! Error types for the storefront API client.

use thiserror::Error;

/// Errors that can occur when calling the storefront API.
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Base URL or request URL is invalid.
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Server answered with an error status.
    #[error("API error ({status}): {detail}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// `detail` field of the error body, or the raw body.
        detail: String,
    },

    /// Failed to decode a response body.
    #[error("decode error: {0}")]
    Decode(String),
}

impl ClientError {
    /// Whether the server reported the resource as missing.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Api { status: 404, .. })
    }
}

/// Error body produced by the storefront.
#[derive(Debug, serde::Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_display() {
        let err = ClientError::Api {
            status: 404,
            detail: "product 9 not found".to_string(),
        };
        assert_eq!(err.to_string(), "API error (404): product 9 not found");
        assert!(err.is_not_found());
        assert!(!ClientError::Decode("x".to_string()).is_not_found());
    }

    #[test]
    fn test_error_body_deserialization() {
        let body: ErrorBody =
            serde_json::from_str(r#"{"detail": "quantity must be at least 1, got 0"}"#)
                .expect("deserialize");
        assert_eq!(body.detail, "quantity must be at least 1, got 0");
    }
}
