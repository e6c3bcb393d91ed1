//! Backend client error types.

use storefront_commerce::catalog::CatalogError;
use storefront_commerce::gateway::GatewayError;
use thiserror::Error;

/// Errors that can occur when talking to the backend.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    /// Failed to send the request.
    #[error("Request failed: {0}")]
    RequestError(String),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// HTTP error response.
    #[error("HTTP {status}: {message}")]
    HttpError { status: u16, message: String },

    /// Failed to parse response body.
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Request timeout.
    #[error("Request timed out")]
    Timeout,

    /// Invalid client configuration (e.g., a token with control characters).
    #[error("Invalid client configuration: {0}")]
    Config(String),
}

impl FetchError {
    /// HTTP status, if the backend answered with one.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::HttpError { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout
        } else if e.is_decode() {
            FetchError::ParseError(e.to_string())
        } else if let Some(status) = e.status() {
            FetchError::HttpError {
                status: status.as_u16(),
                message: e.to_string(),
            }
        } else {
            FetchError::RequestError(e.to_string())
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError::ParseError(e.to_string())
    }
}

impl From<FetchError> for CatalogError {
    fn from(e: FetchError) -> Self {
        match e {
            FetchError::ParseError(msg) => CatalogError::Malformed(msg),
            other => CatalogError::Unavailable(other.to_string()),
        }
    }
}

impl From<FetchError> for GatewayError {
    fn from(e: FetchError) -> Self {
        match e {
            FetchError::Timeout => GatewayError::Timeout,
            FetchError::ParseError(msg) => GatewayError::InvalidResponse(msg),
            other => GatewayError::Transport(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_mapping() {
        assert_eq!(
            CatalogError::from(FetchError::ParseError("expected array".into())),
            CatalogError::Malformed("expected array".into())
        );
        assert!(matches!(
            CatalogError::from(FetchError::Timeout),
            CatalogError::Unavailable(_)
        ));
    }

    #[test]
    fn test_gateway_mapping() {
        assert_eq!(GatewayError::from(FetchError::Timeout), GatewayError::Timeout);
        let http = FetchError::HttpError {
            status: 502,
            message: "Bad Gateway".into(),
        };
        assert_eq!(http.status(), Some(502));
        assert_eq!(
            GatewayError::from(http),
            GatewayError::Transport("HTTP 502: Bad Gateway".into())
        );
    }
}
