//
//  cdek-client
//  api/common/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/10/16.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! Common API Types for the CDEK client
//!
//! This module provides the types shared by the transport client and every
//! entity handler: the unified error type, the plain error record returned to
//! hosts, the provider error extractors and the page helpers used by the
//! reference-data sync.
//!
//! # Overview
//!
//! - [`ApiError`] - Unified error type for all API operations
//! - [`ApiResult`] - `Result<serde_json::Value, ApiError>`, returned by every public call
//! - [`ErrorRecord`] - The `{error_code, error_message}` shape handed to callers
//! - Error extractors (re-exported from the [`extract`] submodule)
//! - Pagination helpers (re-exported from the [`pagination`] submodule)
//!
//! # Example
//!
//! ```rust
//! use cdek_client::api::common::{ApiError, ApiResult};
//!
//! fn describe(result: ApiResult) -> String {
//!     match result {
//!         Ok(body) => format!("ok: {}", body),
//!         Err(e) => format!("{} ({})", e.error_message(), e.error_code()),
//!     }
//! }
//!
//! let failed: ApiResult = Err(ApiError::validation("tariff_code is required"));
//! assert_eq!(describe(failed), "tariff_code is required (500)");
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

mod extract;
mod pagination;

pub use extract::*;
pub use pagination::*;

/// Error code reported for input that failed local validation.
///
/// Kept as the provider-facing string `"500"` for compatibility with hosts
/// that already branch on it.
pub const VALIDATION_ERROR_CODE: &str = "500";

/// Message returned in place of the body of a 5xx response.
pub const SERVER_ERROR_MESSAGE: &str =
    "The delivery service is temporarily unavailable, please try again later";

/// Result of every public API operation.
pub type ApiResult = Result<serde_json::Value, ApiError>;

/// Unified error type for all CDEK API operations.
///
/// | Variant | Raised by | `error_code` |
/// |---------|-----------|--------------|
/// | `Validation` | entity handlers, before any request | `"500"` |
/// | `Client` | HTTP 4xx responses | HTTP status |
/// | `Server` | HTTP 5xx (and other non-2xx) responses | HTTP status |
/// | `Transport` | timeouts, DNS, TLS, connection resets | status if known, else `0` |
///
/// # Example
///
/// ```rust
/// use cdek_client::api::common::ApiError;
///
/// let err = ApiError::Client { status: 400, message: "v2_bad_request: weight".into() };
/// assert_eq!(err.error_code(), "400");
/// assert!(err.is_remote());
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// A required input field is missing or empty.
    ///
    /// No request was sent.
    #[error("{message}")]
    Validation {
        /// Which field is missing, in human-readable form
        message: String,
    },

    /// The provider rejected the request (HTTP 4xx).
    #[error("HTTP {status}: {message}")]
    Client {
        /// HTTP status code
        status: u16,
        /// Message extracted from the provider's error body
        message: String,
    },

    /// The provider failed to process the request (HTTP 5xx).
    ///
    /// The body is logged, never returned.
    #[error("HTTP {status}: {}", SERVER_ERROR_MESSAGE)]
    Server {
        /// HTTP status code
        status: u16,
    },

    /// The request never produced an HTTP response.
    #[error("Network error: {message}")]
    Transport {
        /// HTTP status attached to the failure, or `0`
        code: u16,
        /// Underlying error message
        message: String,
    },
}

impl ApiError {
    /// Creates a validation error with the given message.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Builds a transport error from a `reqwest` failure.
    pub fn transport(err: &reqwest::Error) -> Self {
        Self::Transport {
            code: err.status().map(|s| s.as_u16()).unwrap_or(0),
            message: err.to_string(),
        }
    }

    /// Returns the code reported to callers.
    pub fn error_code(&self) -> String {
        match self {
            Self::Validation { .. } => VALIDATION_ERROR_CODE.to_string(),
            Self::Client { status, .. } | Self::Server { status } => status.to_string(),
            Self::Transport { code, .. } => code.to_string(),
        }
    }

    /// Returns the message reported to callers.
    pub fn error_message(&self) -> String {
        match self {
            Self::Validation { message }
            | Self::Client { message, .. }
            | Self::Transport { message, .. } => message.clone(),
            Self::Server { .. } => SERVER_ERROR_MESSAGE.to_string(),
        }
    }

    /// Whether the error came from talking to the provider.
    ///
    /// Only remote errors are logged and forwarded to an error sink.
    pub fn is_remote(&self) -> bool {
        !matches!(self, Self::Validation { .. })
    }

    /// Converts the error into its plain record form.
    pub fn to_record(&self) -> ErrorRecord {
        ErrorRecord {
            error_code: self.error_code(),
            error_message: self.error_message(),
        }
    }
}

/// The structured error handed to hosts in place of a response body.
///
/// # Example
///
/// ```rust
/// use cdek_client::api::common::{ApiError, ErrorRecord};
///
/// let record: ErrorRecord = ApiError::Server { status: 502 }.into();
/// assert_eq!(record.error_code, "502");
/// let json = serde_json::to_value(&record).unwrap();
/// assert!(json.get("error_message").is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
    /// HTTP status, transport code, or `"500"` for validation failures
    pub error_code: String,
    /// Human-readable description
    pub error_message: String,
}

impl From<ApiError> for ErrorRecord {
    fn from(err: ApiError) -> Self {
        err.to_record()
    }
}

impl From<&ApiError> for ErrorRecord {
    fn from(err: &ApiError) -> Self {
        err.to_record()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_code_is_500() {
        let err = ApiError::validation("recipient.name is required");
        assert_eq!(err.error_code(), "500");
        assert_eq!(err.error_message(), "recipient.name is required");
        assert!(!err.is_remote());
    }

    #[test]
    fn test_server_error_hides_body() {
        let err = ApiError::Server { status: 503 };
        let record = err.to_record();
        assert_eq!(record.error_code, "503");
        assert_eq!(record.error_message, SERVER_ERROR_MESSAGE);
    }

    #[test]
    fn test_transport_code_defaults_to_zero() {
        let err = ApiError::Transport {
            code: 0,
            message: "connection refused".to_string(),
        };
        assert_eq!(err.error_code(), "0");
        assert!(err.is_remote());
    }
}
