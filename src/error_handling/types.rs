//! Error type definitions.
//!
//! `ApiError` is the only error that reaches a client. Backend-specific errors
//! (`StoreError`, `FetchError`) are logged where they are handled and mapped to
//! a short `ApiError` message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing an HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),

    /// Invalid configuration value (e.g. an unparsable base URL).
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Errors raised by a key-value store backend.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The remote service could not be reached.
    #[error("store request failed: {0}")]
    Network(#[from] ReqwestError),

    /// The remote service rejected the configured token.
    #[error("store rejected credentials (HTTP {0})")]
    Unauthorized(u16),

    /// The remote service returned an error for the command.
    #[error("store error: {0}")]
    Backend(String),

    /// The remote service answered with something we could not interpret.
    #[error("unexpected store response: {0}")]
    Protocol(String),

    /// `increment` was called on a key holding a non-integer value.
    #[error("value at '{0}' is not an integer")]
    NotAnInteger(String),

    /// A value could not be encoded or decoded as JSON.
    #[error("store value encoding error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors raised by the fetch proxy.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Missing url")]
    MissingUrl,

    #[error("Invalid url")]
    InvalidUrl(#[source] url::ParseError),

    #[error("Invalid url protocol")]
    UnsupportedScheme(String),

    #[error("URL host not allowed")]
    HostNotAllowed(String),

    /// The inbound request could not be turned into an outbound one.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Transport-level failure (DNS, connect, timeout, redirect loop, body read).
    #[error("{0}")]
    Transport(#[from] ReqwestError),

    /// Upstream kept answering 5xx until retries ran out.
    #[error("upstream returned {0}")]
    UpstreamStatus(u16),
}

impl FetchError {
    /// Whether the failure is the caller's fault (reported as 400).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            FetchError::MissingUrl
                | FetchError::InvalidUrl(_)
                | FetchError::UnsupportedScheme(_)
                | FetchError::HostNotAllowed(_)
                | FetchError::InvalidRequest(_)
        )
    }
}

/// HTTP-facing error. Serialized as `{"error": "<message>"}`.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    TooManyRequests(String),

    #[error("{0}")]
    Internal(String),

    #[error("{0}")]
    BadGateway(String),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    /// Logs `cause` server-side and returns a 500 carrying only `message`.
    pub fn internal(message: &str, cause: impl std::fmt::Display) -> Self {
        log::error!("{}: {}", message, cause);
        ApiError::Internal(message.to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::TooManyRequests(_) => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::BadGateway(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl From<FetchError> for ApiError {
    fn from(error: FetchError) -> Self {
        if error.is_client_error() {
            ApiError::BadRequest(error.to_string())
        } else {
            log::warn!("Upstream fetch failed: {}", error);
            ApiError::BadGateway(error.to_string())
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

/// Request outcome buckets tracked by `RequestStats`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum OutcomeType {
    Success,
    Redirect,
    BadRequest,
    Forbidden,
    NotFound,
    RateLimited,
    OtherClientError,
    InternalError,
    UpstreamError,
}

impl std::fmt::Display for OutcomeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl OutcomeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutcomeType::Success => "success",
            OutcomeType::Redirect => "redirect",
            OutcomeType::BadRequest => "bad_request",
            OutcomeType::Forbidden => "forbidden",
            OutcomeType::NotFound => "not_found",
            OutcomeType::RateLimited => "rate_limited",
            OutcomeType::OtherClientError => "other_client_error",
            OutcomeType::InternalError => "internal_error",
            OutcomeType::UpstreamError => "upstream_error",
        }
    }

    /// Whether this outcome counts as a failed request.
    pub fn is_failure(&self) -> bool {
        !matches!(self, OutcomeType::Success | OutcomeType::Redirect)
    }
}
