//! Error types for the API layer.
//!
//! [`ApiError`] unifies all failure modes into a single enum that
//! converts into an HTTP response via its
//! [`IntoResponse`](axum::response::IntoResponse) implementation. Every
//! error body is the JSON envelope `{"error": "<message>"}`; internal
//! type names never leak to callers.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use vivarium_core::{BatchError, EngineError};
use vivarium_rules::{SampleError, ValidationError};
use vivarium_types::UnknownSummaryKind;

/// Errors that can occur while serving a simulation request.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A query parameter failed rule validation.
    #[error("{source}")]
    Validation {
        /// The underlying validation failure.
        #[from]
        source: ValidationError,
    },

    /// Random configuration sampling failed.
    #[error("{source}")]
    Sample {
        /// The underlying sampling failure.
        #[from]
        source: SampleError,
    },

    /// The requested summary kind does not exist.
    #[error("{source}")]
    SummaryKind {
        /// The underlying parse failure.
        #[from]
        source: UnknownSummaryKind,
    },

    /// The iterations path segment is not an integer.
    #[error("Error converting parameter iterations: {raw}")]
    InvalidIterations {
        /// The unparseable path segment.
        raw: String,
    },

    /// The batch runner rejected the request or did not converge.
    #[error("{source}")]
    Batch {
        /// The underlying batch failure.
        #[from]
        source: BatchError,
    },

    /// The engine failed on a single run.
    #[error("{source}")]
    Engine {
        /// The underlying engine failure.
        #[from]
        source: EngineError,
    },

    /// The whole-request deadline elapsed.
    #[error("Operation timed out.")]
    Timeout,
}

impl ApiError {
    /// The HTTP status this error maps to.
    fn status(&self) -> StatusCode {
        match self {
            Self::Validation { .. }
            | Self::SummaryKind { .. }
            | Self::InvalidIterations { .. }
            | Self::Batch {
                source: BatchError::InvalidIterationCount { .. },
            } => StatusCode::BAD_REQUEST,

            // A sampler configuration gap is a server defect; only a
            // failed validation of the drawn values is the caller's 400.
            Self::Sample {
                source: SampleError::Validation { .. },
            } => StatusCode::BAD_REQUEST,
            Self::Sample { .. } | Self::Engine { .. } => StatusCode::INTERNAL_SERVER_ERROR,

            Self::Batch {
                source: BatchError::Timeout { .. },
            }
            | Self::Timeout => StatusCode::GATEWAY_TIMEOUT,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = serde_json::json!({
            "error": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
