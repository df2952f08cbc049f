//! Classification of a finished round-trip into a tri-state outcome.
//!
//! The supervisor answers 200 for success and reports known domain
//! conditions (add-on not installed, no changelog) with a 400 and a body
//! worth showing. Every other status, and every transport failure, is an
//! operational anomaly: it is logged at error level and ends the command
//! with a nonzero exit code.

use tracing::error;

use crate::error::ApiError;
use crate::http::HttpResponse;

/// Result of one supervisor call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success { status: u16, body: Vec<u8> },
    ExpectedFailure { status: u16, body: Vec<u8> },
    UnexpectedFailure(ApiError),
}

impl Outcome {
    /// `true` only for [`Outcome::UnexpectedFailure`].
    pub fn is_error(&self) -> bool {
        matches!(self, Outcome::UnexpectedFailure(_))
    }

    /// Body to print, when the outcome carries one.
    pub fn body(&self) -> Option<&[u8]> {
        match self {
            Outcome::Success { body, .. } | Outcome::ExpectedFailure { body, .. } => {
                Some(body.as_slice())
            }
            Outcome::UnexpectedFailure(_) => None,
        }
    }
}

/// Classify a transport result.
pub fn classify(result: Result<HttpResponse, ApiError>) -> Outcome {
    let outcome = match result {
        Err(err) => Outcome::UnexpectedFailure(err),
        Ok(HttpResponse { status: 200, body }) => Outcome::Success { status: 200, body },
        Ok(HttpResponse { status: 400, body }) => Outcome::ExpectedFailure { status: 400, body },
        Ok(HttpResponse { status, body }) => {
            Outcome::UnexpectedFailure(ApiError::UnexpectedStatus { status, body })
        }
    };

    if let Outcome::UnexpectedFailure(err) = &outcome {
        match err {
            ApiError::UnexpectedStatus { status, .. } => {
                error!(status = *status, "unexpected server response (HTTP {status})");
            }
            other => error!(kind = ?other.kind(), "{other}"),
        }
    }

    outcome
}
