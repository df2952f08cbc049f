//! Error types for the supervisor API client.
//!
//! # Design
//! One flat `ApiError` enum covers everything that can go wrong between
//! resolving a URL and classifying a response. `ErrorKind` groups the
//! variants into the four categories callers act on: configuration and
//! template problems are defects in how a command was wired, transport and
//! unexpected-status problems are operational and end the process with a
//! nonzero exit code.
//!
//! A 400 response is deliberately absent here: the supervisor reports known
//! domain conditions that way, and the classifier treats it as printable
//! output rather than an error.

use thiserror::Error;

/// Errors produced while building a request or classifying its response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The configured endpoint is empty or otherwise unusable.
    #[error("invalid endpoint: {reason}")]
    InvalidEndpoint { reason: String },

    /// The command template is empty or has malformed placeholders.
    #[error("invalid command template `{template}`: {reason}")]
    InvalidTemplate { template: String, reason: String },

    /// The template names a placeholder with no matching path parameter.
    #[error("missing path parameter `{0}`")]
    MissingPathParam(String),

    /// A path parameter value is empty or made only of slashes, so it would
    /// not name a path segment.
    #[error("empty value for path parameter `{0}`")]
    InvalidPathParam(String),

    /// A path parameter was supplied that the template never references.
    #[error("unknown path parameter `{0}`")]
    UnknownPathParam(String),

    /// The request never produced an HTTP response (DNS, refused, timeout).
    /// The message is the transport's own, unaltered.
    #[error("{0}")]
    Transport(String),

    /// The server answered with a status outside the 200/400 policy.
    #[error("unexpected server response: HTTP {status}")]
    UnexpectedStatus { status: u16, body: Vec<u8> },
}

/// Coarse category of an [`ApiError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Template,
    Transport,
    UnexpectedStatus,
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::InvalidEndpoint { .. } => ErrorKind::Configuration,
            ApiError::InvalidTemplate { .. }
            | ApiError::MissingPathParam(_)
            | ApiError::InvalidPathParam(_)
            | ApiError::UnknownPathParam(_) => ErrorKind::Template,
            ApiError::Transport(_) => ErrorKind::Transport,
            ApiError::UnexpectedStatus { .. } => ErrorKind::UnexpectedStatus,
        }
    }

    pub(crate) fn invalid_template(template: &str, reason: impl Into<String>) -> Self {
        ApiError::InvalidTemplate {
            template: template.to_string(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_message_is_surfaced_verbatim() {
        let err = ApiError::Transport("io: Connection refused".to_string());
        assert_eq!(err.to_string(), "io: Connection refused");
        assert_eq!(err.kind(), ErrorKind::Transport);
    }

    #[test]
    fn unexpected_status_mentions_the_code() {
        let err = ApiError::UnexpectedStatus {
            status: 502,
            body: Vec::new(),
        };
        assert!(err.to_string().contains("502"));
        assert_eq!(err.kind(), ErrorKind::UnexpectedStatus);
    }

    #[test]
    fn template_variants_share_a_kind() {
        assert_eq!(ApiError::MissingPathParam("slug".into()).kind(), ErrorKind::Template);
        assert_eq!(ApiError::UnknownPathParam("id".into()).kind(), ErrorKind::Template);
        assert_eq!(ApiError::InvalidPathParam("slug".into()).kind(), ErrorKind::Template);
        assert_eq!(
            ApiError::invalid_template("{slug", "unclosed").kind(),
            ErrorKind::Template
        );
    }
}
