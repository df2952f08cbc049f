//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! Requests and responses are plain data. The core builds `HttpRequest`
//! values and classifies `HttpResponse` values; the network round-trip is
//! delegated to a [`Transport`] implementation supplied by the caller. Any
//! HTTP status is a successful round-trip from the transport's point of
//! view, only failures to obtain a response are errors.
//!
//! Bodies are raw bytes: the supervisor's log and changelog payloads are
//! printed as-is and never parsed.

use std::time::Duration;

use crate::error::ApiError;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// An HTTP request described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
    pub timeout: Option<Duration>,
}

impl HttpRequest {
    /// Look up a header value by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// Executes an [`HttpRequest`] against the network.
///
/// Implementations return `Err(ApiError::Transport(_))` only when no
/// response was received; 4xx and 5xx responses come back as `Ok`.
pub trait Transport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError>;
}

impl<F> Transport for F
where
    F: Fn(&HttpRequest) -> Result<HttpResponse, ApiError>,
{
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        self(request)
    }
}

/// Prefix `http://` when the endpoint names a bare host such as `hassio`.
///
/// Only a `scheme://` ahead of the first `/` counts, so a path segment that
/// happens to contain `://` does not suppress the prefix.
pub fn with_default_scheme(url: &str) -> String {
    match url.split_once("://") {
        Some((scheme, _)) if !scheme.is_empty() && !scheme.contains('/') => url.to_string(),
        _ => format!("http://{url}"),
    }
}
