//! Request construction and response classification for the supervisor API.
//!
//! # Overview
//! Turns a logical operation (section, command template, path parameters)
//! into a resolved URL and a plain-data `HttpRequest`, and classifies the
//! HTTP result into success, expected failure or unexpected failure. The
//! network round-trip itself is performed by a caller-supplied `Transport`.
//!
//! # Design
//! - `Settings` is resolved once (default → file → env → flag) and is
//!   immutable afterwards.
//! - `build_url` validates the `{placeholder}` template before substituting.
//! - `SupervisorClient` builds requests; `classify` owns the 200/400 policy
//!   so no subcommand can drift from it.

pub mod client;
pub mod error;
pub mod http;
pub mod outcome;
pub mod settings;
pub mod template;

pub use client::{Operation, SupervisorClient};
pub use error::{ApiError, ErrorKind};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport};
pub use outcome::{classify, Outcome};
pub use settings::{ConfigFileStatus, LoadError, Overrides, Settings};
pub use template::{build_url, CommandTemplate};
