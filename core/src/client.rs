//! Request factory and call driver for the supervisor API.
//!
//! # Design
//! `SupervisorClient` is built once from [`Settings`] and carries only what
//! every request needs: the endpoint, the optional auth header and the
//! timeout. `build_request` turns an [`Operation`] plus path parameters into
//! an `HttpRequest` without touching the network; `call` hands that request
//! to a [`Transport`] and classifies whatever comes back.

use tracing::debug;

use crate::error::ApiError;
use crate::http::{with_default_scheme, HttpMethod, HttpRequest, Transport};
use crate::outcome::{classify, Outcome};
use crate::settings::Settings;
use crate::template::build_url;

pub const DEFAULT_ACCEPT: &str = "application/json";

/// A fixed supervisor endpoint, as declared by a subcommand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operation {
    pub method: HttpMethod,
    pub section: &'static str,
    pub command: &'static str,
    /// Overrides the default `Accept` header.
    pub accept: Option<&'static str>,
}

impl Operation {
    pub const fn get(section: &'static str, command: &'static str) -> Self {
        Self {
            method: HttpMethod::Get,
            section,
            command,
            accept: None,
        }
    }

    pub const fn accept(mut self, accept: &'static str) -> Self {
        self.accept = Some(accept);
        self
    }
}

/// Stateless client for the supervisor API.
#[derive(Debug, Clone)]
pub struct SupervisorClient {
    endpoint: String,
    auth: Option<(String, String)>,
    timeout: Option<std::time::Duration>,
}

impl SupervisorClient {
    pub fn new(settings: &Settings) -> Self {
        let auth = settings
            .api_token
            .as_deref()
            .filter(|token| !token.is_empty())
            .map(|token| (settings.auth.name.clone(), settings.auth.value(token)));
        Self {
            endpoint: settings.endpoint.clone(),
            auth,
            timeout: settings.timeout,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn build_request(
        &self,
        operation: &Operation,
        params: &[(&str, &str)],
    ) -> Result<HttpRequest, ApiError> {
        let url = build_url(&self.endpoint, operation.section, operation.command, params)?;

        let mut headers = vec![(
            "accept".to_string(),
            operation.accept.unwrap_or(DEFAULT_ACCEPT).to_string(),
        )];
        if let Some((name, value)) = &self.auth {
            headers.push((name.clone(), value.clone()));
        }

        let request = HttpRequest {
            method: operation.method,
            url: with_default_scheme(&url),
            headers,
            body: None,
            timeout: self.timeout,
        };
        debug!(
            method = request.method.as_str(),
            url = %request.url,
            authenticated = self.auth.is_some(),
            "built supervisor request"
        );
        Ok(request)
    }

    /// Build, execute and classify one request.
    ///
    /// Build failures become [`Outcome::UnexpectedFailure`] without reaching
    /// the transport.
    pub fn call<T: Transport + ?Sized>(
        &self,
        transport: &T,
        operation: &Operation,
        params: &[(&str, &str)],
    ) -> Outcome {
        let result = self
            .build_request(operation, params)
            .and_then(|request| transport.execute(&request));
        classify(result)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::time::Duration;

    use super::*;
    use crate::http::HttpResponse;
    use crate::settings::AuthHeader;

    const LOGS: Operation = Operation::get("addons", "{slug}/logs").accept("text/plain");

    fn settings(endpoint: &str, token: Option<&str>) -> Settings {
        Settings {
            endpoint: endpoint.to_string(),
            api_token: token.map(str::to_string),
            ..Settings::default()
        }
    }

    #[test]
    fn builds_get_with_text_accept() {
        let client = SupervisorClient::new(&settings("http://localhost:3000", None));
        let req = client.build_request(&LOGS, &[("slug", "core_ssh")]).unwrap();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:3000/addons/core_ssh/logs");
        assert_eq!(req.headers, vec![("accept".to_string(), "text/plain".to_string())]);
        assert!(req.body.is_none());
        assert!(req.timeout.is_none());
    }

    #[test]
    fn default_endpoint_is_requested_over_http() {
        let client = SupervisorClient::new(&Settings::default());
        let req = client.build_request(&LOGS, &[("slug", "core_ssh")]).unwrap();
        assert_eq!(req.url, "http://hassio/addons/core_ssh/logs");
        assert_eq!(client.endpoint(), "hassio");
    }

    #[test]
    fn scheme_like_slug_still_gets_http_prefix() {
        let client = SupervisorClient::new(&Settings::default());
        let req = client.build_request(&LOGS, &[("slug", "a://b")]).unwrap();
        assert_eq!(req.url, "http://hassio/addons/a://b/logs");
    }

    #[test]
    fn empty_slug_is_rejected_before_sending() {
        let client = SupervisorClient::new(&Settings::default());
        let outcome = client.call(
            &|_: &HttpRequest| -> Result<HttpResponse, ApiError> { panic!("request must not be sent") },
            &LOGS,
            &[("slug", "")],
        );
        assert_eq!(
            outcome,
            Outcome::UnexpectedFailure(ApiError::InvalidPathParam("slug".to_string()))
        );
    }

    #[test]
    fn accept_defaults_to_json() {
        let info = Operation::get("addons", "{slug}/info");
        let client = SupervisorClient::new(&settings("hassio", None));
        let req = client.build_request(&info, &[("slug", "a")]).unwrap();
        assert_eq!(req.header("accept"), Some(DEFAULT_ACCEPT));
    }

    #[test]
    fn token_adds_bearer_header() {
        let client = SupervisorClient::new(&settings("hassio", Some("s3cret")));
        let req = client.build_request(&LOGS, &[("slug", "a")]).unwrap();
        assert_eq!(req.header("authorization"), Some("Bearer s3cret"));
    }

    #[test]
    fn empty_token_sends_no_auth_header() {
        let client = SupervisorClient::new(&settings("hassio", Some("")));
        let req = client.build_request(&LOGS, &[("slug", "a")]).unwrap();
        assert_eq!(req.headers.len(), 1);
    }

    #[test]
    fn auth_header_follows_settings() {
        let settings = Settings {
            api_token: Some("k".to_string()),
            auth: AuthHeader {
                name: "X-Hassio-Key".to_string(),
                scheme: String::new(),
            },
            ..Settings::default()
        };
        let req = SupervisorClient::new(&settings)
            .build_request(&LOGS, &[("slug", "a")])
            .unwrap();
        assert_eq!(req.header("x-hassio-key"), Some("k"));
        assert_eq!(req.header("authorization"), None);
    }

    #[test]
    fn timeout_is_threaded_into_request() {
        let settings = Settings {
            timeout: Some(Duration::from_secs(5)),
            ..Settings::default()
        };
        let req = SupervisorClient::new(&settings)
            .build_request(&LOGS, &[("slug", "a")])
            .unwrap();
        assert_eq!(req.timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn post_operations_keep_their_method() {
        let restart = Operation {
            method: HttpMethod::Post,
            ..Operation::get("addons", "{slug}/restart")
        };
        let req = SupervisorClient::new(&Settings::default())
            .build_request(&restart, &[("slug", "a")])
            .unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "http://hassio/addons/a/restart");
    }

    #[test]
    fn call_classifies_transport_response() {
        let client = SupervisorClient::new(&settings("hassio", None));
        let transport = |req: &HttpRequest| -> Result<HttpResponse, ApiError> {
            assert_eq!(req.url, "http://hassio/addons/core_ssh/logs");
            Ok(HttpResponse {
                status: 200,
                body: b"started".to_vec(),
            })
        };
        let outcome = client.call(&transport, &LOGS, &[("slug", "core_ssh")]);
        assert_eq!(outcome.body(), Some(&b"started"[..]));
    }

    #[test]
    fn build_errors_never_reach_the_transport() {
        let calls = Cell::new(0);
        let transport = |_: &HttpRequest| -> Result<HttpResponse, ApiError> {
            calls.set(calls.get() + 1);
            Ok(HttpResponse {
                status: 200,
                body: Vec::new(),
            })
        };

        let client = SupervisorClient::new(&settings("", None));
        let outcome = client.call(&transport, &LOGS, &[("slug", "a")]);
        assert!(matches!(
            outcome,
            Outcome::UnexpectedFailure(ApiError::InvalidEndpoint { .. })
        ));

        let client = SupervisorClient::new(&settings("hassio", None));
        let outcome = client.call(&transport, &LOGS, &[]);
        assert_eq!(
            outcome,
            Outcome::UnexpectedFailure(ApiError::MissingPathParam("slug".to_string()))
        );
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn repeated_calls_classify_identically() {
        let client = SupervisorClient::new(&settings("hassio", None));
        let transport = |_: &HttpRequest| -> Result<HttpResponse, ApiError> {
            Ok(HttpResponse {
                status: 400,
                body: b"not installed".to_vec(),
            })
        };
        let first = client.call(&transport, &LOGS, &[("slug", "missing")]);
        let second = client.call(&transport, &LOGS, &[("slug", "missing")]);
        assert_eq!(first, second);
        assert!(matches!(first, Outcome::ExpectedFailure { status: 400, .. }));
    }
}
