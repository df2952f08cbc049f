//! Blocking HTTP transport backed by ureq.
//!
//! ureq is configured not to turn 4xx/5xx into errors, so every status
//! reaches the classifier as data. Only failures to obtain a response map
//! to `ApiError::Transport`, carrying ureq's message unchanged.

use std::{io::Read, time::Duration};

use hassio_core::{ApiError, HttpMethod, HttpRequest, HttpResponse, Transport};
use ureq::{Agent, RequestBuilder};

#[derive(Debug, Default, Clone, Copy)]
pub struct UreqTransport;

impl UreqTransport {
    fn agent(timeout: Option<Duration>) -> Agent {
        Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(timeout)
            .build()
            .new_agent()
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        let agent = Self::agent(request.timeout);
        let headers = &request.headers;

        let result = match request.method {
            HttpMethod::Get => with_headers(agent.get(&request.url), headers).call(),
            HttpMethod::Delete => with_headers(agent.delete(&request.url), headers).call(),
            HttpMethod::Post => {
                let builder = with_headers(agent.post(&request.url), headers);
                match request.body.as_deref() {
                    Some(body) => builder.send(body),
                    None => builder.send_empty(),
                }
            }
        };

        let mut response = result.map_err(|err| ApiError::Transport(err.to_string()))?;
        let status = response.status().as_u16();

        let mut body = Vec::new();
        response
            .body_mut()
            .as_reader()
            .read_to_end(&mut body)
            .map_err(|err| ApiError::Transport(err.to_string()))?;

        Ok(HttpResponse { status, body })
    }
}

fn with_headers<B>(mut builder: RequestBuilder<B>, headers: &[(String, String)]) -> RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}
