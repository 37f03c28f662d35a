//! The network seam.
//!
//! # Design
//! A `Transport` turns one `HttpRequest` into one `HttpResponse`. It does
//! not judge status codes; `http::call` does that for every transport
//! alike. `UreqTransport` is the blocking default. Tests inject their own.

use tracing::warn;
use ureq::tls::TlsConfig;
use ureq::{Agent, RequestBuilder};

use crate::config::ClientConfig;
use crate::error::TransportError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Executes a single HTTP round-trip.
pub trait Transport: Send + Sync + std::fmt::Debug {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Blocking transport backed by a ureq `Agent`.
///
/// Follows redirects up to the configured limit and never treats an HTTP
/// status as an error, so 4xx/5xx come back as data.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: Agent,
}

impl UreqTransport {
    pub fn new(config: &ClientConfig) -> Self {
        let mut builder = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(config.timeout))
            .max_redirects(config.max_redirects)
            .user_agent(config.user_agent.as_str());

        if config.insecure_tls {
            warn!("TLS certificate and hostname verification are disabled");
            builder = builder.tls_config(TlsConfig::builder().disable_verification(true).build());
        }

        Self {
            agent: builder.build().new_agent(),
        }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(&ClientConfig::default())
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let HttpRequest {
            method,
            url,
            headers,
            body,
        } = request;

        let result = match method {
            HttpMethod::Get => with_headers(self.agent.get(&url), &headers).call(),
            HttpMethod::Post => {
                let builder = with_headers(self.agent.post(&url), &headers);
                match body {
                    Some(body) => builder.send(body.as_bytes()),
                    None => builder.send_empty(),
                }
            }
        };

        let mut response = result.map_err(|e| TransportError::Request {
            url: url.clone(),
            message: e.to_string(),
        })?;

        let status = response.status().as_u16();
        let bytes = response
            .body_mut()
            .read_to_vec()
            .map_err(|e| TransportError::Body {
                url,
                message: e.to_string(),
            })?;
        // Invalid UTF-8 sequences become U+FFFD.
        let body = String::from_utf8(bytes)
            .unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned());

        Ok(HttpResponse { status, body })
    }
}

fn with_headers<B>(mut builder: RequestBuilder<B>, headers: &[(String, String)]) -> RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}
