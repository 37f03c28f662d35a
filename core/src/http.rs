//! HTTP request/response values exchanged with a `Transport`.
//!
//! # Design
//! Adapters describe what they want as an `HttpRequest` and get back an
//! `HttpResponse` as plain data. Deciding whether a response counts as a
//! success lives here too, so every transport gets the same status
//! discipline and tests can feed canned responses without a socket.

use tracing::{debug, warn};

use crate::transport::Transport;

pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// An HTTP request described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn get(url: String) -> Self {
        Self {
            method: HttpMethod::Get,
            url,
            headers: Vec::new(),
            body: None,
        }
    }

    /// A POST whose body is a single form-encoded `content` field.
    pub fn post_content(url: String, content: &str) -> Self {
        let body = serde_urlencoded::to_string(&[("content", content)]).unwrap_or_default();
        Self {
            method: HttpMethod::Post,
            url,
            headers: vec![("content-type".to_string(), FORM_CONTENT_TYPE.to_string())],
            body: Some(body),
        }
    }

    /// Decode the form body back into its fields. Empty when there is no body.
    pub fn form_fields(&self) -> Vec<(String, String)> {
        self.body
            .as_deref()
            .and_then(|body| serde_urlencoded::from_str(body).ok())
            .unwrap_or_default()
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub fn with_status(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Execute `request` and keep the body only if the server answered 200.
///
/// Every other status, and every transport error, becomes `None`.
pub fn call(transport: &dyn Transport, request: HttpRequest) -> Option<String> {
    debug!(method = ?request.method, url = %request.url, "sending request");
    let url = request.url.clone();
    match transport.execute(request) {
        Ok(response) => check_status(&url, response),
        Err(err) => {
            warn!(error = %err, "transport failure");
            None
        }
    }
}

pub fn get(transport: &dyn Transport, url: String) -> Option<String> {
    call(transport, HttpRequest::get(url))
}

pub fn post(transport: &dyn Transport, url: String, content: &str) -> Option<String> {
    call(transport, HttpRequest::post_content(url, content))
}

fn check_status(url: &str, response: HttpResponse) -> Option<String> {
    if response.status == 200 {
        return Some(response.body);
    }
    debug!(status = response.status, url, "non-success status");
    None
}
