//! Error types for the xav.cc client.
//!
//! # Design
//! Only construction can fail loudly. Once a `Client` exists, every
//! encode/decode failure (bad status, unreachable host, malformed body,
//! missing field) collapses into `None`, so these types never reach the
//! caller of an operation. `TransportError` is what a `Transport`
//! implementation reports for I/O problems; the core logs it and discards it.

use thiserror::Error;

/// Errors returned while building a `Client`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClientError {
    /// The requested wire format is not one of `json`, `simple` or `xml`.
    #[error("the format of the call can only be json, simple or xml (got {0:?})")]
    InvalidFormat(String),
}

/// A request could not complete at the network level.
///
/// HTTP error statuses are not transport errors: they come back as an
/// `HttpResponse` and are judged by the core.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request to {url} failed: {message}")]
    Request { url: String, message: String },

    #[error("response from {url} could not be read: {message}")]
    Body { url: String, message: String },
}
