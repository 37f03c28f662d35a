//! Blocking client for the xav.cc URL-shortening API.
//!
//! # Overview
//! Encodes long URLs into short aliases and decodes aliases back into long
//! URLs over one of three wire formats: JSON, XML or the plain-text
//! "simple" protocol.
//!
//! # Design
//! - `Client` picks an `Adapter` from a `FormatKind` once, at construction.
//!   An unknown format is the only error a caller ever sees.
//! - JSON and XML share `RestAdapter`, parameterised by a `Codec`; the
//!   simple format has its own adapter.
//! - Adapters build `HttpRequest` values and hand them to a `Transport`.
//!   Any status other than 200, any network error, any unparseable body and
//!   any missing field all surface as `None`. The failure signal is
//!   intentionally coarse.
//! - `UreqTransport` is the default transport. TLS verification stays on
//!   unless `ClientConfig::insecure_tls` is set.

pub mod adapter;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod transport;
pub mod types;

pub use adapter::{Adapter, Codec, JsonCodec, RestAdapter, SimpleAdapter, XmlCodec};
pub use client::Client;
pub use config::ClientConfig;
pub use error::{ClientError, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use transport::{Transport, UreqTransport};
pub use types::{FormatKind, ShortUrl, ShortenRequest};
