//! Format adapters.
//!
//! # Design
//! `Adapter` is a closed enum over the three wire formats, picked once from
//! a `FormatKind`. The JSON and XML variants are the same `RestAdapter`
//! driven by different `Codec`s; the simple variant talks its own
//! plain-text protocol. All of them report failure as `None`.

mod json;
mod rest;
mod simple;
mod xml;

use std::sync::Arc;

pub use json::JsonCodec;
pub use rest::RestAdapter;
pub use simple::SimpleAdapter;
pub use xml::XmlCodec;

use crate::transport::Transport;
use crate::types::{FormatKind, ShortUrl, ShortenRequest};

/// Serialization half of a rest-style format.
pub trait Codec {
    const FORMAT: FormatKind;

    /// Render the request that goes into the `content` form field.
    fn encode_request(request: &ShortenRequest) -> Option<String>;

    /// Records in document order. Anything unparseable yields no records.
    fn decode_response(body: &str) -> Vec<ShortUrl>;
}

/// The adapter a `Client` delegates to.
#[derive(Debug, Clone)]
pub enum Adapter {
    Json(RestAdapter<JsonCodec>),
    Simple(SimpleAdapter),
    Xml(RestAdapter<XmlCodec>),
}

impl Adapter {
    pub fn new(kind: FormatKind, base_url: &str, transport: Arc<dyn Transport>) -> Self {
        match kind {
            FormatKind::Json => Adapter::Json(RestAdapter::new(base_url, transport)),
            FormatKind::Simple => Adapter::Simple(SimpleAdapter::new(base_url, transport)),
            FormatKind::Xml => Adapter::Xml(RestAdapter::new(base_url, transport)),
        }
    }

    pub fn kind(&self) -> FormatKind {
        match self {
            Adapter::Json(_) => FormatKind::Json,
            Adapter::Simple(_) => FormatKind::Simple,
            Adapter::Xml(_) => FormatKind::Xml,
        }
    }

    pub fn encode(&self, long_url: &str, alias: Option<&str>) -> Option<String> {
        match self {
            Adapter::Json(a) => a.encode(long_url, alias),
            Adapter::Simple(a) => a.encode(long_url, alias),
            Adapter::Xml(a) => a.encode(long_url, alias),
        }
    }

    pub fn decode(&self, alias: &str) -> Option<String> {
        match self {
            Adapter::Json(a) => a.decode(alias),
            Adapter::Simple(a) => a.decode(alias),
            Adapter::Xml(a) => a.decode(alias),
        }
    }

    pub fn lookup(&self, alias: &str) -> Option<ShortUrl> {
        match self {
            Adapter::Json(a) => a.lookup(alias),
            Adapter::Simple(a) => a.lookup(alias),
            Adapter::Xml(a) => a.lookup(alias),
        }
    }
}

/// Percent-encode a query-string value.
pub(crate) fn query_value(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}
