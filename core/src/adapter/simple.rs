use std::fmt;
use std::sync::Arc;

use super::query_value;
use crate::http;
use crate::transport::Transport;
use crate::types::{FormatKind, ShortUrl};

/// Adapter for the plain-text `simple/encode` and `simple/decode` endpoints.
///
/// Bodies are handed back exactly as received.
#[derive(Clone)]
pub struct SimpleAdapter {
    endpoint: String,
    transport: Arc<dyn Transport>,
}

impl SimpleAdapter {
    pub fn new(base_url: &str, transport: Arc<dyn Transport>) -> Self {
        Self {
            endpoint: format!("{base_url}/{}", FormatKind::Simple.service_path()),
            transport,
        }
    }

    pub fn decode(&self, alias: &str) -> Option<String> {
        let url = format!("{}/decode?url={}", self.endpoint, query_value(alias));
        http::get(self.transport.as_ref(), url)
    }

    pub fn encode(&self, long_url: &str, alias: Option<&str>) -> Option<String> {
        let mut url = format!("{}/encode?url={}", self.endpoint, query_value(long_url));
        if let Some(alias) = alias.filter(|a| !a.is_empty()) {
            url.push_str("&alias=");
            url.push_str(&query_value(alias));
        }
        http::get(self.transport.as_ref(), url)
    }

    /// The plain-text protocol only knows the long URL.
    pub fn lookup(&self, alias: &str) -> Option<ShortUrl> {
        self.decode(alias).map(|longurl| ShortUrl {
            longurl: Some(longurl),
            ..ShortUrl::default()
        })
    }
}

impl fmt::Debug for SimpleAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimpleAdapter")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}
