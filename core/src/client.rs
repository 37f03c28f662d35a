//! The `Client` facade.
//!
//! # Design
//! `Client` owns nothing but read-only configuration: the adapter chosen at
//! construction and the redirection-tool prefix. It is `Send + Sync`, so one
//! instance can serve many threads; each call is a single blocking
//! round-trip with no retries.

use std::sync::Arc;

use tracing::debug;

use crate::adapter::Adapter;
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::transport::{Transport, UreqTransport};
use crate::types::{FormatKind, ShortUrl};

/// Client for the xav.cc URL-shortening API.
#[derive(Debug, Clone)]
pub struct Client {
    adapter: Adapter,
    redirection_tool: String,
}

impl Client {
    /// Client for `format` against the public service.
    ///
    /// Fails with `ClientError::InvalidFormat` unless `format` is `json`,
    /// `simple` or `xml`.
    pub fn new(format: &str) -> Result<Self, ClientError> {
        Self::with_config(format, ClientConfig::default())
    }

    pub fn with_config(format: &str, config: ClientConfig) -> Result<Self, ClientError> {
        let kind: FormatKind = format.parse()?;
        let transport = Arc::new(UreqTransport::new(&config));
        Ok(Self::from_parts(kind, &config, transport))
    }

    /// Client over a caller-supplied transport. The format is validated
    /// before the transport is touched.
    pub fn with_transport(
        format: &str,
        config: &ClientConfig,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, ClientError> {
        let kind: FormatKind = format.parse()?;
        Ok(Self::from_parts(kind, config, transport))
    }

    pub fn from_parts(kind: FormatKind, config: &ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            adapter: Adapter::new(kind, config.base_url(), transport),
            redirection_tool: config.redirection_tool.clone(),
        }
    }

    pub fn format(&self) -> FormatKind {
        self.adapter.kind()
    }

    /// Shorten `long_url`, optionally asking for `alias`.
    pub fn encode(&self, long_url: &str, alias: Option<&str>) -> Option<String> {
        debug!(format = %self.format(), long_url, alias, "encode");
        self.adapter.encode(long_url, alias)
    }

    /// Long URL behind `alias`. A full short link such as
    /// `http://xav.cc/abc123` is accepted too.
    pub fn decode(&self, alias: &str) -> Option<String> {
        let alias = self.strip_redirection_tool(alias);
        debug!(format = %self.format(), alias, "decode");
        self.adapter.decode(alias)
    }

    /// Whole record behind `alias`. Only the rest-style formats report
    /// anything beyond the long URL.
    pub fn lookup(&self, alias: &str) -> Option<ShortUrl> {
        let alias = self.strip_redirection_tool(alias);
        debug!(format = %self.format(), alias, "lookup");
        self.adapter.lookup(alias)
    }

    fn strip_redirection_tool<'a>(&self, alias: &'a str) -> &'a str {
        alias.strip_prefix(self.redirection_tool.as_str()).unwrap_or(alias)
    }
}
