//! Client configuration.
//!
//! Defaults point at the public xav.cc service. `from_env` overlays
//! `XAVCC_*` environment variables on top of the defaults.

use std::time::Duration;

use tracing::warn;

pub const DEFAULT_SERVER: &str = "http://api.xav.cc/";
pub const DEFAULT_REDIRECTION_TOOL: &str = "http://xav.cc/";
pub const DEFAULT_USER_AGENT: &str = "xavccClient/0.1";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_MAX_REDIRECTS: u32 = 10;

/// Everything a `Client` and its transport need to know up front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the API. A trailing `/` is ignored.
    pub server: String,
    /// Public short-link prefix stripped from aliases before decoding.
    pub redirection_tool: String,
    pub user_agent: String,
    pub timeout: Duration,
    pub max_redirects: u32,
    /// Skip TLS certificate and hostname verification. Off unless asked for.
    pub insecure_tls: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server: DEFAULT_SERVER.to_string(),
            redirection_tool: DEFAULT_REDIRECTION_TOOL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: DEFAULT_TIMEOUT,
            max_redirects: DEFAULT_MAX_REDIRECTS,
            insecure_tls: false,
        }
    }
}

impl ClientConfig {
    /// Defaults overridden by `XAVCC_SERVER`, `XAVCC_REDIRECTION_TOOL`,
    /// `XAVCC_TIMEOUT_SECS` and `XAVCC_INSECURE_TLS`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(server) = lookup("XAVCC_SERVER") {
            config.server = server;
        }
        if let Some(prefix) = lookup("XAVCC_REDIRECTION_TOOL") {
            config.redirection_tool = prefix;
        }
        if let Some(raw) = lookup("XAVCC_TIMEOUT_SECS") {
            match raw.trim().parse::<u64>() {
                Ok(0) | Err(_) => warn!(value = %raw, "ignoring invalid XAVCC_TIMEOUT_SECS"),
                Ok(secs) => config.timeout = Duration::from_secs(secs),
            }
        }
        if let Some(raw) = lookup("XAVCC_INSECURE_TLS") {
            config.insecure_tls = matches!(raw.trim(), "1" | "true" | "yes");
        }
        config
    }

    pub fn with_server(mut self, server: impl Into<String>) -> Self {
        self.server = server.into();
        self
    }

    pub fn with_redirection_tool(mut self, prefix: impl Into<String>) -> Self {
        self.redirection_tool = prefix.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_insecure_tls(mut self, insecure: bool) -> Self {
        self.insecure_tls = insecure;
        self
    }

    /// The server URL without trailing slashes, ready for `{base}/{path}`.
    pub fn base_url(&self) -> &str {
        self.server.trim_end_matches('/')
    }
}
