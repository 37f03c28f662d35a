//! Domain values for the shortening API.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::ClientError;

/// Wire format a `Client` speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FormatKind {
    #[default]
    Json,
    Simple,
    Xml,
}

impl FormatKind {
    pub const ALL: [FormatKind; 3] = [FormatKind::Json, FormatKind::Simple, FormatKind::Xml];

    pub fn as_str(self) -> &'static str {
        match self {
            FormatKind::Json => "json",
            FormatKind::Simple => "simple",
            FormatKind::Xml => "xml",
        }
    }

    /// Path segment of the service this format talks to.
    pub fn service_path(self) -> &'static str {
        match self {
            FormatKind::Json => "sf_short_url.json",
            FormatKind::Simple => "simple",
            FormatKind::Xml => "sf_short_url.xml",
        }
    }
}

impl fmt::Display for FormatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormatKind {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(FormatKind::Json),
            "simple" => Ok(FormatKind::Simple),
            "xml" => Ok(FormatKind::Xml),
            other => Err(ClientError::InvalidFormat(other.to_string())),
        }
    }
}

/// Payload of an encode call. Field order is the wire order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShortenRequest {
    pub longurl: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shorturl: Option<String>,
}

impl ShortenRequest {
    /// An empty alias counts as no alias.
    pub fn new(long_url: &str, alias: Option<&str>) -> Self {
        Self {
            longurl: long_url.to_string(),
            shorturl: alias.filter(|a| !a.is_empty()).map(str::to_string),
        }
    }

    /// `(key, value)` pairs in wire order, skipping an absent alias.
    pub fn fields(&self) -> Vec<(&'static str, &str)> {
        let mut fields = vec![("longurl", self.longurl.as_str())];
        if let Some(alias) = &self.shorturl {
            fields.push(("shorturl", alias.as_str()));
        }
        fields
    }
}

/// One record as returned by the rest-style endpoints.
///
/// Every field is optional because the service is free to omit any of them;
/// the simple endpoints only ever fill `longurl`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ShortUrl {
    pub shorturl: Option<String>,
    pub longurl: Option<String>,
    pub viewcount: Option<String>,
    pub last_visited_at: Option<String>,
}
