use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use tracing::debug;

use super::{query_value, Codec};
use crate::http;
use crate::transport::Transport;
use crate::types::{ShortUrl, ShortenRequest};

/// Adapter for the `sf_short_url.{json,xml}` endpoints.
///
/// Lookups are `GET {endpoint}?shorturl={alias}`; creations are a `POST` of
/// the codec-rendered request in a form field named `content`. Only the
/// first record of a response is ever looked at.
pub struct RestAdapter<C> {
    endpoint: String,
    transport: Arc<dyn Transport>,
    codec: PhantomData<fn() -> C>,
}

impl<C: Codec> RestAdapter<C> {
    pub fn new(base_url: &str, transport: Arc<dyn Transport>) -> Self {
        Self {
            endpoint: format!("{base_url}/{}", C::FORMAT.service_path()),
            transport,
            codec: PhantomData,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// First record stored under `alias`.
    pub fn lookup(&self, alias: &str) -> Option<ShortUrl> {
        let url = format!("{}?shorturl={}", self.endpoint, query_value(alias));
        let body = http::get(self.transport.as_ref(), url)?;
        first_record::<C>(&body)
    }

    pub fn decode(&self, alias: &str) -> Option<String> {
        self.lookup(alias)?.longurl
    }

    /// Short URL the service assigned, or `None` if it reported none.
    pub fn encode(&self, long_url: &str, alias: Option<&str>) -> Option<String> {
        let request = ShortenRequest::new(long_url, alias);
        let content = C::encode_request(&request)?;
        let body = http::post(self.transport.as_ref(), self.endpoint.clone(), &content)?;
        first_record::<C>(&body)?
            .shorturl
            .filter(|shorturl| !shorturl.is_empty())
    }
}

fn first_record<C: Codec>(body: &str) -> Option<ShortUrl> {
    let record = C::decode_response(body).into_iter().next();
    if record.is_none() {
        debug!(format = %C::FORMAT, "response carried no record");
    }
    record
}

impl<C> Clone for RestAdapter<C> {
    fn clone(&self) -> Self {
        Self {
            endpoint: self.endpoint.clone(),
            transport: Arc::clone(&self.transport),
            codec: PhantomData,
        }
    }
}

impl<C> fmt::Debug for RestAdapter<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestAdapter")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}
