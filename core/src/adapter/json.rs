use serde_json::{Map, Value};
use tracing::debug;

use super::Codec;
use crate::types::{FormatKind, ShortUrl, ShortenRequest};

/// `sf_short_url.json`: requests are a JSON object, responses a JSON array
/// of records.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    const FORMAT: FormatKind = FormatKind::Json;

    fn encode_request(request: &ShortenRequest) -> Option<String> {
        serde_json::to_string(request)
            .map_err(|e| debug!(error = %e, "could not serialize request"))
            .ok()
    }

    fn decode_response(body: &str) -> Vec<ShortUrl> {
        match serde_json::from_str::<Value>(body) {
            Ok(Value::Array(items)) => items.iter().map(record).collect(),
            Ok(_) => Vec::new(),
            Err(e) => {
                debug!(error = %e, "malformed json response");
                Vec::new()
            }
        }
    }
}

fn record(item: &Value) -> ShortUrl {
    let Some(object) = item.as_object() else {
        return ShortUrl::default();
    };
    ShortUrl {
        shorturl: text(object, "shorturl"),
        longurl: text(object, "longurl"),
        viewcount: text(object, "viewcount"),
        last_visited_at: text(object, "last_visited_at"),
    }
}

/// Scalars as text; `null`, arrays and objects count as absent.
fn text(object: &Map<String, Value>, key: &str) -> Option<String> {
    match object.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::adapter::RestAdapter;
    use crate::http::{HttpMethod, HttpResponse};
    use crate::transport::testing::RecordingTransport;

    fn adapter(responses: Vec<HttpResponse>) -> (RestAdapter<JsonCodec>, Arc<RecordingTransport>) {
        let transport = Arc::new(RecordingTransport::new(responses));
        (RestAdapter::new("http://api.test", transport.clone()), transport)
    }

    #[test]
    fn request_with_alias() {
        let req = ShortenRequest::new("http://example.com", Some("foo"));
        assert_eq!(
            JsonCodec::encode_request(&req).unwrap(),
            r#"{"longurl":"http://example.com","shorturl":"foo"}"#
        );
    }

    #[test]
    fn request_without_alias() {
        let req = ShortenRequest::new("http://example.com", None);
        assert_eq!(
            JsonCodec::encode_request(&req).unwrap(),
            r#"{"longurl":"http://example.com"}"#
        );
    }

    #[test]
    fn response_records_in_order() {
        let body = r#"[
            {"shorturl":"a","longurl":"http://a.test","viewcount":3,"last_visited_at":"2010-01-01 10:00:00"},
            {"shorturl":"b","longurl":"http://b.test","viewcount":"0","last_visited_at":null}
        ]"#;
        let records = JsonCodec::decode_response(body);
        assert_eq!(records.len(), 2);
        assert_eq!(
            records[0],
            ShortUrl {
                shorturl: Some("a".into()),
                longurl: Some("http://a.test".into()),
                viewcount: Some("3".into()),
                last_visited_at: Some("2010-01-01 10:00:00".into()),
            }
        );
        assert_eq!(records[1].viewcount.as_deref(), Some("0"));
        assert_eq!(records[1].last_visited_at, None);
    }

    #[test]
    fn malformed_or_non_array_yields_nothing() {
        assert!(JsonCodec::decode_response("not json").is_empty());
        assert!(JsonCodec::decode_response("").is_empty());
        assert!(JsonCodec::decode_response(r#"{"longurl":"x"}"#).is_empty());
    }

    #[test]
    fn decode_builds_lookup_url() {
        let (adapter, transport) =
            adapter(vec![HttpResponse::ok(r#"[{"longurl":"http://example.com"}]"#)]);
        assert_eq!(adapter.decode("abc123").as_deref(), Some("http://example.com"));

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, HttpMethod::Get);
        assert_eq!(requests[0].url, "http://api.test/sf_short_url.json?shorturl=abc123");
    }

    #[test]
    fn decode_of_empty_array_fails() {
        let (adapter, _) = adapter(vec![HttpResponse::ok("[]")]);
        assert_eq!(adapter.decode("abc123"), None);
    }

    #[test]
    fn decode_without_longurl_fails() {
        let (adapter, _) = adapter(vec![HttpResponse::ok(r#"[{"shorturl":"abc123"}]"#)]);
        assert_eq!(adapter.decode("abc123"), None);
    }

    #[test]
    fn encode_posts_content_field() {
        let (adapter, transport) = adapter(vec![HttpResponse::ok(
            r#"[{"shorturl":"foo","longurl":"http://example.com"}]"#,
        )]);
        assert_eq!(adapter.encode("http://example.com", Some("foo")).as_deref(), Some("foo"));

        let requests = transport.requests();
        assert_eq!(requests[0].method, HttpMethod::Post);
        assert_eq!(requests[0].url, "http://api.test/sf_short_url.json");
        assert_eq!(
            requests[0].form_fields(),
            vec![(
                "content".to_string(),
                r#"{"longurl":"http://example.com","shorturl":"foo"}"#.to_string()
            )]
        );
    }

    #[test]
    fn encode_with_empty_shorturl_fails() {
        let (adapter, _) = adapter(vec![HttpResponse::ok(r#"[{"shorturl":""}]"#)]);
        assert_eq!(adapter.encode("http://example.com", None), None);
    }

    #[test]
    fn server_error_fails_both_ways() {
        let (adapter, _) = adapter(vec![
            HttpResponse::with_status(500, r#"[{"shorturl":"x","longurl":"y"}]"#),
            HttpResponse::with_status(500, r#"[{"shorturl":"x","longurl":"y"}]"#),
        ]);
        assert_eq!(adapter.encode("http://example.com", None), None);
        assert_eq!(adapter.decode("x"), None);
    }
}
