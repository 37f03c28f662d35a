//! In-memory stand-in for the xav.cc API.
//!
//! Serves the JSON, XML and simple endpoints with the response shapes the
//! real service uses, backed by a `HashMap` keyed by alias.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Form, Json, Router,
};
use quick_xml::{escape::escape, events::Event, Reader};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};
use uuid::Uuid;

/// Public prefix of generated short links.
pub const SHORT_LINK_BASE: &str = "http://xav.cc/";

const ALIAS_LEN: usize = 6;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortUrl {
    pub shorturl: String,
    pub longurl: String,
    pub viewcount: u64,
    pub last_visited_at: Option<String>,
}

#[derive(Debug, Default, PartialEq, Eq, Deserialize)]
pub struct CreateShortUrl {
    pub longurl: String,
    #[serde(default)]
    pub shorturl: Option<String>,
}

pub type Db = Arc<RwLock<HashMap<String, ShortUrl>>>;

#[derive(Deserialize)]
struct LookupQuery {
    shorturl: String,
}

#[derive(Deserialize)]
struct ContentForm {
    content: String,
}

#[derive(Deserialize)]
struct SimpleQuery {
    url: String,
    #[serde(default)]
    alias: Option<String>,
}

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(HashMap::new()));
    Router::new()
        .route("/sf_short_url.json", get(json_lookup).post(json_create))
        .route("/sf_short_url.xml", get(xml_lookup).post(xml_create))
        .route("/simple/encode", get(simple_encode))
        .route("/simple/decode", get(simple_decode))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "mock xav.cc api listening");
    }
    axum::serve(listener, app()).await
}

async fn json_lookup(
    State(db): State<Db>,
    Query(query): Query<LookupQuery>,
) -> Result<Json<Vec<ShortUrl>>, StatusCode> {
    lookup(&db, &query.shorturl).await.map(|record| Json(vec![record]))
}

async fn json_create(
    State(db): State<Db>,
    Form(form): Form<ContentForm>,
) -> Result<Json<Vec<ShortUrl>>, StatusCode> {
    let input: CreateShortUrl =
        serde_json::from_str(&form.content).map_err(|_| StatusCode::BAD_REQUEST)?;
    create(&db, input).await.map(|record| Json(vec![record]))
}

async fn xml_lookup(
    State(db): State<Db>,
    Query(query): Query<LookupQuery>,
) -> Result<Response, StatusCode> {
    let record = lookup(&db, &query.shorturl).await?;
    Ok(xml_response(&[record]))
}

async fn xml_create(
    State(db): State<Db>,
    Form(form): Form<ContentForm>,
) -> Result<Response, StatusCode> {
    let input = parse_xml_request(&form.content).ok_or(StatusCode::BAD_REQUEST)?;
    let record = create(&db, input).await?;
    Ok(xml_response(&[record]))
}

async fn simple_encode(
    State(db): State<Db>,
    Query(query): Query<SimpleQuery>,
) -> Result<String, StatusCode> {
    let input = CreateShortUrl {
        longurl: query.url,
        shorturl: query.alias,
    };
    let record = create(&db, input).await?;
    Ok(format!("{SHORT_LINK_BASE}{}", record.shorturl))
}

async fn simple_decode(
    State(db): State<Db>,
    Query(query): Query<SimpleQuery>,
) -> Result<String, StatusCode> {
    lookup(&db, &query.url).await.map(|record| record.longurl)
}

async fn lookup(db: &Db, alias: &str) -> Result<ShortUrl, StatusCode> {
    db.read().await.get(alias).cloned().ok_or(StatusCode::NOT_FOUND)
}

/// Store a new short URL. A requested alias already pointing elsewhere is a
/// conflict; asking again for the same pair returns the existing record.
async fn create(db: &Db, input: CreateShortUrl) -> Result<ShortUrl, StatusCode> {
    let longurl = input.longurl.trim().to_string();
    if longurl.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }

    let mut records = db.write().await;
    let alias = match input.shorturl.map(|a| a.trim().to_string()).filter(|a| !a.is_empty()) {
        Some(alias) => match records.get(&alias) {
            Some(existing) if existing.longurl == longurl => return Ok(existing.clone()),
            Some(_) => return Err(StatusCode::CONFLICT),
            None => alias,
        },
        None => loop {
            let candidate = Uuid::new_v4().simple().to_string()[..ALIAS_LEN].to_string();
            if !records.contains_key(&candidate) {
                break candidate;
            }
        },
    };

    let record = ShortUrl {
        shorturl: alias.clone(),
        longurl,
        viewcount: 0,
        last_visited_at: None,
    };
    debug!(alias = %record.shorturl, longurl = %record.longurl, "created short url");
    records.insert(alias, record.clone());
    Ok(record)
}

/// Read `<SfShortUrl><Longurl/>[<Shorturl/>]</SfShortUrl>`, text or CDATA.
pub fn parse_xml_request(xml: &str) -> Option<CreateShortUrl> {
    let mut reader = Reader::from_str(xml);
    let mut input = CreateShortUrl::default();
    let mut current: Option<Vec<u8>> = None;
    let mut depth = 0usize;

    loop {
        match reader.read_event().ok()? {
            Event::Start(start) => {
                depth += 1;
                if depth == 2 {
                    current = Some(start.name().as_ref().to_vec());
                }
            }
            Event::End(_) => {
                if depth == 2 {
                    current = None;
                }
                depth = depth.checked_sub(1)?;
            }
            Event::Text(text) => {
                if let Some(tag) = &current {
                    let text = text.unescape().ok()?;
                    push_field(&mut input, tag, &text);
                }
            }
            Event::CData(cdata) => {
                if let Some(tag) = &current {
                    let bytes = cdata.into_inner();
                    push_field(&mut input, tag, &String::from_utf8_lossy(&bytes));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    (depth == 0 && !input.longurl.is_empty()).then_some(input)
}

fn push_field(input: &mut CreateShortUrl, tag: &[u8], text: &str) {
    match tag {
        b"Longurl" => input.longurl.push_str(text),
        b"Shorturl" => input.shorturl.get_or_insert_with(String::new).push_str(text),
        _ => {}
    }
}

pub fn render_xml(records: &[ShortUrl]) -> String {
    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<SfShortUrls>");
    for record in records {
        xml.push_str("<SfShortUrl>");
        xml.push_str(&format!("<Shorturl>{}</Shorturl>", escape(record.shorturl.as_str())));
        xml.push_str(&format!("<Longurl>{}</Longurl>", escape(record.longurl.as_str())));
        xml.push_str(&format!("<Viewcount>{}</Viewcount>", record.viewcount));
        match &record.last_visited_at {
            Some(at) => xml.push_str(&format!("<LastVisitedAt>{}</LastVisitedAt>", escape(at.as_str()))),
            None => xml.push_str("<LastVisitedAt/>"),
        }
        xml.push_str("</SfShortUrl>");
    }
    xml.push_str("</SfShortUrls>");
    xml
}

fn xml_response(records: &[ShortUrl]) -> Response {
    (
        [(header::CONTENT_TYPE, "text/xml; charset=utf-8")],
        render_xml(records),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> ShortUrl {
        ShortUrl {
            shorturl: "abc123".to_string(),
            longurl: "http://example.com/?a=1&b=2".to_string(),
            viewcount: 0,
            last_visited_at: None,
        }
    }

    #[test]
    fn record_serializes_to_json() {
        let json = serde_json::to_value(record()).unwrap();
        assert_eq!(json["shorturl"], "abc123");
        assert_eq!(json["longurl"], "http://example.com/?a=1&b=2");
        assert_eq!(json["viewcount"], 0);
        assert!(json["last_visited_at"].is_null());
    }

    #[test]
    fn create_accepts_missing_alias() {
        let input: CreateShortUrl = serde_json::from_str(r#"{"longurl":"http://a.test"}"#).unwrap();
        assert_eq!(input.longurl, "http://a.test");
        assert!(input.shorturl.is_none());
    }

    #[test]
    fn create_rejects_missing_longurl() {
        let result: Result<CreateShortUrl, _> = serde_json::from_str(r#"{"shorturl":"x"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn xml_request_with_text_and_cdata() {
        let input = parse_xml_request(
            "<SfShortUrl><Longurl><![CDATA[http://a.test/?x=1&y=2]]></Longurl><Shorturl>foo</Shorturl></SfShortUrl>",
        )
        .unwrap();
        assert_eq!(input.longurl, "http://a.test/?x=1&y=2");
        assert_eq!(input.shorturl.as_deref(), Some("foo"));
    }

    #[test]
    fn xml_request_without_longurl_is_rejected() {
        assert!(parse_xml_request("<SfShortUrl><Shorturl>foo</Shorturl></SfShortUrl>").is_none());
        assert!(parse_xml_request("<SfShortUrl><Longurl>x</Shorturl></SfShortUrl>").is_none());
    }

    #[test]
    fn rendered_xml_escapes_values() {
        let xml = render_xml(&[record()]);
        assert!(xml.contains("<Longurl>http://example.com/?a=1&amp;b=2</Longurl>"));
        assert!(xml.contains("<LastVisitedAt/>"));
    }
}
