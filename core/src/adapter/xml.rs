use quick_xml::escape::escape;
use quick_xml::events::Event;
use quick_xml::Reader;
use thiserror::Error;
use tracing::debug;

use super::Codec;
use crate::types::{FormatKind, ShortUrl, ShortenRequest};

const ROOT: &str = "SfShortUrl";

/// `sf_short_url.xml`: requests are a single `<SfShortUrl>` element,
/// responses a root element whose children are records.
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlCodec;

impl Codec for XmlCodec {
    const FORMAT: FormatKind = FormatKind::Xml;

    /// Values that escaping would change go into CDATA, the rest are
    /// emitted as-is. Values that trim to nothing are left out.
    fn encode_request(request: &ShortenRequest) -> Option<String> {
        let mut xml = format!("<{ROOT}>");
        for (key, value) in request.fields() {
            let value = trim(value);
            if value.is_empty() {
                continue;
            }
            let tag = capitalize(key);
            if escape(value) != value {
                xml.push_str(&format!("<{tag}><![CDATA[{value}]]></{tag}>"));
            } else {
                xml.push_str(&format!("<{tag}>{value}</{tag}>"));
            }
        }
        xml.push_str(&format!("</{ROOT}>"));
        Some(xml)
    }

    fn decode_response(body: &str) -> Vec<ShortUrl> {
        match parse_records(body) {
            Ok(records) => records,
            Err(e) => {
                debug!(error = %e, "malformed xml response");
                Vec::new()
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Shorturl,
    Longurl,
    Viewcount,
    LastVisitedAt,
}

impl Field {
    fn from_tag(tag: &[u8]) -> Option<Self> {
        match tag {
            b"Shorturl" => Some(Field::Shorturl),
            b"Longurl" => Some(Field::Longurl),
            b"Viewcount" => Some(Field::Viewcount),
            b"LastVisitedAt" => Some(Field::LastVisitedAt),
            _ => None,
        }
    }

    fn slot(self, record: &mut ShortUrl) -> &mut Option<String> {
        match self {
            Field::Shorturl => &mut record.shorturl,
            Field::Longurl => &mut record.longurl,
            Field::Viewcount => &mut record.viewcount,
            Field::LastVisitedAt => &mut record.last_visited_at,
        }
    }
}

#[derive(Debug, Error)]
enum ParseError {
    #[error(transparent)]
    Xml(#[from] quick_xml::Error),

    #[error("invalid text: {0}")]
    Text(String),

    #[error("document ended inside an open element")]
    Unclosed,

    #[error("content after the root element")]
    TrailingContent,
}

// Depth 1 is the document root, 2 a record, 3 a record field.
const ROOT_DEPTH: usize = 1;
const RECORD_DEPTH: usize = 2;
const FIELD_DEPTH: usize = 3;

fn parse_records(body: &str) -> Result<Vec<ShortUrl>, ParseError> {
    let mut reader = Reader::from_str(body);
    let mut records: Vec<ShortUrl> = Vec::new();
    let mut depth = 0usize;
    // Field whose text is being collected. Only the first occurrence of a
    // field in a record is kept.
    let mut capturing: Option<Field> = None;
    let mut root_closed = false;

    loop {
        let event = reader.read_event()?;
        if root_closed {
            match &event {
                Event::Start(_) | Event::Empty(_) | Event::CData(_) => {
                    return Err(ParseError::TrailingContent)
                }
                Event::Text(text) if !text.iter().all(u8::is_ascii_whitespace) => {
                    return Err(ParseError::TrailingContent)
                }
                _ => {}
            }
        }
        match event {
            Event::Start(start) => {
                depth += 1;
                match depth {
                    RECORD_DEPTH => records.push(ShortUrl::default()),
                    FIELD_DEPTH => capturing = open_field(&mut records, start.name().as_ref()),
                    _ => {}
                }
            }
            Event::Empty(empty) => match depth + 1 {
                ROOT_DEPTH => root_closed = true,
                RECORD_DEPTH => records.push(ShortUrl::default()),
                FIELD_DEPTH => {
                    open_field(&mut records, empty.name().as_ref());
                }
                _ => {}
            },
            Event::End(_) => {
                if depth == FIELD_DEPTH {
                    capturing = None;
                }
                depth = depth.saturating_sub(1);
                root_closed = depth == 0;
            }
            Event::Text(text) if depth == FIELD_DEPTH => {
                if let Some(field) = capturing {
                    let text = text.unescape().map_err(|e| ParseError::Text(e.to_string()))?;
                    append(&mut records, field, &text);
                }
            }
            Event::CData(cdata) if depth == FIELD_DEPTH => {
                if let Some(field) = capturing {
                    let bytes = cdata.into_inner();
                    append(&mut records, field, &String::from_utf8_lossy(&bytes));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if depth != 0 {
        return Err(ParseError::Unclosed);
    }
    Ok(records)
}

/// Start collecting `tag` into the current record, unless it is unknown or
/// already filled.
fn open_field(records: &mut [ShortUrl], tag: &[u8]) -> Option<Field> {
    let field = Field::from_tag(tag)?;
    let slot = field.slot(records.last_mut()?);
    if slot.is_some() {
        return None;
    }
    *slot = Some(String::new());
    Some(field)
}

fn append(records: &mut [ShortUrl], field: Field, text: &str) {
    if let Some(record) = records.last_mut() {
        field.slot(record).get_or_insert_with(String::new).push_str(text);
    }
}

fn capitalize(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Strips the same characters as a classic C-style `trim`: space, tab,
/// newline, carriage return, NUL and vertical tab.
fn trim(value: &str) -> &str {
    value.trim_matches(|c| matches!(c, ' ' | '\t' | '\n' | '\r' | '\0' | '\x0B'))
}
