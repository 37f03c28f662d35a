use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, ShortUrl};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes: bytes::Bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn form_request(uri: &str, content: &str) -> Request<String> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(serde_urlencoded::to_string(&[("content", content)]).unwrap())
        .unwrap()
}

fn get_request(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

// --- json ---

#[tokio::test]
async fn json_lookup_unknown_alias_is_404() {
    let resp = app()
        .oneshot(get_request("/sf_short_url.json?shorturl=nope"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn json_create_generates_alias() {
    let resp = app()
        .oneshot(form_request("/sf_short_url.json", r#"{"longurl":"http://example.com"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let records: Vec<ShortUrl> = body_json(resp).await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].longurl, "http://example.com");
    assert_eq!(records[0].shorturl.len(), 6);
}

#[tokio::test]
async fn json_create_malformed_content_is_400() {
    let resp = app()
        .oneshot(form_request("/sf_short_url.json", "not json"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- xml ---

#[tokio::test]
async fn xml_create_honours_alias() {
    let resp = app()
        .oneshot(form_request(
            "/sf_short_url.xml",
            "<SfShortUrl><Longurl><![CDATA[http://a.test/?x=1&y=2]]></Longurl><Shorturl>foo</Shorturl></SfShortUrl>",
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let xml = body_text(resp).await;
    assert!(xml.contains("<Shorturl>foo</Shorturl>"), "{xml}");
    assert!(xml.contains("<Longurl>http://a.test/?x=1&amp;y=2</Longurl>"), "{xml}");
}

#[tokio::test]
async fn xml_create_without_longurl_is_400() {
    let resp = app()
        .oneshot(form_request("/sf_short_url.xml", "<SfShortUrl></SfShortUrl>"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- simple ---

#[tokio::test]
async fn simple_decode_unknown_alias_is_404() {
    let resp = app()
        .oneshot(get_request("/simple/decode?url=nope"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- shared store across formats ---

#[tokio::test]
async fn formats_share_one_store() {
    use tower::Service;

    let mut app = app().into_service();

    // create through simple
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get_request("/simple/encode?url=http%3A%2F%2Fexample.com&alias=foo"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_text(resp).await, "http://xav.cc/foo");

    // read through json
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get_request("/sf_short_url.json?shorturl=foo"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let records: Vec<ShortUrl> = body_json(resp).await;
    assert_eq!(records[0].longurl, "http://example.com");
    assert_eq!(records[0].viewcount, 0);

    // read through xml
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get_request("/sf_short_url.xml?shorturl=foo"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let xml = body_text(resp).await;
    assert!(xml.contains("<Longurl>http://example.com</Longurl>"), "{xml}");

    // same alias, different target
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(form_request(
            "/sf_short_url.json",
            r#"{"longurl":"http://other.test","shorturl":"foo"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    // same alias, same target
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get_request("/simple/encode?url=http%3A%2F%2Fexample.com&alias=foo"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    // decode through simple
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get_request("/simple/decode?url=foo"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_text(resp).await, "http://example.com");
}
