//! Shared streaming helpers: `Range` header lookup and the `206` response
//! shape every stream and info endpoint answers with.

use axum::body::Body;
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::Response;
use reel_stream::mime::OCTET_STREAM;
use reel_stream::ByteRange;

/// The first non-empty `Range` value, if any.
///
/// Header names are case-insensitive in `HeaderMap`, so `Range` and `range`
/// are one lookup; every value sent under the name is checked in order.
pub fn range_header(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(header::RANGE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .map(str::trim)
        .find(|v| !v.is_empty())
}

/// Build a `206 Partial Content` response for `range`.
///
/// `Content-Length` is only written when `with_length` is set: a response
/// that carries no body over GET must not announce one.
pub fn partial_content(
    server_name: &str,
    range: &ByteRange,
    mime: &str,
    with_length: bool,
    body: Body,
) -> Response {
    let mut response = Response::new(body);
    *response.status_mut() = StatusCode::PARTIAL_CONTENT;

    let headers = response.headers_mut();
    if let Ok(v) = HeaderValue::from_str(server_name) {
        headers.insert(header::SERVER, v);
    }
    headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive"));
    headers.insert(header::ACCEPT_RANGES, HeaderValue::from_static("bytes"));
    if let Ok(v) = HeaderValue::from_str(&range.content_range()) {
        headers.insert(header::CONTENT_RANGE, v);
    }
    if with_length {
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from(range.len()));
    }
    let content_type = HeaderValue::from_str(mime)
        .unwrap_or_else(|_| HeaderValue::from_static(OCTET_STREAM));
    headers.insert(header::CONTENT_TYPE, content_type);

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_header_absent() {
        assert_eq!(range_header(&HeaderMap::new()), None);
    }

    #[test]
    fn range_header_skips_empty_values() {
        let mut headers = HeaderMap::new();
        headers.append(header::RANGE, HeaderValue::from_static(""));
        headers.append(header::RANGE, HeaderValue::from_static(" bytes=10-20 "));
        headers.append(header::RANGE, HeaderValue::from_static("bytes=30-40"));
        assert_eq!(range_header(&headers), Some("bytes=10-20"));
    }

    #[test]
    fn range_header_name_is_case_insensitive() {
        let mut headers = HeaderMap::new();
        headers.insert("range", HeaderValue::from_static("bytes=0-1"));
        assert_eq!(range_header(&headers), Some("bytes=0-1"));
    }

    #[test]
    fn partial_content_sets_stream_headers() {
        let range = reel_stream::range::parse(Some("bytes=100-199"), 1000);
        let resp = partial_content("Test/1.0", &range, "video/mp4", true, Body::empty());

        assert_eq!(resp.status(), StatusCode::PARTIAL_CONTENT);
        let h = resp.headers();
        assert_eq!(h[header::SERVER], "Test/1.0");
        assert_eq!(h[header::CONNECTION], "keep-alive");
        assert_eq!(h[header::ACCEPT_RANGES], "bytes");
        assert_eq!(h[header::CONTENT_RANGE], "bytes 100-199/1000");
        assert_eq!(h[header::CONTENT_LENGTH], "100");
        assert_eq!(h[header::CONTENT_TYPE], "video/mp4");
    }

    #[test]
    fn empty_file_headers() {
        let resp = partial_content("s", &ByteRange::empty(), "video/mp4", true, Body::empty());
        assert_eq!(resp.headers()[header::CONTENT_RANGE], "bytes */0");
        assert_eq!(resp.headers()[header::CONTENT_LENGTH], "0");
    }

    #[test]
    fn invalid_mime_falls_back() {
        let resp = partial_content("s", &ByteRange::full(10), "bad\nmime", false, Body::empty());
        assert_eq!(resp.headers()[header::CONTENT_TYPE], OCTET_STREAM);
        assert!(resp.headers().get(header::CONTENT_LENGTH).is_none());
    }
}
