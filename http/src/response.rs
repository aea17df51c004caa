//! Response builders.

use bytes::Bytes;
use http::header::{CONTENT_TYPE, HeaderValue};
use http::{Response, StatusCode};
use http_body_util::Full;

pub type HttpResponse = Response<Full<Bytes>>;

pub const HTML: &str = "text/html; charset=utf-8";
pub const TEXT: &str = "text/plain; charset=utf-8";

const FALLBACK_ERROR_PAGE: &str = "<!DOCTYPE html><html><head><title>Something went wrong</title></head>\
<body><main><h1>Something went wrong</h1><p>Please try again in a moment.</p></main></body></html>";

fn with_body(status: StatusCode, content_type: &'static str, body: impl Into<Bytes>) -> HttpResponse {
    let mut response = Response::new(Full::new(body.into()));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    response
}

pub fn html(status: StatusCode, body: impl Into<Bytes>) -> HttpResponse {
    with_body(status, HTML, body)
}

pub fn text(status: StatusCode, body: impl Into<Bytes>) -> HttpResponse {
    with_body(status, TEXT, body)
}

pub fn not_found() -> HttpResponse {
    text(StatusCode::NOT_FOUND, "Not Found")
}

/// 500 page. Uses `page` when the site supplied one.
pub fn server_error(page: Option<&str>) -> HttpResponse {
    let body = page.unwrap_or(FALLBACK_ERROR_PAGE).to_string();
    html(StatusCode::INTERNAL_SERVER_ERROR, body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_sets_content_type() {
        let response = html(StatusCode::OK, "<p>hi</p>");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[CONTENT_TYPE], HTML);
    }

    #[test]
    fn test_server_error_defaults_to_builtin_page() {
        let response = server_error(None);
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.headers()[CONTENT_TYPE], HTML);
    }
}
