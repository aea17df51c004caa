//! ContentClient against a mock CMS on an ephemeral port.

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use parking_lot::Mutex;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::Arc;
use tideline_cms::client::DEFAULT_TIMEOUT;
use tideline_cms::{CmsError, Collection, ContentClient, ContentSource, ListParams, WriteEndpoint};
use tideline_core::content::Block;
use tokio::net::TcpListener;

#[derive(Debug, Clone)]
struct Recorded {
    method: String,
    path: String,
    query: String,
    body: String,
    authorization: Option<String>,
}

/// Canned responses keyed by `METHOD /path`.
struct MockCms {
    base_url: String,
    requests: Arc<Mutex<Vec<Recorded>>>,
    _server: tokio::task::JoinHandle<()>,
}

impl MockCms {
    async fn start(routes: Vec<(&str, StatusCode, Value)>) -> Self {
        let routes: Arc<HashMap<String, (StatusCode, Value)>> = Arc::new(
            routes
                .into_iter()
                .map(|(key, status, body)| (key.to_string(), (status, body)))
                .collect(),
        );
        let requests = Arc::new(Mutex::new(Vec::new()));
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let recorded = requests.clone();
        let server = tokio::spawn(async move {
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    return;
                };
                let routes = routes.clone();
                let recorded = recorded.clone();
                tokio::spawn(async move {
                    let service = service_fn(move |req: Request<Incoming>| {
                        let routes = routes.clone();
                        let recorded = recorded.clone();
                        async move {
                            let method = req.method().to_string();
                            let path = req.uri().path().to_string();
                            let query = req.uri().query().unwrap_or_default().to_string();
                            let authorization = req
                                .headers()
                                .get("authorization")
                                .and_then(|v| v.to_str().ok())
                                .map(str::to_string);
                            let body = req.into_body().collect().await.unwrap().to_bytes();

                            recorded.lock().push(Recorded {
                                method: method.clone(),
                                path: path.clone(),
                                query,
                                body: String::from_utf8_lossy(&body).to_string(),
                                authorization,
                            });

                            let (status, body) = routes
                                .get(&format!("{method} {path}"))
                                .cloned()
                                .unwrap_or((StatusCode::NOT_FOUND, json!({ "data": null })));
                            let mut response =
                                Response::new(Full::new(Bytes::from(body.to_string())));
                            *response.status_mut() = status;
                            Ok::<_, Infallible>(response)
                        }
                    });
                    let _ = http1::Builder::new()
                        .serve_connection(TokioIo::new(stream), service)
                        .await;
                });
            }
        });

        Self {
            base_url: format!("http://{addr}"),
            requests,
            _server: server,
        }
    }

    fn client(&self, token: Option<&str>) -> ContentClient {
        ContentClient::new(&self.base_url, token.map(str::to_string), DEFAULT_TIMEOUT).unwrap()
    }

    fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().clone()
    }
}

fn decoded_query(raw: &str) -> Vec<(String, String)> {
    reqwest::Url::parse(&format!("http://x/?{raw}"))
        .unwrap()
        .query_pairs()
        .into_owned()
        .collect()
}

#[tokio::test]
async fn test_listing_sends_strapi_params_and_decodes_pagination() {
    let cms = MockCms::start(vec![(
        "GET /api/articles",
        StatusCode::OK,
        json!({
            "data": [
                { "documentId": "a1", "title": "Big Waves", "slug": "big-waves",
                  "description": "Where to ride", "createdAt": "2024-05-01T10:00:00.000Z",
                  "image": { "url": "/uploads/wave.jpg", "alternativeText": null } }
            ],
            "meta": { "pagination": { "page": 1, "pageSize": 3, "pageCount": 2, "total": 4 } }
        }),
    )])
    .await;

    let response = cms
        .client(Some("secret"))
        .list(
            Collection::Articles,
            &ListParams::listing(1, 3).with_query(Some("wave")),
        )
        .await
        .unwrap();

    assert_eq!(response.data.len(), 1);
    assert_eq!(response.data[0].slug, "big-waves");
    assert_eq!(response.page_count(), 2);

    let requests = cms.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].authorization.as_deref(), Some("Bearer secret"));
    let query = decoded_query(&requests[0].query);
    assert!(query.contains(&(
        "filters[$or][0][title][$containsi]".to_string(),
        "wave".to_string()
    )));
    assert!(query.contains(&("pagination[page]".to_string(), "1".to_string())));
}

#[tokio::test]
async fn test_slug_lookup_returns_blocks_or_not_found() {
    let cms = MockCms::start(vec![(
        "GET /api/events",
        StatusCode::OK,
        json!({
            "data": [{
                "documentId": "e1", "title": "Sunrise Session", "slug": "sunrise-session",
                "price": 25, "startDate": "2024-06-01T06:00:00.000Z",
                "blocks": [
                    { "__component": "blocks.heading", "heading": "Schedule", "linkId": "schedule" },
                    { "__component": "blocks.paragraph", "content": "Meet at the pier." }
                ]
            }],
            "meta": {}
        }),
    )])
    .await;
    let client = cms.client(None);

    let event = client
        .find_by_slug(Collection::Events, "sunrise-session")
        .await
        .unwrap();
    assert_eq!(event.blocks.len(), 2);
    assert!(matches!(event.blocks[0], Block::Heading(_)));
    assert!(cms.requests()[0].authorization.is_none());

    let missing = client
        .find_by_slug(Collection::Articles, "nowhere")
        .await
        .unwrap_err();
    assert!(missing.is_not_found(), "{missing}");
}

#[tokio::test]
async fn test_submit_wraps_payload_in_data() {
    let cms = MockCms::start(vec![(
        "POST /api/newsletter-signups",
        StatusCode::OK,
        json!({ "data": { "id": 1, "email": "kai@example.com" } }),
    )])
    .await;

    cms.client(None)
        .submit(
            WriteEndpoint::NewsletterSignups,
            json!({ "email": "kai@example.com" }),
        )
        .await
        .unwrap();

    let sent: Value = serde_json::from_str(&cms.requests()[0].body).unwrap();
    assert_eq!(sent, json!({ "data": { "email": "kai@example.com" } }));
    assert_eq!(cms.requests()[0].method, "POST");
}

#[tokio::test]
async fn test_submit_surfaces_strapi_error_message() {
    let cms = MockCms::start(vec![(
        "POST /api/event-signups",
        StatusCode::BAD_REQUEST,
        json!({
            "data": null,
            "error": { "status": 400, "name": "ValidationError", "message": "This attribute must be unique" }
        }),
    )])
    .await;

    let err = cms
        .client(None)
        .submit(WriteEndpoint::EventSignups, json!({ "email": "kai@example.com" }))
        .await
        .unwrap_err();

    match err {
        CmsError::Rejected { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "This attribute must be unique");
        }
        other => panic!("expected rejection, got {other:?}"),
    }
}

#[tokio::test]
async fn test_server_error_on_read_is_a_status_error() {
    let cms = MockCms::start(vec![(
        "GET /api/pages",
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({ "error": { "status": 500, "message": "boom" } }),
    )])
    .await;

    let err = cms
        .client(None)
        .list(Collection::Pages, &ListParams::by_slug("about"))
        .await
        .unwrap_err();
    assert!(matches!(err, CmsError::Status { status: 500, .. }), "{err}");
}

#[tokio::test]
async fn test_missing_home_page_is_none() {
    let cms = MockCms::start(vec![]).await;
    let home = cms.client(None).home_page().await.unwrap();
    assert!(home.is_none());
    assert_eq!(cms.requests()[0].path, "/api/home-page");
}

#[tokio::test]
async fn test_unreachable_cms_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = ContentClient::new(&format!("http://{addr}"), None, DEFAULT_TIMEOUT).unwrap();
    let err = client.global().await.unwrap_err();
    assert!(matches!(err, CmsError::Transport { .. }), "{err}");
}

#[tokio::test]
async fn test_truncated_rejection_body_falls_back_to_generic_message() {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let mut received = Vec::new();
        let mut chunk = [0u8; 1024];
        while !received.ends_with(b"}}") {
            let n = stream.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            received.extend_from_slice(&chunk[..n]);
        }
        stream
            .write_all(b"HTTP/1.1 502 Bad Gateway\r\ncontent-length: 64\r\n\r\n{\"error\":")
            .await
            .unwrap();
        stream.shutdown().await.unwrap();
    });

    let client = ContentClient::new(&format!("http://{addr}"), None, DEFAULT_TIMEOUT).unwrap();
    let err = client
        .submit(WriteEndpoint::NewsletterSignups, json!({ "email": "kai@example.com" }))
        .await
        .unwrap_err();

    match err {
        CmsError::Rejected { status, message } => {
            assert_eq!(status, 502);
            assert_eq!(message, tideline_cms::client::GENERIC_WRITE_ERROR);
        }
        other => panic!("expected a rejection, got {other}"),
    }
    server.await.unwrap();
}
