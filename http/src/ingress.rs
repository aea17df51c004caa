//! # Ingress: HTTP to Page Pipelines
//!
//! `Tideline::http()` builds the route table:
//!
//! - `bind(addr)`: listen address
//! - `route(path, circuit)` / `route_method(method, path, circuit)`: GET or
//!   any-method wiring
//! - `page(path, circuit)`: GET renders, POST submits a form and re-renders
//! - `fallback(circuit)`: 404 page
//! - `into_raw_service()`: Tower `Service` for tests and custom stacks
//!
//! Route patterns use matchit syntax (`/blog/{slug}`). Captured parameters
//! land in [`PageRequest::params`].

use crate::request::{PageRequest, RequestError};
use crate::response::{self, HttpResponse};
use bytes::Bytes;
use http::header::HeaderValue;
use http::{Method, Request, StatusCode};
use http_body::Body;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use percent_encoding::percent_decode_str;
use std::collections::HashMap;
use std::convert::Infallible;
use std::fmt::Display;
use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Instant;
use tideline_core::bus::Bus;
use tideline_core::outcome::{NOT_FOUND, Outcome};
use tideline_core::transition::ResourceRequirement;
use tideline_runtime::Axon;
use tokio::net::TcpListener;
use tower::Service;
use tracing::Instrument;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

const DEFAULT_ADDR: &str = "127.0.0.1:3000";

/// The Tideline entry point.
pub struct Tideline;

impl Tideline {
    /// Create an HTTP ingress builder.
    pub fn http<R: ResourceRequirement>() -> HttpIngress<R> {
        HttpIngress::new()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum IngressError {
    #[error("invalid route `{path}`: {source}")]
    Route {
        path: String,
        #[source]
        source: matchit::InsertError,
    },
    #[error("invalid bind address `{addr}`: {source}")]
    Addr {
        addr: String,
        #[source]
        source: std::net::AddrParseError,
    },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// What a route produced.
enum Rendered {
    Page(HttpResponse),
    NotFound,
}

type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;

/// Route handler: runs a circuit for one request.
type RouteHandler<R> = Arc<dyn Fn(PageRequest, Arc<R>) -> BoxFuture<Rendered> + Send + Sync>;

/// Wrap a circuit so its outcome becomes a response.
fn circuit_handler<E, R>(circuit: Axon<PageRequest, String, E, R>) -> RouteHandler<R>
where
    E: Display + Send + 'static,
    R: ResourceRequirement,
{
    let circuit = Arc::new(circuit);
    Arc::new(move |req: PageRequest, res: Arc<R>| {
        let circuit = circuit.clone();
        Box::pin(async move {
            let mut bus = Bus::new();
            match circuit.execute(req, &res, &mut bus).await {
                Outcome::Next(body) => Rendered::Page(response::html(StatusCode::OK, body)),
                Outcome::Branch(id, _) if id == NOT_FOUND => Rendered::NotFound,
                Outcome::Branch(id, payload) => {
                    tracing::warn!(circuit = %circuit.label(), branch = %id, ?payload, "unhandled branch");
                    Rendered::Page(response::server_error(None))
                }
                Outcome::Fault(err) => {
                    tracing::error!(circuit = %circuit.label(), error = %err, "circuit faulted");
                    Rendered::Page(response::server_error(None))
                }
            }
        }) as BoxFuture<Rendered>
    })
}

struct PendingRoute<R> {
    method: Method,
    path: String,
    handler: RouteHandler<R>,
}

/// HTTP ingress builder.
pub struct HttpIngress<R = ()> {
    addr: Option<String>,
    routes: Vec<PendingRoute<R>>,
    fallback: Option<RouteHandler<R>>,
    error_page: Option<String>,
    health_path: Option<String>,
}

impl<R: ResourceRequirement> HttpIngress<R> {
    pub fn new() -> Self {
        Self {
            addr: None,
            routes: Vec::new(),
            fallback: None,
            error_page: None,
            health_path: None,
        }
    }

    /// Set the bind address for the server.
    pub fn bind(mut self, addr: impl Into<String>) -> Self {
        self.addr = Some(addr.into());
        self
    }

    /// Register a GET route.
    pub fn route<E>(self, path: impl Into<String>, circuit: Axon<PageRequest, String, E, R>) -> Self
    where
        E: Display + Send + 'static,
    {
        self.route_method(Method::GET, path, circuit)
    }

    /// Register a route for a specific HTTP method.
    pub fn route_method<E>(
        mut self,
        method: Method,
        path: impl Into<String>,
        circuit: Axon<PageRequest, String, E, R>,
    ) -> Self
    where
        E: Display + Send + 'static,
    {
        self.routes.push(PendingRoute {
            method,
            path: path.into(),
            handler: circuit_handler(circuit),
        });
        self
    }

    /// Register a page: the same circuit serves GET and form POSTs.
    pub fn page<E>(self, path: impl Into<String>, circuit: Axon<PageRequest, String, E, R>) -> Self
    where
        E: Display + Send + 'static,
    {
        let path = path.into();
        self.route_method(Method::GET, path.clone(), circuit.clone())
            .route_method(Method::POST, path, circuit)
    }

    /// Circuit rendered with a 404 for unmatched paths and `not_found`
    /// branches.
    pub fn fallback<E>(mut self, circuit: Axon<PageRequest, String, E, R>) -> Self
    where
        E: Display + Send + 'static,
    {
        self.fallback = Some(circuit_handler(circuit));
        self
    }

    /// Static HTML served with every 500.
    pub fn error_page(mut self, html: impl Into<String>) -> Self {
        self.error_page = Some(html.into());
        self
    }

    /// Answer `GET path` with `200 ok` without touching any circuit.
    pub fn health_check(mut self, path: impl Into<String>) -> Self {
        self.health_path = Some(path.into());
        self
    }

    /// Build the route table and wrap it as a Tower service.
    pub fn into_raw_service(self, resources: R) -> Result<RawIngressService<R>, IngressError> {
        let mut routes: HashMap<Method, matchit::Router<RouteHandler<R>>> = HashMap::new();
        for route in self.routes {
            routes
                .entry(route.method)
                .or_insert_with(matchit::Router::new)
                .insert(route.path.clone(), route.handler)
                .map_err(|source| IngressError::Route {
                    path: route.path,
                    source,
                })?;
        }

        Ok(RawIngressService {
            inner: Arc::new(IngressTable {
                routes,
                fallback: self.fallback,
                error_page: self.error_page,
                health_path: self.health_path,
            }),
            resources: Arc::new(resources),
        })
    }

    /// Serve until `shutdown` resolves. In-flight connections are left to
    /// finish on their own.
    pub async fn run_until<F>(self, resources: R, shutdown: F) -> Result<(), IngressError>
    where
        F: Future<Output = ()> + Send,
    {
        let addr_str = self.addr.clone().unwrap_or_else(|| DEFAULT_ADDR.to_string());
        let addr: SocketAddr = addr_str.parse().map_err(|source| IngressError::Addr {
            addr: addr_str.clone(),
            source,
        })?;
        let service = self.into_raw_service(resources)?;

        let listener = TcpListener::bind(addr).await?;
        tracing::info!("Tideline HTTP ingress listening on http://{}", listener.local_addr()?);

        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                accepted = listener.accept() => {
                    let (stream, peer) = match accepted {
                        Ok(conn) => conn,
                        Err(err) => {
                            tracing::warn!(error = %err, "failed to accept connection");
                            continue;
                        }
                    };
                    let io = TokioIo::new(stream);
                    let service = service.clone();

                    tokio::task::spawn(async move {
                        let hyper_service = service_fn(move |req: Request<Incoming>| {
                            let mut service = service.clone();
                            async move { service.call(req).await }
                        });

                        if let Err(err) = http1::Builder::new().serve_connection(io, hyper_service).await {
                            tracing::debug!(%peer, "error serving connection: {:?}", err);
                        }
                    });
                }
                _ = &mut shutdown => {
                    tracing::info!("shutdown signal received, no longer accepting connections");
                    return Ok(());
                }
            }
        }
    }

    /// Serve forever.
    pub async fn run(self, resources: R) -> Result<(), IngressError> {
        self.run_until(resources, std::future::pending()).await
    }
}

impl<R: ResourceRequirement> Default for HttpIngress<R> {
    fn default() -> Self {
        Self::new()
    }
}

struct IngressTable<R> {
    routes: HashMap<Method, matchit::Router<RouteHandler<R>>>,
    fallback: Option<RouteHandler<R>>,
    error_page: Option<String>,
    health_path: Option<String>,
}

impl<R: ResourceRequirement> IngressTable<R> {
    async fn dispatch(&self, mut req: PageRequest, resources: Arc<R>) -> HttpResponse {
        if req.method == Method::GET && self.health_path.as_deref() == Some(req.path.as_str()) {
            return response::text(StatusCode::OK, "ok");
        }

        let matched = self.routes.get(&req.method).and_then(|router| {
            let found = router.at(&req.path).ok()?;
            let params: Vec<(String, String)> = found
                .params
                .iter()
                .map(|(k, v)| {
                    let value = percent_decode_str(v).decode_utf8_lossy().into_owned();
                    (k.to_string(), value)
                })
                .collect();
            Some((found.value.clone(), params))
        });

        let rendered = match matched {
            Some((handler, params)) => {
                req.params.extend(params);
                handler(req.clone(), resources.clone()).await
            }
            None if self.path_known(&req.path) => {
                return response::text(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed");
            }
            None => Rendered::NotFound,
        };

        match rendered {
            Rendered::Page(page) if page.status() == StatusCode::INTERNAL_SERVER_ERROR => {
                response::server_error(self.error_page.as_deref())
            }
            Rendered::Page(page) => page,
            Rendered::NotFound => self.not_found(req, resources).await,
        }
    }

    fn path_known(&self, path: &str) -> bool {
        self.routes.values().any(|router| router.at(path).is_ok())
    }

    async fn not_found(&self, mut req: PageRequest, resources: Arc<R>) -> HttpResponse {
        let Some(fallback) = &self.fallback else {
            return response::not_found();
        };

        // The 404 page never handles a form submission.
        req.method = Method::GET;
        req.form = None;
        match fallback(req, resources).await {
            Rendered::Page(mut page) if page.status() == StatusCode::OK => {
                *page.status_mut() = StatusCode::NOT_FOUND;
                page
            }
            Rendered::Page(page) if page.status() == StatusCode::INTERNAL_SERVER_ERROR => {
                response::server_error(self.error_page.as_deref())
            }
            Rendered::Page(page) => page,
            Rendered::NotFound => response::not_found(),
        }
    }
}

/// Tower service produced by [`HttpIngress::into_raw_service`].
pub struct RawIngressService<R> {
    inner: Arc<IngressTable<R>>,
    resources: Arc<R>,
}

impl<R> Clone for RawIngressService<R> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            resources: self.resources.clone(),
        }
    }
}

impl<R, B> Service<Request<B>> for RawIngressService<R>
where
    R: ResourceRequirement,
    B: Body<Data = Bytes> + Send + 'static,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    type Response = HttpResponse;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(
        &mut self,
        _cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        std::task::Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<B>) -> Self::Future {
        let inner = self.inner.clone();
        let resources = self.resources.clone();

        Box::pin(async move {
            let request_id = uuid::Uuid::new_v4().to_string();
            let span = tracing::info_span!(
                "HTTPRequest",
                tideline.http.method = %req.method(),
                tideline.http.path = %req.uri().path(),
                tideline.http.request_id = %request_id
            );

            async move {
                let started = Instant::now();
                let mut response = match PageRequest::from_request(req).await {
                    Ok(page) => inner.dispatch(page, resources).await,
                    Err(err) => reject(err),
                };

                if let Ok(value) = HeaderValue::from_str(&request_id) {
                    response.headers_mut().insert(REQUEST_ID_HEADER, value);
                }
                tracing::info!(
                    status = response.status().as_u16(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "request completed"
                );
                Ok(response)
            }
            .instrument(span)
            .await
        })
    }
}

fn reject(err: RequestError) -> HttpResponse {
    tracing::debug!(error = %err, "rejecting request");
    let status = match err {
        RequestError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
        RequestError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        RequestError::Body(_) | RequestError::Form(_) => StatusCode::BAD_REQUEST,
    };
    response::text(status, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use http_body_util::{BodyExt, Full};
    use tideline_core::transition::Transition;
    use tower::ServiceExt;

    struct Catalog {
        slugs: Vec<&'static str>,
    }

    impl ResourceRequirement for Catalog {}

    struct ShowSlug;
    struct Missing;

    #[async_trait]
    impl Transition<PageRequest, String> for ShowSlug {
        type Error = String;
        type Resources = Catalog;

        async fn run(&self, req: PageRequest, res: &Catalog, _: &mut Bus) -> Outcome<String, String> {
            let slug = req.param("slug").unwrap_or("home").to_string();
            if slug == "broken" {
                return Outcome::fault("cms offline".to_string());
            }
            if slug != "home" && !res.slugs.contains(&slug.as_str()) {
                return Outcome::not_found(serde_json::Value::Null);
            }
            let submitted = req.form.map(|f| f.get("email").to_string()).unwrap_or_default();
            Outcome::next(format!("<h1>{slug}</h1>{submitted}"))
        }
    }

    #[async_trait]
    impl Transition<PageRequest, String> for Missing {
        type Error = String;
        type Resources = Catalog;

        async fn run(&self, req: PageRequest, _: &Catalog, _: &mut Bus) -> Outcome<String, String> {
            Outcome::next(format!("<h1>Page not found</h1><p>{}</p>", req.path))
        }
    }

    fn service() -> RawIngressService<Catalog> {
        let page = Axon::<PageRequest, PageRequest, String, Catalog>::new("Page").then(ShowSlug);
        let missing = Axon::<PageRequest, PageRequest, String, Catalog>::new("NotFound").then(Missing);

        Tideline::http::<Catalog>()
            .page("/", page.clone())
            .page("/blog/{slug}", page)
            .fallback(missing)
            .error_page("<h1>Oops</h1>")
            .health_check("/healthz")
            .into_raw_service(Catalog {
                slugs: vec!["waves", "broken", "café au lait"],
            })
            .unwrap()
    }

    async fn send(req: Request<Full<Bytes>>) -> (StatusCode, String) {
        let response = service().oneshot(req).await.unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    fn get(uri: &str) -> Request<Full<Bytes>> {
        Request::get(uri).body(Full::new(Bytes::new())).unwrap()
    }

    #[tokio::test]
    async fn test_route_params_reach_the_circuit() {
        let (status, body) = send(get("/blog/waves")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "<h1>waves</h1>");
    }

    #[tokio::test]
    async fn test_route_params_are_percent_decoded() {
        let (status, body) = send(get("/blog/caf%C3%A9%20au%20lait")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "<h1>café au lait</h1>");
    }

    #[tokio::test]
    async fn test_not_found_branch_renders_fallback_with_404() {
        let (status, body) = send(get("/blog/nowhere")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("Page not found"));

        let (status, _) = send(get("/no/such/route")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_fault_renders_error_page() {
        let (status, body) = send(get("/blog/broken")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, "<h1>Oops</h1>");
    }

    #[tokio::test]
    async fn test_post_carries_form() {
        let req = Request::post("/")
            .header(http::header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Full::new(Bytes::from_static(b"email=kai%40example.com")))
            .unwrap();
        let (status, body) = send(req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "<h1>home</h1>kai@example.com");
    }

    #[tokio::test]
    async fn test_health_and_method_not_allowed() {
        let (status, body) = send(get("/healthz")).await;
        assert_eq!((status, body.as_str()), (StatusCode::OK, "ok"));

        let req = Request::delete("/").body(Full::new(Bytes::new())).unwrap();
        let (status, _) = send(req).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_responses_carry_request_id() {
        let response = service().oneshot(get("/")).await.unwrap();
        assert!(response.headers().contains_key(REQUEST_ID_HEADER));
    }

    #[test]
    fn test_conflicting_routes_are_reported() {
        let a = Axon::<PageRequest, PageRequest, String, Catalog>::new("A").then(ShowSlug);
        let result = Tideline::http::<Catalog>()
            .route("/blog/{slug}", a.clone())
            .route("/blog/{id}", a)
            .into_raw_service(Catalog { slugs: vec![] });
        assert!(matches!(result, Err(IngressError::Route { .. })));
    }
}
