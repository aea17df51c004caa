//! Request data handed to page pipelines.

use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::{Method, Request};
use http_body::Body;
use http_body_util::{BodyExt, LengthLimitError, Limited};
use std::collections::HashMap;
use tideline_core::form::FormValues;
use tideline_core::query::ListQuery;

/// Largest form body accepted.
pub const MAX_FORM_BYTES: usize = 64 * 1024;

const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("request body exceeds {MAX_FORM_BYTES} bytes")]
    PayloadTooLarge,
    #[error("failed to read request body: {0}")]
    Body(String),
    #[error("unsupported form content type `{0}`")]
    UnsupportedMediaType(String),
    #[error("malformed form body: {0}")]
    Form(#[from] serde_urlencoded::de::Error),
}

/// What a page pipeline knows about its request.
#[derive(Debug, Clone, PartialEq)]
pub struct PageRequest {
    pub method: Method,
    pub path: String,
    /// Raw query string, without the leading `?`.
    pub query: Option<String>,
    /// Path parameters captured by the route pattern.
    pub params: HashMap<String, String>,
    /// Decoded form body of a POST.
    pub form: Option<FormValues>,
}

impl PageRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            path: path.into(),
            query: None,
            params: HashMap::new(),
            form: None,
        }
    }

    pub fn post(path: impl Into<String>, form: FormValues) -> Self {
        Self {
            method: Method::POST,
            form: Some(form),
            ..Self::get(path)
        }
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// Page and search term from the query string.
    pub fn list_query(&self) -> ListQuery {
        ListQuery::from_query_str(self.query.as_deref().unwrap_or_default())
    }

    pub fn form_values(&self) -> Option<&FormValues> {
        self.form.as_ref()
    }

    /// Read a hyper request. POST bodies are decoded as url-encoded forms.
    pub async fn from_request<B>(req: Request<B>) -> Result<Self, RequestError>
    where
        B: Body<Data = Bytes> + Send,
        B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        let (parts, body) = req.into_parts();
        let mut page = Self {
            method: parts.method,
            path: normalise_path(parts.uri.path()),
            query: parts.uri.query().map(str::to_string),
            params: HashMap::new(),
            form: None,
        };

        if page.method != Method::POST {
            return Ok(page);
        }

        if let Some(content_type) = parts.headers.get(CONTENT_TYPE) {
            let content_type = content_type.to_str().unwrap_or_default();
            if !content_type.starts_with(FORM_URLENCODED) {
                return Err(RequestError::UnsupportedMediaType(content_type.to_string()));
            }
        }

        let bytes = Limited::new(body, MAX_FORM_BYTES)
            .collect()
            .await
            .map_err(|err| {
                if err.downcast_ref::<LengthLimitError>().is_some() {
                    RequestError::PayloadTooLarge
                } else {
                    RequestError::Body(err.to_string())
                }
            })?
            .to_bytes();

        let body = String::from_utf8_lossy(&bytes);
        page.form = Some(FormValues::parse(&body)?);
        Ok(page)
    }
}

/// Drop a trailing slash so `/blog/` routes like `/blog`.
pub fn normalise_path(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}
