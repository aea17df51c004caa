//! HTTP implementation of [`ContentSource`].

use crate::error::CmsError;
use crate::params::{ListParams, single_pairs};
use crate::resource::{Collection, SingleType, WriteEndpoint};
use crate::source::ContentSource;
use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::time::Duration;
use tideline_core::content::ListResponse;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Shown to visitors when a write fails without a CMS message.
pub const GENERIC_WRITE_ERROR: &str = "Ops! Something went wrong. Please try again.";

/// Strapi error envelope: `{ "error": { "status": 400, "message": "..." } }`.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: Option<ErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    status: Option<u16>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DataEnvelope {
    #[serde(default)]
    data: Option<Value>,
}

/// Async CMS REST client.
#[derive(Debug, Clone)]
pub struct ContentClient {
    http_client: reqwest::Client,
    base: Url,
    api_token: Option<String>,
}

impl ContentClient {
    pub fn new(base_url: &str, api_token: Option<String>, timeout: Duration) -> Result<Self, CmsError> {
        let base = Url::parse(base_url)
            .ok()
            .filter(|url| matches!(url.scheme(), "http" | "https"))
            .ok_or_else(|| CmsError::InvalidBaseUrl(base_url.to_string()))?;

        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| CmsError::Transport {
                url: base_url.to_string(),
                source,
            })?;

        Ok(Self {
            http_client,
            base,
            api_token: api_token.filter(|t| !t.is_empty()),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Absolute endpoint URL with query pairs appended.
    pub fn endpoint_url(&self, path: &str, pairs: &[(String, String)]) -> Result<Url, CmsError> {
        let mut url = self
            .base
            .join(path)
            .map_err(|_| CmsError::InvalidBaseUrl(self.base.to_string()))?;
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }
        Ok(url)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// GET and decode. `Ok(None)` for a 404.
    async fn fetch_json<T: DeserializeOwned>(&self, url: Url) -> Result<Option<T>, CmsError> {
        tracing::debug!(url = %url, "fetching");
        let response = self
            .authorize(self.http_client.get(url.clone()))
            .send()
            .await
            .map_err(|source| CmsError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let body = response.text().await.map_err(|source| CmsError::Transport {
            url: url.to_string(),
            source,
        })?;

        if !status.is_success() {
            return Err(CmsError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body)
            .map(Some)
            .map_err(|source| CmsError::Decode {
                resource: url.path().to_string(),
                source,
            })
    }
}

#[async_trait]
impl ContentSource for ContentClient {
    async fn list(
        &self,
        collection: Collection,
        params: &ListParams,
    ) -> Result<ListResponse, CmsError> {
        let url = self.endpoint_url(collection.path(), &params.to_pairs())?;
        let response: Option<ListResponse> = self.fetch_json(url).await?;
        Ok(response.unwrap_or_default())
    }

    async fn single(&self, single: SingleType) -> Result<Option<Value>, CmsError> {
        let url = self.endpoint_url(single.path(), &single_pairs(single))?;
        let envelope: Option<DataEnvelope> = self.fetch_json(url).await?;
        Ok(envelope
            .and_then(|e| e.data)
            .filter(|data| !data.is_null()))
    }

    async fn submit(&self, endpoint: WriteEndpoint, payload: Value) -> Result<(), CmsError> {
        let url = self.endpoint_url(endpoint.path(), &[])?;
        tracing::info!(endpoint = endpoint.path(), "submitting form");

        let response = self
            .authorize(self.http_client.post(url.clone()))
            .json(&json!({ "data": payload }))
            .send()
            .await
            .map_err(|source| CmsError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(err) => {
                tracing::warn!(endpoint = endpoint.path(), %status, error = %err, "could not read submission response");
                String::new()
            }
        };
        let envelope: Option<ErrorEnvelope> = serde_json::from_str(&body).ok();
        let error = envelope.and_then(|e| e.error);

        if status.is_success() && error.is_none() {
            return Ok(());
        }

        let (code, message) = match error {
            Some(err) => (
                err.status.unwrap_or(status.as_u16()),
                err.message
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| GENERIC_WRITE_ERROR.to_string()),
            ),
            None => (status.as_u16(), GENERIC_WRITE_ERROR.to_string()),
        };
        tracing::warn!(endpoint = endpoint.path(), status = code, message = %message, "submission rejected");
        Err(CmsError::Rejected {
            status: code,
            message,
        })
    }
}
