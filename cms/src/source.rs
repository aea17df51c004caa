use crate::error::CmsError;
use crate::params::ListParams;
use crate::resource::{Collection, SingleType, WriteEndpoint};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tideline_core::content::{Entry, GlobalSettings, ListResponse};

/// Read and write access to the CMS.
///
/// Every call is a fresh read; nothing is cached between requests.
#[async_trait]
pub trait ContentSource: Send + Sync + 'static {
    async fn list(&self, collection: Collection, params: &ListParams)
    -> Result<ListResponse, CmsError>;

    /// The `data` member of a single type, `None` when it has no content.
    async fn single(&self, single: SingleType) -> Result<Option<Value>, CmsError>;

    /// POST `{ "data": payload }` to a write endpoint.
    async fn submit(&self, endpoint: WriteEndpoint, payload: Value) -> Result<(), CmsError>;

    /// The entry of `collection` with this slug, blocks included.
    async fn find_by_slug(&self, collection: Collection, slug: &str) -> Result<Entry, CmsError> {
        let response = self.list(collection, &ListParams::by_slug(slug)).await?;
        response
            .data
            .into_iter()
            .next()
            .ok_or_else(|| CmsError::NotFound {
                collection: collection.to_string(),
                slug: slug.to_string(),
            })
    }

    async fn home_page(&self) -> Result<Option<Entry>, CmsError> {
        decode_single(self.single(SingleType::HomePage).await?, SingleType::HomePage)
    }

    async fn global(&self) -> Result<GlobalSettings, CmsError> {
        Ok(decode_single(self.single(SingleType::Global).await?, SingleType::Global)?
            .unwrap_or_default())
    }
}

fn decode_single<T: DeserializeOwned>(
    data: Option<Value>,
    single: SingleType,
) -> Result<Option<T>, CmsError> {
    data.map(|value| {
        serde_json::from_value(value).map_err(|source| CmsError::Decode {
            resource: single.to_string(),
            source,
        })
    })
    .transpose()
}
