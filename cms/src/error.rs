use thiserror::Error;

#[derive(Debug, Error)]
pub enum CmsError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered {status}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    #[error("could not decode {resource}: {source}")]
    Decode {
        resource: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("no {collection} entry with slug `{slug}`")]
    NotFound { collection: String, slug: String },

    /// The CMS refused a write. `message` is safe to show to visitors.
    #[error("submission rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("invalid CMS base URL `{0}`")]
    InvalidBaseUrl(String),
}

impl CmsError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, CmsError::NotFound { .. })
    }
}
