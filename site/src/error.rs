use crate::config::ConfigError;
use tideline_cms::CmsError;
use thiserror::Error;

/// Error carried by page pipeline faults and startup.
#[derive(Debug, Error)]
pub enum SiteError {
    #[error(transparent)]
    Cms(#[from] CmsError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
