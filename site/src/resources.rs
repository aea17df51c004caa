//! Shared, read-only state lent to every request.

use crate::config::SiteConfig;
use crate::error::SiteError;
use std::sync::Arc;
use tideline_blocks::RenderContext;
use tideline_cms::{ContentClient, ContentSource};
use tideline_core::bus::Bus;
use tideline_core::form::FormSlots;
use tideline_core::media::MediaResolver;
use tideline_core::transition::ResourceRequirement;

#[derive(Clone)]
pub struct SiteResources {
    pub source: Arc<dyn ContentSource>,
    pub media: MediaResolver,
    pub config: Arc<SiteConfig>,
}

impl ResourceRequirement for SiteResources {}

impl SiteResources {
    /// Resources backed by the CMS named in `config`.
    pub fn from_config(config: SiteConfig) -> Result<Self, SiteError> {
        let client = ContentClient::new(
            &config.cms.url,
            config.cms.api_token.clone(),
            config.cms_timeout(),
        )?;
        Ok(Self::new(config, Arc::new(client)))
    }

    pub fn new(config: SiteConfig, source: Arc<dyn ContentSource>) -> Self {
        Self {
            media: MediaResolver::new(config.cms.url.clone()),
            source,
            config: Arc::new(config),
        }
    }

    /// Render context for this request, carrying any form results on the
    /// bus.
    pub fn render_context(&self, bus: &Bus) -> RenderContext {
        let forms = bus.get::<FormSlots>().cloned().unwrap_or_default();
        RenderContext::new(self.media.clone()).with_forms(forms)
    }
}
