//! Image URL resolution.
//!
//! The CMS stores uploads with host-relative paths (`/uploads/wave.jpg`).
//! Pages need absolute URLs, so relative paths are joined onto the CMS base.

/// Default CMS origin when none is configured.
pub const DEFAULT_CMS_URL: &str = "http://localhost:1337";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaResolver {
    base: String,
}

impl MediaResolver {
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into();
        Self {
            base: base.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base
    }

    /// Resolve an image URL for display.
    ///
    /// `None` for a blank URL. Data URIs, absolute and protocol-relative URLs
    /// pass through untouched; anything else is prefixed with the CMS base.
    pub fn resolve(&self, url: &str) -> Option<String> {
        let url = url.trim();
        if url.is_empty() {
            return None;
        }
        if url.starts_with("data:")
            || url.starts_with("http://")
            || url.starts_with("https://")
            || url.starts_with("//")
        {
            return Some(url.to_string());
        }
        if url.starts_with('/') {
            Some(format!("{}{}", self.base, url))
        } else {
            Some(format!("{}/{}", self.base, url))
        }
    }
}

impl Default for MediaResolver {
    fn default() -> Self {
        Self::new(DEFAULT_CMS_URL)
    }
}
