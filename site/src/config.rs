//! Site configuration.
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 3000
//!
//! [cms]
//! url = "http://localhost:1337"
//! api_token = "..."
//! page_size = 3
//! timeout_secs = 10
//!
//! [site]
//! title = "Tideline"
//! description = "Surf camps, stories and events"
//!
//! [search]
//! debounce_ms = 300
//! ```
//!
//! Every section and key is optional. After the file, `HOST`, `PORT`,
//! `PUBLIC_API_URL` and `CMS_API_TOKEN` from the environment win.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("environment variable {var} has invalid value `{value}`")]
    Env { var: &'static str, value: String },
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CmsConfig {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,
    /// Cards per listing page.
    pub page_size: u32,
    pub timeout_secs: u64,
}

impl Default for CmsConfig {
    fn default() -> Self {
        Self {
            url: tideline_core::media::DEFAULT_CMS_URL.to_string(),
            api_token: None,
            page_size: 3,
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteMeta {
    pub title: String,
    pub description: String,
}

impl Default for SiteMeta {
    fn default() -> Self {
        Self {
            title: "Tideline".to_string(),
            description: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Quiet period before a typed search is committed.
    pub debounce_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { debounce_ms: 300 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub server: ServerConfig,
    pub cms: CmsConfig,
    pub site: SiteMeta,
    pub search: SearchConfig,
}

impl SiteConfig {
    /// Load from an optional TOML file, apply process environment
    /// overrides, validate.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })?;
                Self::from_toml_str(&raw)?
            }
            None => Self::default(),
        };
        config.apply_env(|var| std::env::var(var).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    /// Apply `HOST`, `PORT`, `PUBLIC_API_URL`, `CMS_API_TOKEN`.
    pub fn apply_env(
        &mut self,
        lookup: impl Fn(&'static str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(host) = lookup("HOST").filter(|h| !h.is_empty()) {
            self.server.host = host;
        }
        if let Some(port) = lookup("PORT").filter(|p| !p.is_empty()) {
            self.server.port = port.trim().parse().map_err(|_| ConfigError::Env {
                var: "PORT",
                value: port.clone(),
            })?;
        }
        if let Some(url) = lookup("PUBLIC_API_URL").filter(|u| !u.is_empty()) {
            self.cms.url = url;
        }
        if let Some(token) = lookup("CMS_API_TOKEN").filter(|t| !t.is_empty()) {
            self.cms.api_token = Some(token);
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.cms.url.trim();
        let host = url
            .strip_prefix("https://")
            .or_else(|| url.strip_prefix("http://"));
        if host.is_none_or(|host| host.trim_matches('/').is_empty()) {
            return Err(ConfigError::Invalid(format!(
                "cms.url must be an http(s) URL, got `{url}`"
            )));
        }
        if self.cms.page_size == 0 {
            return Err(ConfigError::Invalid("cms.page_size must be at least 1".into()));
        }
        if self.cms.timeout_secs == 0 {
            return Err(ConfigError::Invalid("cms.timeout_secs must be at least 1".into()));
        }
        if self.server.port == 0 {
            return Err(ConfigError::Invalid("server.port must not be 0".into()));
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn cms_timeout(&self) -> Duration {
        Duration::from_secs(self.cms.timeout_secs)
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search.debounce_ms)
    }

    /// Effective configuration as TOML. The API token is redacted.
    pub fn to_redacted_toml(&self) -> Result<String, toml::ser::Error> {
        let mut shown = self.clone();
        if shown.cms.api_token.is_some() {
            shown.cms.api_token = Some("<redacted>".to_string());
        }
        toml::to_string_pretty(&shown)
    }
}
