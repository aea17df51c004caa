//! # Tideline Site
//!
//! The marketing site: page pipelines built from the CMS content, form
//! actions, configuration and the `tideline` server binary.
//!
//! Each route is one [`Axon`](tideline_runtime::Axon):
//!
//! ```text
//! CaptureForm -> LoadGlobal -> Load<Page> -> HandleFormPost -> Render<Page>
//! ```

pub mod actions;
pub mod config;
pub mod error;
pub mod loaders;
pub mod pages;
pub mod resources;
pub mod routes;
pub mod telemetry;

pub use actions::{
    CaptureForm, EventSignupAction, FormAction, HandleFormPost, PendingForm, SubscribeAction,
};
pub use config::{ConfigError, SiteConfig};
pub use error::SiteError;
pub use resources::SiteResources;
pub use routes::build_ingress;
pub use telemetry::init_tracing;
