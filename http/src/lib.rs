//! # Tideline HTTP
//!
//! Wires HTTP requests to page pipelines.
//!
//! ```rust,ignore
//! Tideline::http::<SiteResources>()
//!     .bind("0.0.0.0:3000")
//!     .page("/", home)
//!     .page("/blog/{slug}", article)
//!     .fallback(not_found)
//!     .run(resources)
//!     .await?;
//! ```
//!
//! Every pipeline takes a [`PageRequest`] and yields the page HTML. The
//! ingress maps the pipeline's [`Outcome`](tideline_core::Outcome) to a
//! response: `Next` is a 200, the `not_found` branch runs the fallback with a
//! 404, anything else is a 500.

pub mod ingress;
pub mod request;
pub mod response;

pub use ingress::{HttpIngress, IngressError, RawIngressService, Tideline};
pub use request::{PageRequest, RequestError};

pub mod prelude {
    pub use crate::ingress::{HttpIngress, Tideline};
    pub use crate::request::PageRequest;
    pub use http::Method;
}
