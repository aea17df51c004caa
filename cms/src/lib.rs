//! # Tideline CMS
//!
//! Reads pages, articles, events and site settings from a Strapi-style REST
//! API and forwards form submissions to it.
//!
//! Everything that talks to the CMS goes through [`ContentSource`].
//! [`ContentClient`] is the HTTP implementation; tests substitute their own.

pub mod client;
pub mod error;
pub mod listing;
pub mod params;
pub mod resource;
pub mod source;

pub use client::ContentClient;
pub use error::CmsError;
pub use listing::ListController;
pub use params::{ListParams, Populate};
pub use resource::{Collection, SingleType, WriteEndpoint};
pub use source::ContentSource;
