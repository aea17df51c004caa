//! # Tideline Core
//!
//! Protocol-agnostic building blocks shared by every Tideline crate:
//!
//! - [`Bus`]: request-scoped, type-keyed resource map
//! - [`Outcome`]: control flow as data (`Next`, `Branch`, `Fault`)
//! - [`Transition`]: one typed async step of a page pipeline
//! - [`content`]: the CMS content model (entries, blocks, images, links)
//! - [`media`], [`query`], [`form`]: image resolution, list URL state and
//!   form submission state

pub mod bus;
pub mod content;
pub mod form;
pub mod media;
pub mod outcome;
pub mod query;
pub mod transition;

pub use bus::Bus;
pub use content::{Block, BlockKind, Entry, GlobalSettings, Image, Link, ListResponse, Pagination};
pub use form::{FieldErrors, FormKind, FormSlots, FormState, FormValues};
pub use media::MediaResolver;
pub use outcome::{BranchId, NOT_FOUND, Outcome};
pub use query::ListQuery;
pub use transition::{ResourceRequirement, Transition};

pub mod prelude {
    pub use crate::bus::Bus;
    pub use crate::outcome::{NOT_FOUND, Outcome};
    pub use crate::transition::{ResourceRequirement, Transition};
}
