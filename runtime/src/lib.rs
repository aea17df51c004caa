//! # Tideline Runtime
//!
//! Executes page pipelines ([`Axon`]) and provides the two timing helpers the
//! list views need: input [`debounce`] and [`RequestSequence`] for discarding
//! stale responses.

pub mod axon;
pub mod debounce;
pub mod sequence;

pub mod prelude {
    pub use crate::axon::Axon;
    pub use crate::debounce::debounce;
    pub use crate::sequence::{RequestSequence, Ticket};
}

pub use axon::Axon;
pub use debounce::debounce;
pub use sequence::{RequestSequence, Ticket};
