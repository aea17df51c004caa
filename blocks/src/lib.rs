//! # Tideline Blocks
//!
//! Maud renderers for everything a page is made of: CMS content blocks,
//! cards, paged lists with search, signup forms and the page layout.
//!
//! [`render_blocks`] is the block registry: one exhaustive `match` over
//! [`Block`](tideline_core::content::Block), so adding a block type without
//! a renderer does not compile.

pub mod block;
pub mod card;
pub mod components;
pub mod context;
pub mod date;
pub mod forms;
pub mod layout;
pub mod list;
pub mod markdown;

pub use block::{TocEntry, article_overview, render_block, render_blocks, table_of_contents};
pub use card::card;
pub use context::RenderContext;
pub use date::format_date;
pub use forms::event_signup_form;
pub use layout::{PageMeta, document};
pub use list::{ListSection, ListView};
