use crate::components::image;
use crate::context::RenderContext;
use crate::date::format_date;
use maud::{Markup, html};
use tideline_core::content::Entry;

pub const EXCERPT_CHARS: usize = 144;

/// First [`EXCERPT_CHARS`] characters of `text` followed by `...`.
pub fn excerpt(text: &str) -> String {
    let mut short: String = text.chars().take(EXCERPT_CHARS).collect();
    short.push_str("...");
    short
}

/// Card linking to `/{base_path}/{slug}`.
pub fn card(entry: &Entry, base_path: &str, ctx: &RenderContext) -> Markup {
    let href = format!("/{}/{}", base_path.trim_matches('/'), entry.slug);
    let date = entry
        .start_date
        .as_deref()
        .or(entry.created_at.as_deref());

    html! {
        a.content-items__card href=(href) {
            div.content-items__card-img {
                (image(ctx, entry.image.as_ref(), "", 400, 400))
            }
            div.content-items__card-text {
                h5 { (entry.title) }
                @if let Some(price) = &entry.price {
                    p { span { "Price: " } (price.to_string()) }
                }
                @if let Some(date) = date {
                    p { (format_date(date)) }
                }
                p { (excerpt(&entry.description)) }
            }
        }
    }
}
