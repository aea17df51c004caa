//! Markdown for block copy.
//!
//! CMS editors write markdown. Raw HTML inside it is shown as text, and
//! `javascript:` link targets are dropped.

use maud::{Markup, PreEscaped};
use pulldown_cmark::{CowStr, Event, Options, Parser, Tag, html::push_html};

pub fn render_markdown(content: &str) -> Markup {
    let options = Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TABLES;
    let events = Parser::new_ext(content, options).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        Event::Start(Tag::Link {
            link_type,
            dest_url,
            title,
            id,
        }) if is_script_url(&dest_url) => Event::Start(Tag::Link {
            link_type,
            dest_url: CowStr::Borrowed("#"),
            title,
            id,
        }),
        other => other,
    });

    let mut html = String::with_capacity(content.len() * 2);
    push_html(&mut html, events);
    PreEscaped(html)
}

fn is_script_url(url: &str) -> bool {
    let scheme: String = url
        .trim_start()
        .chars()
        .take(11)
        .collect::<String>()
        .to_ascii_lowercase();
    scheme.starts_with("javascript:") || scheme.starts_with("vbscript:")
}

/// Slugify text for use as an HTML id attribute.
///
/// Lowercases, replaces non-alphanumeric runs with hyphens, strips
/// leading/trailing hyphens.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut prev_hyphen = true;
    for ch in text.chars() {
        if ch.is_alphanumeric() {
            slug.extend(ch.to_lowercase());
            prev_hyphen = false;
        } else if !prev_hyphen {
            slug.push('-');
            prev_hyphen = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renders_basic_markdown() {
        let html = render_markdown("Paddle **hard**.\n\n- reef\n- point").into_string();
        assert!(html.contains("<strong>hard</strong>"));
        assert!(html.contains("<li>reef</li>"));
    }

    #[test]
    fn test_raw_html_is_escaped() {
        let html = render_markdown("Hi <script>alert(1)</script>").into_string();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_script_links_are_neutralised() {
        let html = render_markdown("[click](javascript:alert(1))").into_string();
        assert!(html.contains(r##"href="#""##));
        assert!(!html.contains("javascript"));
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("What to Pack?"), "what-to-pack");
        assert_eq!(slugify("  Day 1 -- Arrival "), "day-1-arrival");
        assert_eq!(slugify("!!!"), "");
    }
}
