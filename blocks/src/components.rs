//! Small shared pieces: images, links, the submit button.

use crate::context::RenderContext;
use maud::{Markup, html};
use tideline_core::content::{Image, Link};

pub const LOADING_LABEL: &str = "Loading...";

/// Switches a submitting form's button to its loading state so a second
/// click cannot post the form twice.
pub const SUBMIT_SCRIPT: &str = r#"document.addEventListener("submit", function (event) {
  var button = event.target.querySelector('button[type="submit"]');
  if (!button || button.disabled) return;
  button.disabled = true;
  button.setAttribute("aria-disabled", "true");
  button.textContent = button.dataset.loadingText || "Loading...";
});"#;

/// `<img>` for a CMS image, or nothing when there is no usable URL.
pub fn image(
    ctx: &RenderContext,
    image: Option<&Image>,
    class: &str,
    width: u32,
    height: u32,
) -> Markup {
    image_with_alt(ctx, image, None, class, width, height)
}

/// Like [`image`], with a caller-chosen alt text when the CMS has none.
pub fn image_with_alt(
    ctx: &RenderContext,
    image: Option<&Image>,
    fallback_alt: Option<&str>,
    class: &str,
    width: u32,
    height: u32,
) -> Markup {
    let Some(img) = image else {
        return html! {};
    };
    let Some(src) = ctx.media.resolve(&img.url) else {
        return html! {};
    };
    let alt = match (img.alternative_text.as_deref(), fallback_alt) {
        (Some(alt), _) if !alt.trim().is_empty() => alt,
        (_, Some(fallback)) => fallback,
        _ => img.alt(),
    };

    html! {
        img src=(src) alt=(alt) class=[(!class.is_empty()).then_some(class)]
            width=(width) height=(height) loading="lazy";
    }
}

/// Anchor for a CMS link. External links open in a new tab.
pub fn link(link: &Link, class: &str, body: Markup) -> Markup {
    html! {
        a href=(link.href) class=[(!class.is_empty()).then_some(class)] target=(link.target())
            rel=[link.is_external.then_some("noopener noreferrer")] {
            (body)
        }
    }
}

/// Call-to-action button styled for `theme`.
pub fn cta_button(cta: &Link, theme: &str) -> Markup {
    link(
        cta,
        &format!("btn btn--medium btn--{theme}"),
        html! { (cta.text) },
    )
}

pub fn submit_button(text: &str, class: &str, pending: bool) -> Markup {
    html! {
        button type="submit" class=(class) aria-disabled=(if pending { "true" } else { "false" }) disabled[pending]
            data-loading-text=(LOADING_LABEL) {
            @if pending { (LOADING_LABEL) } @else { (text) }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tideline_core::media::MediaResolver;

    fn ctx() -> RenderContext {
        RenderContext::new(MediaResolver::new("https://cms.example.com"))
    }

    #[test]
    fn test_image_resolves_url_and_falls_back_on_alt() {
        let img = Image {
            url: "/uploads/reef.jpg".into(),
            alternative_text: None,
        };
        let html = image(&ctx(), Some(&img), "card", 400, 400).into_string();
        assert!(html.contains(r#"src="https://cms.example.com/uploads/reef.jpg""#));
        assert!(html.contains(r#"alt="No alternative text provided""#));

        let custom = image_with_alt(&ctx(), Some(&img), Some("Event image"), "", 1, 1).into_string();
        assert!(custom.contains(r#"alt="Event image""#));
        assert!(!custom.contains("class="));
    }

    #[test]
    fn test_missing_image_renders_nothing() {
        let blank = Image::default();
        assert_eq!(image(&ctx(), None, "x", 1, 1).into_string(), "");
        assert_eq!(image(&ctx(), Some(&blank), "x", 1, 1).into_string(), "");
    }

    #[test]
    fn test_external_link_opens_new_tab() {
        let external = Link {
            href: "https://surfline.com".into(),
            text: "Forecast".into(),
            is_external: true,
        };
        let html = cta_button(&external, "orange").into_string();
        assert!(html.contains(r#"target="_blank""#));
        assert!(html.contains(r#"rel="noopener noreferrer""#));
        assert!(html.contains("btn--orange"));

        let internal = Link {
            is_external: false,
            ..external
        };
        let html = cta_button(&internal, "orange").into_string();
        assert!(html.contains(r#"target="_self""#));
        assert!(!html.contains("rel="));
    }

    #[test]
    fn test_pending_submit_button_is_disabled() {
        let idle = submit_button("Sign Up", "btn", false).into_string();
        assert!(idle.contains(">Sign Up</button>"));
        assert!(!idle.contains(" disabled"));

        let pending = submit_button("Sign Up", "btn", true).into_string();
        assert!(pending.contains(" disabled"));
        assert!(pending.contains(">Loading...</button>"));
    }
}
