//! Page layout: document shell, header and footer.

use crate::components::{SUBMIT_SCRIPT, image, link};
use crate::context::RenderContext;
use chrono::Datelike;
use maud::{DOCTYPE, Markup, PreEscaped, html};
use tideline_core::content::{Footer, GlobalSettings, Header, Logo};

/// Paths whose header sits on a dark hero and uses the light variant.
const LIGHT_HEADER_PATHS: &[&str] = &["/experience"];

/// Head metadata for one page.
#[derive(Debug, Clone, Copy)]
pub struct PageMeta<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub site_title: &'a str,
    /// Request path, for path-dependent chrome.
    pub path: &'a str,
}

impl PageMeta<'_> {
    fn full_title(&self) -> String {
        if self.title.is_empty() || self.title == self.site_title {
            self.site_title.to_string()
        } else {
            format!("{} | {}", self.title, self.site_title)
        }
    }
}

/// Complete HTML document around `body`.
///
/// Header and footer come from the global settings; either is omitted when
/// the settings (or that section) are missing.
pub fn document(
    meta: PageMeta<'_>,
    global: Option<&GlobalSettings>,
    ctx: &RenderContext,
    body: Markup,
) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (meta.full_title()) }
                @if !meta.description.is_empty() {
                    meta name="description" content=(meta.description);
                }
            }
            body {
                @if let Some(header) = global.and_then(|g| g.header.as_ref()) {
                    (site_header(header, meta.path, ctx))
                }
                main { (body) }
                @if let Some(footer) = global.and_then(|g| g.footer.as_ref()) {
                    (site_footer(footer, ctx))
                }
                script { (PreEscaped(SUBMIT_SCRIPT)) }
            }
        }
    }
}

fn logo(logo: Option<&Logo>, class: &str, size: u32, ctx: &RenderContext) -> Markup {
    let Some(logo) = logo else {
        return html! {};
    };
    let picture = image(ctx, logo.image.as_ref(), class, size, size);
    if picture.0.is_empty() {
        html! {
            @if let Some(text) = logo.logo_text.as_deref() {
                span class=(class) { (text) }
            }
        }
    } else {
        picture
    }
}

pub fn site_header(header: &Header, path: &str, ctx: &RenderContext) -> Markup {
    let light = LIGHT_HEADER_PATHS.contains(&path);
    let class = if light { "header header--light" } else { "header" };
    let logo_class = if light {
        "header__logo header__logo--white"
    } else {
        "header__logo header__logo--black"
    };

    html! {
        header class=(class) {
            a href="/" { (logo(header.logo.as_ref(), logo_class, 120, ctx)) }
            ul.header__nav {
                @for item in &header.navigation {
                    li { (link(item, "", html! { h5 { (item.text) } })) }
                }
            }
            @if let Some(cta) = &header.cta {
                (link(cta, "btn btn--black btn--small", html! { (cta.text) }))
            }
        }
    }
}

pub fn site_footer(footer: &Footer, ctx: &RenderContext) -> Markup {
    let year = chrono::Utc::now().year();
    html! {
        footer.footer {
            nav.footer__nav {
                (logo(footer.logo.as_ref(), "footer__logo--white", 100, ctx))
                ul.footer__links {
                    @for item in &footer.navigation {
                        li { (link(item, "", html! { h5 { (item.text) } })) }
                    }
                }
            }
            div.footer__policies {
                ul.footer__policies-nav {
                    @for item in &footer.policies {
                        li { (link(item, "copy", html! { (item.text) })) }
                    }
                }
                p.copy { "© " (year) " " (footer.copy) }
            }
        }
    }
}
