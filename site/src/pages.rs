//! Render steps: turn loaded content into the page HTML.

use crate::config::SiteConfig;
use crate::error::SiteError;
use crate::loaders::{ArticlePage, BlockPage, BlogIndex, EventPage, EventsIndex, SiteChrome};
use crate::resources::SiteResources;
use async_trait::async_trait;
use maud::{DOCTYPE, Markup, html};
use std::time::Duration;
use tideline_blocks::block::hero_section;
use tideline_blocks::{
    ListSection, ListView, PageMeta, RenderContext, article_overview, document, event_signup_form,
    render_blocks, table_of_contents,
};
use tideline_core::bus::Bus;
use tideline_core::content::HeroSection;
use tideline_core::outcome::Outcome;
use tideline_core::query::ListQuery;
use tideline_core::transition::Transition;
use tideline_http::PageRequest;

pub const NOT_FOUND_HEADLINE: &str = "Page not found";
pub const LATEST_ARTICLES: &str = "Check out our latest articles";
pub const FEATURED_ARTICLES: &str = "Featured Articles";
pub const ALL_EVENTS: &str = "All Events";
pub const FEATURED_EVENTS: &str = "Featured Events";

const ARTICLE_HERO_THEME: &str = "orange";

/// Wrap `body` in the site layout. Header and footer come from the
/// [`SiteChrome`] left on the bus by `LoadGlobal`.
fn layout(
    res: &SiteResources,
    bus: &Bus,
    ctx: &RenderContext,
    title: &str,
    description: &str,
    path: &str,
    body: Markup,
) -> String {
    let global = bus.get::<SiteChrome>().and_then(|chrome| chrome.0.as_ref());
    let site_title = global
        .and_then(|g| g.title.as_deref())
        .filter(|t| !t.is_empty())
        .unwrap_or(res.config.site.title.as_str());
    let description = if description.is_empty() {
        global
            .and_then(|g| g.description.as_deref())
            .unwrap_or(res.config.site.description.as_str())
    } else {
        description
    };

    let meta = PageMeta {
        title,
        description,
        site_title,
        path,
    };
    document(meta, global, ctx, body).into_string()
}

/// A list without search or pagination, always on its first page.
fn featured_list(
    headline: &str,
    card_base: &str,
    path: &str,
    section: &ListSection,
    ctx: &RenderContext,
) -> Markup {
    ListView {
        headline,
        card_base,
        path,
        state: &ListQuery::default(),
        section,
        show_search: false,
        show_pagination: false,
        debounce: Duration::ZERO,
    }
    .render(ctx)
}

/// Home page and generic CMS pages.
pub struct RenderBlockPage;

#[async_trait]
impl Transition<BlockPage, String> for RenderBlockPage {
    type Error = SiteError;
    type Resources = SiteResources;

    async fn run(&self, page: BlockPage, res: &SiteResources, bus: &mut Bus) -> Outcome<String, SiteError> {
        let ctx = res.render_context(bus);
        let body = render_blocks(&page.entry.blocks, &ctx);
        Outcome::next(layout(res, bus, &ctx, &page.entry.title, &page.entry.description, &page.path, body))
    }
}

pub struct RenderBlogIndex;

#[async_trait]
impl Transition<BlogIndex, String> for RenderBlogIndex {
    type Error = SiteError;
    type Resources = SiteResources;

    async fn run(&self, page: BlogIndex, res: &SiteResources, bus: &mut Bus) -> Outcome<String, SiteError> {
        let ctx = res.render_context(bus);
        let articles = ListView {
            headline: LATEST_ARTICLES,
            card_base: "blog",
            path: &page.path,
            state: &page.state,
            section: &page.articles,
            show_search: true,
            show_pagination: true,
            debounce: res.config.search_debounce(),
        };
        let body = html! {
            (render_blocks(&page.intro.blocks, &ctx))
            (articles.render(&ctx))
        };

        let intro = &page.intro;
        Outcome::next(layout(res, bus, &ctx, &intro.title, &intro.description, &page.path, body))
    }
}

pub struct RenderArticle;

#[async_trait]
impl Transition<ArticlePage, String> for RenderArticle {
    type Error = SiteError;
    type Resources = SiteResources;

    async fn run(&self, page: ArticlePage, res: &SiteResources, bus: &mut Bus) -> Outcome<String, SiteError> {
        let ctx = res.render_context(bus);
        let article = &page.article;
        let hero = HeroSection {
            theme: ARTICLE_HERO_THEME.to_string(),
            heading: article.title.clone(),
            image: article.image.clone(),
            cta: None,
            logo: None,
            author: article.author.clone(),
            published_at: article.published_at.clone(),
            darken: true,
        };
        let toc = table_of_contents(&article.blocks);

        let body = html! {
            (hero_section(&hero, &ctx))
            div.container {
                (article_overview(&article.title, &article.description, &toc))
                (render_blocks(&article.blocks, &ctx))
            }
            (featured_list(FEATURED_ARTICLES, "blog", &page.path, &page.featured, &ctx))
        };
        Outcome::next(layout(res, bus, &ctx, &article.title, &article.description, &page.path, body))
    }
}

pub struct RenderEventsIndex;

#[async_trait]
impl Transition<EventsIndex, String> for RenderEventsIndex {
    type Error = SiteError;
    type Resources = SiteResources;

    async fn run(&self, page: EventsIndex, res: &SiteResources, bus: &mut Bus) -> Outcome<String, SiteError> {
        let ctx = res.render_context(bus);
        let events = ListView {
            headline: ALL_EVENTS,
            card_base: "events",
            path: &page.path,
            state: &page.state,
            section: &page.events,
            show_search: true,
            show_pagination: true,
            debounce: res.config.search_debounce(),
        };
        let body = html! {
            (event_signup_form(&page.signup, false, &ctx))
            (events.render(&ctx))
        };
        Outcome::next(layout(res, bus, &ctx, "Events", "", &page.path, body))
    }
}

pub struct RenderEvent;

#[async_trait]
impl Transition<EventPage, String> for RenderEvent {
    type Error = SiteError;
    type Resources = SiteResources;

    async fn run(&self, page: EventPage, res: &SiteResources, bus: &mut Bus) -> Outcome<String, SiteError> {
        let ctx = res.render_context(bus);
        let body = html! {
            (event_signup_form(&page.event, true, &ctx))
            (featured_list(FEATURED_EVENTS, "events", &page.path, &page.featured, &ctx))
        };
        Outcome::next(layout(res, bus, &ctx, &page.event.title, &page.event.description, &page.path, body))
    }
}

/// Body of every 404.
pub struct RenderNotFound;

#[async_trait]
impl Transition<PageRequest, String> for RenderNotFound {
    type Error = SiteError;
    type Resources = SiteResources;

    async fn run(&self, req: PageRequest, res: &SiteResources, bus: &mut Bus) -> Outcome<String, SiteError> {
        let ctx = res.render_context(bus);
        let body = html! {
            section.not-found.container {
                h1 { (NOT_FOUND_HEADLINE) }
                p { "Sorry, we couldn't find what you were looking for." }
                a.btn.btn--medium.btn--turquoise href="/" { "Back to home" }
            }
        };
        Outcome::next(layout(res, bus, &ctx, NOT_FOUND_HEADLINE, "", &req.path, body))
    }
}

/// Static page served with every 500. Built once at startup so it needs
/// nothing from the CMS.
pub fn error_page(config: &SiteConfig) -> String {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                title { "Something went wrong | " (config.site.title) }
            }
            body {
                main {
                    section.not-found.container {
                        h1 { "Something went wrong" }
                        p { "We could not load this page right now. Please try again in a moment." }
                        a.btn.btn--medium.btn--turquoise href="/" { "Back to home" }
                    }
                }
            }
        }
    }
    .into_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_page_names_the_site() {
        let mut config = SiteConfig::default();
        config.site.title = "Surf Camp".into();
        let page = error_page(&config);
        assert!(page.contains("Something went wrong | Surf Camp"));
        assert!(page.starts_with("<!DOCTYPE html>"));
    }
}
