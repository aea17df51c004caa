//! Read steps: fetch what a page shows and hand it to its renderer.
//!
//! A missing primary entry leaves the pipeline on the `not_found` branch.
//! Any other failure of a primary read faults the pipeline. Secondary lists
//! (featured, all entries) never fault; a failed list renders its notice.

use crate::error::SiteError;
use crate::resources::SiteResources;
use async_trait::async_trait;
use serde_json::json;
use tideline_blocks::ListSection;
use tideline_cms::{CmsError, Collection, ListController};
use tideline_core::bus::Bus;
use tideline_core::content::{Entry, GlobalSettings};
use tideline_core::outcome::Outcome;
use tideline_core::query::ListQuery;
use tideline_core::transition::Transition;
use tideline_http::PageRequest;

/// Slug of the page whose blocks introduce the blog index.
pub const BLOG_PAGE_SLUG: &str = "blog";
/// Slug of the event whose signup form heads the events index.
pub const STAY_IN_TOUCH_SLUG: &str = "stay-in-touch";

/// Header and footer settings for this request. `None` when they could not
/// be loaded; the page then renders without them.
#[derive(Debug, Clone, Default)]
pub struct SiteChrome(pub Option<GlobalSettings>);

/// A page made only of CMS blocks: the home page or `/{slug}`.
#[derive(Debug, Clone)]
pub struct BlockPage {
    pub path: String,
    pub entry: Entry,
}

#[derive(Debug, Clone)]
pub struct BlogIndex {
    pub path: String,
    pub intro: Entry,
    pub state: ListQuery,
    pub articles: ListSection,
}

#[derive(Debug, Clone)]
pub struct ArticlePage {
    pub path: String,
    pub article: Entry,
    pub featured: ListSection,
}

#[derive(Debug, Clone)]
pub struct EventsIndex {
    pub path: String,
    pub signup: Entry,
    pub state: ListQuery,
    pub events: ListSection,
}

#[derive(Debug, Clone)]
pub struct EventPage {
    pub path: String,
    pub event: Entry,
    pub featured: ListSection,
}

fn required<T>(result: Result<T, CmsError>) -> Outcome<T, SiteError> {
    match result {
        Ok(value) => Outcome::next(value),
        Err(CmsError::NotFound { collection, slug }) => {
            tracing::debug!(%collection, %slug, "no such entry");
            Outcome::not_found(json!({ "collection": collection, "slug": slug }))
        }
        Err(err) => Outcome::fault(err.into()),
    }
}

async fn load_section(controller: &ListController) -> ListSection {
    match controller.load().await {
        Some(Ok(list)) => ListSection::Loaded(list),
        Some(Err(_)) | None => ListSection::Failed,
    }
}

fn list(res: &SiteResources, collection: Collection) -> ListController {
    ListController::new(res.source.clone(), collection, res.config.cms.page_size)
}

fn slug(req: &PageRequest) -> Option<String> {
    req.param("slug").map(str::to_string)
}

/// Puts [`SiteChrome`] on the bus.
pub struct LoadGlobal;

#[async_trait]
impl Transition<PageRequest, PageRequest> for LoadGlobal {
    type Error = SiteError;
    type Resources = SiteResources;

    async fn run(&self, req: PageRequest, res: &SiteResources, bus: &mut Bus) -> Outcome<PageRequest, SiteError> {
        let global = match res.source.global().await {
            Ok(global) => Some(global),
            Err(err) => {
                tracing::warn!(error = %err, "global settings unavailable, rendering without header and footer");
                None
            }
        };
        bus.insert(SiteChrome(global));
        Outcome::next(req)
    }
}

pub struct LoadHomePage;

#[async_trait]
impl Transition<PageRequest, BlockPage> for LoadHomePage {
    type Error = SiteError;
    type Resources = SiteResources;

    async fn run(&self, req: PageRequest, res: &SiteResources, _: &mut Bus) -> Outcome<BlockPage, SiteError> {
        match res.source.home_page().await {
            Ok(Some(entry)) => Outcome::next(BlockPage { path: req.path, entry }),
            Ok(None) => Outcome::not_found(json!({ "single": "home-page" })),
            Err(err) => Outcome::fault(err.into()),
        }
    }
}

/// Generic CMS page at `/{slug}`.
pub struct LoadPage;

#[async_trait]
impl Transition<PageRequest, BlockPage> for LoadPage {
    type Error = SiteError;
    type Resources = SiteResources;

    async fn run(&self, req: PageRequest, res: &SiteResources, _: &mut Bus) -> Outcome<BlockPage, SiteError> {
        let Some(slug) = slug(&req) else {
            return Outcome::not_found(json!({ "path": req.path }));
        };
        required(res.source.find_by_slug(Collection::Pages, &slug).await)
            .map(|entry| BlockPage { path: req.path, entry })
    }
}

pub struct LoadBlogIndex;

#[async_trait]
impl Transition<PageRequest, BlogIndex> for LoadBlogIndex {
    type Error = SiteError;
    type Resources = SiteResources;

    async fn run(&self, req: PageRequest, res: &SiteResources, _: &mut Bus) -> Outcome<BlogIndex, SiteError> {
        let articles = list(res, Collection::Articles).with_query(req.list_query());
        let (intro, section) = tokio::join!(
            res.source.find_by_slug(Collection::Pages, BLOG_PAGE_SLUG),
            load_section(&articles),
        );

        required(intro).map(|intro| BlogIndex {
            path: req.path,
            intro,
            state: articles.state(),
            articles: section,
        })
    }
}

pub struct LoadArticle;

#[async_trait]
impl Transition<PageRequest, ArticlePage> for LoadArticle {
    type Error = SiteError;
    type Resources = SiteResources;

    async fn run(&self, req: PageRequest, res: &SiteResources, _: &mut Bus) -> Outcome<ArticlePage, SiteError> {
        let Some(slug) = slug(&req) else {
            return Outcome::not_found(json!({ "path": req.path }));
        };
        let featured = list(res, Collection::Articles).featured();
        let (article, featured) = tokio::join!(
            res.source.find_by_slug(Collection::Articles, &slug),
            load_section(&featured),
        );

        required(article).map(|article| ArticlePage {
            path: req.path,
            article,
            featured,
        })
    }
}

pub struct LoadEventsIndex;

#[async_trait]
impl Transition<PageRequest, EventsIndex> for LoadEventsIndex {
    type Error = SiteError;
    type Resources = SiteResources;

    async fn run(&self, req: PageRequest, res: &SiteResources, _: &mut Bus) -> Outcome<EventsIndex, SiteError> {
        let events = list(res, Collection::Events).with_query(req.list_query());
        let (signup, section) = tokio::join!(
            res.source.find_by_slug(Collection::Events, STAY_IN_TOUCH_SLUG),
            load_section(&events),
        );

        required(signup).map(|signup| EventsIndex {
            path: req.path,
            signup,
            state: events.state(),
            events: section,
        })
    }
}

pub struct LoadEvent;

#[async_trait]
impl Transition<PageRequest, EventPage> for LoadEvent {
    type Error = SiteError;
    type Resources = SiteResources;

    async fn run(&self, req: PageRequest, res: &SiteResources, _: &mut Bus) -> Outcome<EventPage, SiteError> {
        let Some(slug) = slug(&req) else {
            return Outcome::not_found(json!({ "path": req.path }));
        };
        let featured = list(res, Collection::Events).featured();
        let (event, featured) = tokio::join!(
            res.source.find_by_slug(Collection::Events, &slug),
            load_section(&featured),
        );

        required(event).map(|event| EventPage {
            path: req.path,
            event,
            featured,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn missing() -> CmsError {
        CmsError::NotFound {
            collection: "articles".into(),
            slug: "gone".into(),
        }
    }

    fn offline() -> CmsError {
        CmsError::Status {
            url: "http://cms/api/articles".into(),
            status: 503,
            body: String::new(),
        }
    }

    #[test]
    fn test_required_maps_missing_entry_to_not_found() {
        assert!(required::<()>(Err(missing())).is_not_found());
        assert!(matches!(required::<()>(Err(offline())), Outcome::Fault(SiteError::Cms(_))));
        assert!(matches!(required(Ok(1)), Outcome::Next(1)));
    }
}
