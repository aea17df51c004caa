//! The site's route table.

use crate::actions::{CaptureForm, HandleFormPost};
use crate::config::SiteConfig;
use crate::error::SiteError;
use crate::loaders::{
    LoadArticle, LoadBlogIndex, LoadEvent, LoadEventsIndex, LoadGlobal, LoadHomePage, LoadPage,
};
use crate::pages::{
    self, RenderArticle, RenderBlockPage, RenderBlogIndex, RenderEvent, RenderEventsIndex,
    RenderNotFound,
};
use crate::resources::SiteResources;
use tideline_http::{HttpIngress, PageRequest, Tideline};
use tideline_runtime::Axon;

pub const HEALTH_PATH: &str = "/healthz";

type Circuit = Axon<PageRequest, PageRequest, SiteError, SiteResources>;

/// Shared head of every page: park any posted form, then load the
/// header/footer settings.
fn page_circuit(label: &str) -> Circuit {
    Circuit::new(label).then(CaptureForm).then(LoadGlobal)
}

/// Every route of the site, bound to the configured address.
pub fn build_ingress(config: &SiteConfig) -> HttpIngress<SiteResources> {
    Tideline::http::<SiteResources>()
        .bind(config.bind_addr())
        .page(
            "/",
            page_circuit("HomePage")
                .then(LoadHomePage)
                .then(HandleFormPost)
                .then(RenderBlockPage),
        )
        .page(
            "/blog",
            page_circuit("BlogIndex")
                .then(LoadBlogIndex)
                .then(HandleFormPost)
                .then(RenderBlogIndex),
        )
        .page(
            "/blog/{slug}",
            page_circuit("Article")
                .then(LoadArticle)
                .then(HandleFormPost)
                .then(RenderArticle),
        )
        .page(
            "/events",
            page_circuit("EventsIndex")
                .then(LoadEventsIndex)
                .then(HandleFormPost)
                .then(RenderEventsIndex),
        )
        .page(
            "/events/{slug}",
            page_circuit("Event")
                .then(LoadEvent)
                .then(HandleFormPost)
                .then(RenderEvent),
        )
        .page(
            "/{slug}",
            page_circuit("Page")
                .then(LoadPage)
                .then(HandleFormPost)
                .then(RenderBlockPage),
        )
        .fallback(Circuit::new("NotFound").then(LoadGlobal).then(RenderNotFound))
        .error_page(pages::error_page(config))
        .health_check(HEALTH_PATH)
}
