//! Paged, searchable card grids.

use crate::card::card;
use crate::context::RenderContext;
use maud::{Markup, PreEscaped, html};
use tideline_core::content::{ListResponse, Pagination};
use std::time::Duration;
use tideline_core::query::ListQuery;

pub const FAILED_NOTICE: &str = "We could not load this list right now. Please try again later.";
pub const EMPTY_NOTICE: &str = "No results";

/// Debounces typing in a search box, then reloads the page with `page=1`
/// and the new `query` (or without `query` when the box is empty).
pub const SEARCH_SCRIPT: &str = r#"document.querySelectorAll("form[data-search-form]").forEach(function (form) {
  var input = form.querySelector('input[name="query"]');
  var wait = parseInt(form.dataset.debounceMs, 10) || 300;
  var timer;
  input.addEventListener("input", function () {
    clearTimeout(timer);
    timer = setTimeout(function () {
      var params = new URLSearchParams(window.location.search);
      params.set("page", "1");
      var term = input.value.trim();
      if (term) { params.set("query", term); } else { params.delete("query"); }
      window.location.replace(window.location.pathname + "?" + params.toString());
    }, wait);
  });
});"#;

/// Outcome of the listing read behind a list.
#[derive(Debug, Clone)]
pub enum ListSection {
    Loaded(ListResponse),
    Failed,
}

/// A headline, an optional search box, a card grid and optional pagination.
#[derive(Debug, Clone)]
pub struct ListView<'a> {
    pub headline: &'a str,
    /// Cards link to `/{card_base}/{slug}`.
    pub card_base: &'a str,
    /// Path of the page the list is on, for search and page links.
    pub path: &'a str,
    pub state: &'a ListQuery,
    pub section: &'a ListSection,
    pub show_search: bool,
    pub show_pagination: bool,
    /// Quiet period before the search box reloads the page.
    pub debounce: Duration,
}

impl ListView<'_> {
    pub fn render(&self, ctx: &RenderContext) -> Markup {
        let body = match self.section {
            ListSection::Failed => html! {
                p.content-items__notice.content-items__notice--error role="alert" { (FAILED_NOTICE) }
            },
            ListSection::Loaded(list) if list.data.is_empty() => html! {
                p.content-items__notice { (EMPTY_NOTICE) }
            },
            ListSection::Loaded(list) => html! {
                div.content-items__container {
                    @for entry in &list.data {
                        (card(entry, self.card_base, ctx))
                    }
                }
            },
        };

        html! {
            section.content-items.container {
                h3.content-items__headline { (self.headline) }
                @if self.show_search {
                    (search_box(self.path, self.state, self.debounce))
                }
                (body)
                @if self.show_pagination {
                    @if let ListSection::Loaded(list) = self.section {
                        (pagination(self.path, self.state, list.page_count()))
                    }
                }
            }
        }
    }
}

/// GET form that works without scripts; with scripts it searches as you type.
pub fn search_box(path: &str, state: &ListQuery, debounce: Duration) -> Markup {
    let debounce_ms = debounce.as_millis();
    html! {
        form.search method="get" action=(path) role="search" data-search-form data-debounce-ms=(debounce_ms) {
            input type="hidden" name="page" value="1";
            input type="text" name="query" placeholder="Search" aria-label="Search"
                autocomplete="off" value=(state.query().unwrap_or_default());
            noscript { button type="submit" { "Search" } }
        }
        script { (PreEscaped(SEARCH_SCRIPT)) }
    }
}

/// Previous/next arrows around a "Page N" indicator.
pub fn pagination(path: &str, state: &ListQuery, page_count: u32) -> Markup {
    let page = state.page();
    let bounds = Pagination {
        page,
        page_count,
        ..Pagination::default()
    };

    html! {
        nav.pagination-nav role="navigation" aria-label="Pagination" {
            ul.pagination-list {
                li {
                    (arrow("«", "Previous page", &state.with_page(page.saturating_sub(1)).href(path),
                        !Pagination::has_previous(page)))
                }
                li { span.page-number { "Page " (page) } }
                li {
                    (arrow("»", "Next page", &state.with_page(page.saturating_add(1)).href(path), !bounds.has_next(page)))
                }
            }
        }
    }
}

fn arrow(symbol: &str, label: &str, href: &str, disabled: bool) -> Markup {
    html! {
        @if disabled {
            span.pagination-arrow.disabled aria-disabled="true" aria-label=(label) { (symbol) }
        } @else {
            a.pagination-arrow href=(href) aria-label=(label) { (symbol) }
        }
    }
}
