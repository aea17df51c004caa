//! CMS endpoints.

use std::fmt;

/// Collection types, listed and looked up by slug.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Pages,
    Articles,
    Events,
}

impl Collection {
    pub fn path(self) -> &'static str {
        match self {
            Collection::Pages => "/api/pages",
            Collection::Articles => "/api/articles",
            Collection::Events => "/api/events",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Collection::Pages => "pages",
            Collection::Articles => "articles",
            Collection::Events => "events",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Single types: one document per site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SingleType {
    HomePage,
    Global,
}

impl SingleType {
    pub fn path(self) -> &'static str {
        match self {
            SingleType::HomePage => "/api/home-page",
            SingleType::Global => "/api/global",
        }
    }
}

impl fmt::Display for SingleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Collections the site writes form submissions into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WriteEndpoint {
    NewsletterSignups,
    EventSignups,
}

impl WriteEndpoint {
    pub fn path(self) -> &'static str {
        match self {
            WriteEndpoint::NewsletterSignups => "/api/newsletter-signups",
            WriteEndpoint::EventSignups => "/api/event-signups",
        }
    }
}
