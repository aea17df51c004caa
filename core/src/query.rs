//! List view URL state: `?page=N&query=term`.

use serde::Serialize;

/// Current page and search term of a paginated, searchable list.
///
/// The page is always at least 1. An empty search term is stored as `None`
/// and never appears in the query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    page: u32,
    query: Option<String>,
}

#[derive(Serialize)]
struct EncodedListQuery<'a> {
    page: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    query: Option<&'a str>,
}

fn normalise_term(term: Option<String>) -> Option<String> {
    term.map(|t| t.trim().to_string()).filter(|t| !t.is_empty())
}

impl ListQuery {
    pub fn new(page: u32, query: Option<String>) -> Self {
        Self {
            page: page.max(1),
            query: normalise_term(query),
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// Apply a new search term. Always returns to the first page.
    pub fn with_search(&self, term: &str) -> Self {
        Self::new(1, Some(term.to_string()))
    }

    pub fn with_page(&self, page: u32) -> Self {
        Self {
            page: page.max(1),
            query: self.query.clone(),
        }
    }

    /// Parse a raw query string. Garbage or missing values fall back to
    /// page 1 and no search term. A repeated key keeps its last value.
    pub fn from_query_str(raw: &str) -> Self {
        let pairs: Vec<(String, String)> = serde_urlencoded::from_str(raw).unwrap_or_default();
        let mut page = None;
        let mut query = None;
        for (key, value) in pairs {
            match key.as_str() {
                "page" => page = Some(value),
                "query" => query = Some(value),
                _ => {}
            }
        }
        let page = page.and_then(|p| p.trim().parse::<u32>().ok()).unwrap_or(1);
        Self::new(page, query)
    }

    pub fn to_query_string(&self) -> String {
        serde_urlencoded::to_string(EncodedListQuery {
            page: self.page,
            query: self.query.as_deref(),
        })
        .unwrap_or_else(|_| format!("page={}", self.page))
    }

    /// Link to `path` carrying this state.
    pub fn href(&self, path: &str) -> String {
        format!("{}?{}", path, self.to_query_string())
    }
}

impl Default for ListQuery {
    fn default() -> Self {
        Self::new(1, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_defaults_and_garbage() {
        assert_eq!(ListQuery::from_query_str(""), ListQuery::default());
        assert_eq!(ListQuery::from_query_str("page=abc").page(), 1);
        assert_eq!(ListQuery::from_query_str("page=0").page(), 1);
        assert_eq!(ListQuery::from_query_str("page=3&x=1").page(), 3);
        assert_eq!(ListQuery::from_query_str("query=%20%20").query(), None);
    }

    #[test]
    fn test_repeated_keys_keep_last_value() {
        let state = ListQuery::from_query_str("page=2&query=reef&page=3&query=surf");
        assert_eq!(state.page(), 3);
        assert_eq!(state.query(), Some("surf"));
    }

    #[test]
    fn test_largest_page_parses() {
        let state = ListQuery::from_query_str("page=4294967295");
        assert_eq!(state.page(), u32::MAX);
        assert_eq!(state.with_page(state.page().saturating_add(1)).page(), u32::MAX);
    }

    #[test]
    fn test_search_resets_page() {
        let state = ListQuery::new(4, None).with_search("surf");
        assert_eq!(state.page(), 1);
        assert_eq!(state.query(), Some("surf"));
        assert_eq!(state.to_query_string(), "page=1&query=surf");
    }

    #[test]
    fn test_empty_search_drops_query_param() {
        let state = ListQuery::new(2, Some("surf".into())).with_search("");
        assert_eq!(state.query(), None);
        assert_eq!(state.href("/blog"), "/blog?page=1");
    }

    #[test]
    fn test_paging_keeps_search_term() {
        let state = ListQuery::default().with_search("big waves").with_page(2);
        let parsed = ListQuery::from_query_str(&state.to_query_string());
        assert_eq!(parsed, state);
        assert_eq!(parsed.query(), Some("big waves"));
    }
}
