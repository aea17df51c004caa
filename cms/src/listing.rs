//! Paged, searchable listings.
//!
//! A [`ListController`] owns the current page and search term of one list.
//! Changing the search term always goes back to page 1 in the same state
//! swap, so a request never carries a new term with an old page. Loads are
//! sequenced: when two overlap, only the newest response is applied.

use crate::error::CmsError;
use crate::params::ListParams;
use crate::resource::Collection;
use crate::source::ContentSource;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tideline_core::content::ListResponse;
use tideline_core::query::ListQuery;
use tideline_runtime::{RequestSequence, debounce};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

pub struct ListController {
    source: Arc<dyn ContentSource>,
    collection: Collection,
    featured: bool,
    page_size: u32,
    state: Mutex<ListQuery>,
    sequence: RequestSequence,
}

impl ListController {
    pub fn new(source: Arc<dyn ContentSource>, collection: Collection, page_size: u32) -> Self {
        Self {
            source,
            collection,
            featured: false,
            page_size: page_size.max(1),
            state: Mutex::new(ListQuery::default()),
            sequence: RequestSequence::new(),
        }
    }

    /// Restrict to entries flagged as featured.
    pub fn featured(mut self) -> Self {
        self.featured = true;
        self
    }

    /// Start from the given page and search term.
    pub fn with_query(self, query: ListQuery) -> Self {
        *self.state.lock() = query;
        self
    }

    pub fn state(&self) -> ListQuery {
        self.state.lock().clone()
    }

    /// Commit a new search term. Returns the new state (page 1).
    pub fn search(&self, term: &str) -> ListQuery {
        let mut state = self.state.lock();
        *state = state.with_search(term);
        state.clone()
    }

    pub fn go_to(&self, page: u32) -> ListQuery {
        let mut state = self.state.lock();
        *state = state.with_page(page);
        state.clone()
    }

    /// Request parameters for the current state.
    pub fn params(&self) -> ListParams {
        let state = self.state();
        let params = ListParams::listing(state.page(), self.page_size).with_query(state.query());
        if self.featured { params.featured() } else { params }
    }

    /// Load the current page.
    ///
    /// `None` when a newer load was issued while this one was in flight; its
    /// response is stale and dropped.
    pub async fn load(&self) -> Option<Result<ListResponse, CmsError>> {
        let ticket = self.sequence.issue();
        let params = self.params();
        let result = self.source.list(self.collection, &params).await;

        if !self.sequence.is_latest(ticket) {
            tracing::debug!(collection = %self.collection, ?ticket, "discarding stale listing response");
            return None;
        }
        if let Err(err) = &result {
            tracing::warn!(collection = %self.collection, error = %err, "listing failed");
        }
        Some(result)
    }

    /// Drive searches from raw keystrokes.
    ///
    /// Keystrokes are debounced by `quiet`; each settled term triggers one
    /// search and load. Results arrive on the returned channel, stale ones
    /// omitted. The task ends when `keystrokes` closes.
    pub fn spawn_search(
        self: Arc<Self>,
        keystrokes: mpsc::Receiver<String>,
        quiet: Duration,
    ) -> (JoinHandle<()>, mpsc::Receiver<Result<ListResponse, CmsError>>) {
        let (tx, rx) = mpsc::channel(4);
        let mut settled = debounce(keystrokes, quiet);

        let handle = tokio::spawn(async move {
            while let Some(term) = settled.recv().await {
                let state = self.search(&term);
                tracing::debug!(query = ?state.query(), "search settled");
                if let Some(result) = self.load().await {
                    if tx.send(result).await.is_err() {
                        break;
                    }
                }
            }
        });

        (handle, rx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::{SingleType, WriteEndpoint};
    use async_trait::async_trait;
    use serde_json::Value;
    use tideline_core::content::{Entry, Meta, Pagination};

    /// Records every listing request; the first `slow_calls` take 200ms.
    #[derive(Default)]
    struct Recorder {
        calls: Mutex<Vec<ListParams>>,
        slow_calls: usize,
    }

    #[async_trait]
    impl ContentSource for Recorder {
        async fn list(&self, _: Collection, params: &ListParams) -> Result<ListResponse, CmsError> {
            let call = {
                let mut calls = self.calls.lock();
                calls.push(params.clone());
                calls.len()
            };
            if call <= self.slow_calls {
                tokio::time::sleep(Duration::from_millis(200)).await;
            }
            Ok(ListResponse {
                data: vec![Entry {
                    title: format!("call {call}"),
                    ..Entry::default()
                }],
                meta: Meta {
                    pagination: Some(Pagination {
                        page: params.page.unwrap_or(1),
                        page_size: 3,
                        page_count: 2,
                        total: 4,
                    }),
                },
            })
        }

        async fn single(&self, _: SingleType) -> Result<Option<Value>, CmsError> {
            Ok(None)
        }

        async fn submit(&self, _: WriteEndpoint, _: Value) -> Result<(), CmsError> {
            Ok(())
        }
    }

    #[test]
    fn test_search_resets_page_with_the_new_term() {
        let source = Arc::new(Recorder::default());
        let controller = ListController::new(source, Collection::Articles, 3)
            .with_query(ListQuery::new(3, None));

        controller.search("reef");
        let params = controller.params();

        assert_eq!(params.page, Some(1));
        assert_eq!(params.query.as_deref(), Some("reef"));
        assert_eq!(params.page_size, Some(3));
    }

    #[test]
    fn test_go_to_keeps_term() {
        let source = Arc::new(Recorder::default());
        let controller = ListController::new(source, Collection::Events, 3).featured();

        controller.search("yoga");
        let state = controller.go_to(2);

        assert_eq!(state.page(), 2);
        assert_eq!(state.query(), Some("yoga"));
        assert!(controller.params().featured);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_response_is_discarded() {
        let source = Arc::new(Recorder {
            slow_calls: 1,
            ..Recorder::default()
        });
        let controller = ListController::new(source, Collection::Articles, 3);

        let (first, second) = tokio::join!(controller.load(), async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            controller.load().await
        });

        assert!(first.is_none());
        let second = second.expect("newest load applies").expect("load succeeds");
        assert_eq!(second.data[0].title, "call 2");
    }

    #[tokio::test(start_paused = true)]
    async fn test_debounced_keystrokes_issue_one_request() {
        let source = Arc::new(Recorder::default());
        let controller = Arc::new(
            ListController::new(source.clone(), Collection::Articles, 3)
                .with_query(ListQuery::new(2, None)),
        );
        let (keys, keystrokes) = mpsc::channel(16);
        let (handle, mut results) = controller.clone().spawn_search(keystrokes, DEFAULT_DEBOUNCE);

        for term in ["w", "wa", "wav", "wave"] {
            keys.send(term.to_string()).await.unwrap();
            tokio::time::sleep(Duration::from_millis(50)).await;
        }

        let result = results.recv().await.expect("one settled search");
        assert!(result.is_ok());
        drop(keys);
        handle.await.unwrap();

        let calls = source.calls.lock();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].query.as_deref(), Some("wave"));
        assert_eq!(calls[0].page, Some(1));
    }
}
