//! Pull-based cursor over a paged "list events" response.

use std::mem;

use tracing::debug;

use crate::error::ProviderResult;
use crate::event::RawEvent;
use crate::provider::{CalendarProvider, EventsPage, EventsRequest};

enum CursorState {
    NoPageLoaded,
    PageLoaded {
        items: std::vec::IntoIter<RawEvent>,
        next_page_token: Option<String>,
        next_sync_token: Option<String>,
    },
    Exhausted,
}

/// Single-use, forward-only sequence of every item across all pages.
///
/// When the last page is drained, the borrowed request is rewritten to carry
/// the provider's change cursor so it can be stored for the next incremental
/// sync. Provider errors are returned unchanged and end the sequence, as does
/// dropping a pending `next()` mid-fetch.
pub struct EventCursor<'a, P: ?Sized> {
    provider: &'a P,
    request: &'a mut EventsRequest,
    state: CursorState,
}

impl<'a, P: CalendarProvider + ?Sized> EventCursor<'a, P> {
    pub fn new(provider: &'a P, request: &'a mut EventsRequest) -> Self {
        EventCursor {
            provider,
            request,
            state: CursorState::NoPageLoaded,
        }
    }

    pub async fn next(&mut self) -> ProviderResult<Option<RawEvent>> {
        loop {
            // Parked as exhausted while fetching, so an error or a dropped
            // future leaves the cursor terminated.
            match mem::replace(&mut self.state, CursorState::Exhausted) {
                CursorState::Exhausted => return Ok(None),
                CursorState::NoPageLoaded => {}
                CursorState::PageLoaded {
                    mut items,
                    next_page_token,
                    next_sync_token,
                } => {
                    if let Some(item) = items.next() {
                        self.state = CursorState::PageLoaded {
                            items,
                            next_page_token,
                            next_sync_token,
                        };
                        return Ok(Some(item));
                    }

                    match next_page_token {
                        Some(token) => self.request.page_token = Some(token),
                        None => {
                            self.request.sync_token = next_sync_token;
                            self.request.page_token = None;
                            return Ok(None);
                        }
                    }
                }
            }

            let EventsPage {
                items,
                next_page_token,
                next_sync_token,
            } = self.provider.list_events(self.request).await?;

            debug!(
                calendar = %self.request.calendar_id,
                items = items.len(),
                more = next_page_token.is_some(),
                "Fetched events page"
            );

            self.state = CursorState::PageLoaded {
                items: items.into_iter(),
                next_page_token,
                next_sync_token,
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderError;
    use crate::provider::fake::FakeProvider;

    fn raw(id: &str) -> RawEvent {
        RawEvent {
            id: id.into(),
            ..Default::default()
        }
    }

    fn page(ids: &[&str], next_page: Option<&str>, next_sync: Option<&str>) -> EventsPage {
        EventsPage {
            items: ids.iter().map(|id| raw(id)).collect(),
            next_page_token: next_page.map(String::from),
            next_sync_token: next_sync.map(String::from),
        }
    }

    async fn drain<P: CalendarProvider>(cursor: &mut EventCursor<'_, P>) -> Vec<String> {
        let mut ids = Vec::new();
        while let Some(item) = cursor.next().await.unwrap() {
            ids.push(item.id);
        }
        ids
    }

    #[tokio::test]
    async fn test_yields_all_pages_in_order_then_carries_sync_token() {
        let provider = FakeProvider::new();
        provider.push("cal", Ok(page(&["a1", "a2"], Some("p2"), None)));
        provider.push("cal", Ok(page(&["b1", "b2", "b3"], Some("p3"), None)));
        provider.push("cal", Ok(page(&["c1"], None, Some("sync-1"))));

        let mut request = EventsRequest::incremental("cal", "sync-0");
        let mut cursor = EventCursor::new(&provider, &mut request);

        assert_eq!(drain(&mut cursor).await, ["a1", "a2", "b1", "b2", "b3", "c1"]);
        assert!(cursor.next().await.unwrap().is_none());

        assert_eq!(request.sync_token.as_deref(), Some("sync-1"));
        assert_eq!(request.page_token, None);

        let sent: Vec<_> = provider
            .requests()
            .into_iter()
            .map(|r| r.page_token)
            .collect();
        assert_eq!(sent, [None, Some("p2".to_string()), Some("p3".to_string())]);
    }

    #[tokio::test]
    async fn test_empty_pages_are_skipped() {
        let provider = FakeProvider::new();
        provider.push("cal", Ok(page(&[], Some("p2"), None)));
        provider.push("cal", Ok(page(&["x"], None, Some("sync-1"))));

        let mut request = EventsRequest::incremental("cal", "sync-0");
        let mut cursor = EventCursor::new(&provider, &mut request);

        assert_eq!(drain(&mut cursor).await, ["x"]);
    }

    #[tokio::test]
    async fn test_errors_propagate_and_terminate() {
        let provider = FakeProvider::new();
        provider.push("cal", Ok(page(&["a1"], Some("p2"), None)));
        provider.push("cal", Err(ProviderError::CursorInvalidated));
        provider.push("cal", Ok(page(&["never"], None, Some("sync-1"))));

        let mut request = EventsRequest::incremental("cal", "sync-0");
        let mut cursor = EventCursor::new(&provider, &mut request);

        assert_eq!(cursor.next().await.unwrap().map(|e| e.id), Some("a1".into()));
        assert_eq!(cursor.next().await, Err(ProviderError::CursorInvalidated));
        assert_eq!(cursor.next().await, Ok(None));

        // The original cursor is left in place for the caller to decide on
        assert_eq!(request.sync_token.as_deref(), Some("sync-0"));
        assert_eq!(provider.requests().len(), 2);
    }
}
