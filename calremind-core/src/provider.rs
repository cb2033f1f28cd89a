//! The capability an authenticated calendar provider client offers the engine.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::ProviderResult;
use crate::event::{Calendar, RawEvent, Reminder};

/// A "list events" request.
///
/// Either incremental (`sync_token` set, no time bounds) or full (time bounds,
/// no `sync_token`). The paged cursor rewrites `page_token` while draining and
/// leaves the provider's next change cursor in `sync_token` once done.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventsRequest {
    pub calendar_id: String,
    pub sync_token: Option<String>,
    pub time_min: Option<DateTime<Utc>>,
    pub time_max: Option<DateTime<Utc>>,
    pub page_token: Option<String>,
}

impl EventsRequest {
    pub fn full(calendar_id: &str, time_min: DateTime<Utc>, time_max: DateTime<Utc>) -> Self {
        EventsRequest {
            calendar_id: calendar_id.to_string(),
            time_min: Some(time_min),
            time_max: Some(time_max),
            ..Default::default()
        }
    }

    pub fn incremental(calendar_id: &str, sync_token: &str) -> Self {
        EventsRequest {
            calendar_id: calendar_id.to_string(),
            sync_token: Some(sync_token.to_string()),
            ..Default::default()
        }
    }

    pub fn is_incremental(&self) -> bool {
        self.sync_token.is_some()
    }
}

/// One page of a "list events" response.
///
/// The last page carries `next_sync_token` instead of `next_page_token`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventsPage {
    pub items: Vec<RawEvent>,
    pub next_page_token: Option<String>,
    pub next_sync_token: Option<String>,
}

#[async_trait]
pub trait CalendarProvider: Send + Sync {
    /// Every calendar of the account, all pages.
    async fn list_calendars(&self) -> ProviderResult<Vec<Calendar>>;

    /// Default reminders configured on a calendar.
    async fn default_reminders(&self, calendar_id: &str) -> ProviderResult<Vec<Reminder>>;

    /// A single page of events.
    ///
    /// Must fail with `ProviderError::CursorInvalidated` when the provider
    /// rejects `request.sync_token`.
    async fn list_events(&self, request: &EventsRequest) -> ProviderResult<EventsPage>;
}

#[async_trait]
impl<P: CalendarProvider + ?Sized> CalendarProvider for Arc<P> {
    async fn list_calendars(&self) -> ProviderResult<Vec<Calendar>> {
        (**self).list_calendars().await
    }

    async fn default_reminders(&self, calendar_id: &str) -> ProviderResult<Vec<Reminder>> {
        (**self).default_reminders(calendar_id).await
    }

    async fn list_events(&self, request: &EventsRequest) -> ProviderResult<EventsPage> {
        (**self).list_events(request).await
    }
}

/// Scripted in-memory provider for unit tests.
#[cfg(test)]
pub(crate) mod fake {
    use std::collections::{HashMap, VecDeque};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};

    use super::*;

    #[derive(Default)]
    pub(crate) struct FakeProvider {
        calendars: Vec<Calendar>,
        default_reminders: Vec<Reminder>,
        pages: Mutex<HashMap<String, VecDeque<ProviderResult<EventsPage>>>>,
        requests: Mutex<Vec<EventsRequest>>,
        stalled: AtomicBool,
    }

    impl FakeProvider {
        pub(crate) fn new() -> Self {
            Self::default()
        }

        pub(crate) fn with_calendars(mut self, calendars: Vec<Calendar>) -> Self {
            self.calendars = calendars;
            self
        }

        pub(crate) fn with_default_reminders(mut self, reminders: Vec<Reminder>) -> Self {
            self.default_reminders = reminders;
            self
        }

        /// Queue the response for the next `list_events` call on `calendar_id`.
        pub(crate) fn push(&self, calendar_id: &str, response: ProviderResult<EventsPage>) {
            self.pages
                .lock()
                .unwrap()
                .entry(calendar_id.to_string())
                .or_default()
                .push_back(response);
        }

        /// Make every later `list_events` call hang after recording its request.
        pub(crate) fn stall(&self) {
            self.stalled.store(true, Ordering::Relaxed);
        }

        pub(crate) fn requests(&self) -> Vec<EventsRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CalendarProvider for FakeProvider {
        async fn list_calendars(&self) -> ProviderResult<Vec<Calendar>> {
            Ok(self.calendars.clone())
        }

        async fn default_reminders(&self, _calendar_id: &str) -> ProviderResult<Vec<Reminder>> {
            Ok(self.default_reminders.clone())
        }

        async fn list_events(&self, request: &EventsRequest) -> ProviderResult<EventsPage> {
            self.requests.lock().unwrap().push(request.clone());
            if self.stalled.load(Ordering::Relaxed) {
                std::future::pending::<()>().await;
            }

            // An unscripted call behaves like an empty calendar
            self.pages
                .lock()
                .unwrap()
                .get_mut(&request.calendar_id)
                .and_then(|queue| queue.pop_front())
                .unwrap_or_else(|| {
                    Ok(EventsPage {
                        next_sync_token: Some("empty".into()),
                        ..Default::default()
                    })
                })
        }
    }
}
