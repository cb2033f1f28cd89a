use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use tracing::{debug, warn};

use crate::cursor::EventCursor;
use crate::error::{ProviderError, ProviderResult, SyncError, SyncResult};
use crate::event::{Calendar, Event, max_popup_minutes};
use crate::provider::{CalendarProvider, EventsRequest};
use crate::sorted_list::SortedList;
use crate::sync::state::{CalendarSyncState, sync_day};
use crate::sync::translate::to_event;

/// How far back a full sync reaches.
const FULL_SYNC_LOOKBEHIND_MINUTES: i64 = 10;
/// How far ahead a full sync reaches. Queries past this horizon see nothing.
const FULL_SYNC_HORIZON_DAYS: i64 = 10;
/// Forced full resyncs after the provider rejects a cursor.
const MAX_CURSOR_RETRIES: u32 = 1;

/// Calendar access for one account, as the events manager sees it.
#[async_trait]
pub trait CalendarService: Send {
    async fn list_calendars(&mut self) -> ProviderResult<Vec<Calendar>>;

    /// Sync one calendar and return its events overlapping
    /// `[window_start, window_end)`, ordered by start.
    async fn list_calendar_events(
        &mut self,
        calendar_id: &str,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> SyncResult<Vec<Event>>;
}

/// A [`CalendarService`] keeping a synced cache per calendar, so that most
/// polls only fetch the changes since the previous one.
pub struct SyncingCalendarService<P> {
    provider: P,
    states: BTreeMap<String, CalendarSyncState>,
}

impl<P: CalendarProvider> SyncingCalendarService<P> {
    pub fn new(provider: P) -> Self {
        SyncingCalendarService {
            provider,
            states: BTreeMap::new(),
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn state(&self, calendar_id: &str) -> Option<&CalendarSyncState> {
        self.states.get(calendar_id)
    }

    fn prune_stale(&mut self, keep: &str, today: i64) {
        self.states.retain(|id, state| {
            let keep_state = id == keep || !state.is_stale(today);
            if !keep_state {
                debug!(calendar = %id, "Dropping sync state of calendar not synced lately");
            }
            keep_state
        });
    }
}

#[async_trait]
impl<P: CalendarProvider> CalendarService for SyncingCalendarService<P> {
    async fn list_calendars(&mut self) -> ProviderResult<Vec<Calendar>> {
        self.provider.list_calendars().await
    }

    async fn list_calendar_events(
        &mut self,
        calendar_id: &str,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> SyncResult<Vec<Event>> {
        let defaults = self.provider.default_reminders(calendar_id).await?;
        let default_reminder = max_popup_minutes(&defaults);

        let today = sync_day(now);
        self.prune_stale(calendar_id, today);

        let state = self
            .states
            .entry(calendar_id.to_string())
            .or_insert_with(|| CalendarSyncState::new(calendar_id));
        let mut full = state.needs_full_sync(today);

        for attempt in 0..=MAX_CURSOR_RETRIES {
            match drain(&self.provider, state, full, default_reminder, now).await {
                Ok(()) => return Ok(events_within(state.events(), window_start, window_end)),
                Err(ProviderError::CursorInvalidated) => {
                    warn!(
                        calendar = %calendar_id,
                        attempt,
                        "Sync cursor invalidated, resyncing fully"
                    );
                    full = true;
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(SyncError::RetryExhausted(calendar_id.to_string()))
    }
}

/// Fetch everything the provider has for the calendar's state and publish it.
///
/// Nothing in `state` changes unless every page was read, so dropping the
/// future midway leaves the previous cache, cursor and day in place.
async fn drain<P: CalendarProvider + ?Sized>(
    provider: &P,
    state: &mut CalendarSyncState,
    full: bool,
    default_reminder: Option<i64>,
    now: DateTime<Utc>,
) -> ProviderResult<()> {
    let mut request = match state.sync_token() {
        Some(token) if !full => EventsRequest::incremental(state.calendar_id(), token),
        _ => EventsRequest::full(
            state.calendar_id(),
            now - TimeDelta::minutes(FULL_SYNC_LOOKBEHIND_MINUTES),
            now + TimeDelta::days(FULL_SYNC_HORIZON_DAYS),
        ),
    };
    let incremental = request.is_incremental();
    debug!(calendar = %request.calendar_id, incremental, "Syncing calendar");

    let staging = state.begin_staging(incremental);
    let mut cursor = EventCursor::new(provider, &mut request);
    let mut received = 0usize;

    while let Some(raw) = cursor.next().await? {
        received += 1;
        if incremental {
            // Changes and deletions look alike, so drop whatever we had first
            staging.remove_first(|e| e.id == raw.id);
        }
        if let Some(event) = to_event(raw, default_reminder) {
            staging.add(event);
        }
    }

    state.commit(request.sync_token.take(), sync_day(now));
    debug!(
        calendar = %state.calendar_id(),
        received,
        cached = state.events().len(),
        "Calendar synced"
    );
    Ok(())
}

/// Events with `start < window_end` and `end > window_start`.
pub fn events_within(
    events: &SortedList<Event>,
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
) -> Vec<Event> {
    events
        .iter()
        .take_while(|e| e.start < window_end)
        .filter(|e| e.end > window_start)
        .cloned()
        .collect()
}
