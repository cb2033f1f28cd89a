use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use crate::event::Event;
use crate::sorted_list::SortedList;

/// Days a calendar's state survives without being synced.
const STALE_AFTER_DAYS: i64 = 2;

pub fn by_start(a: &Event, b: &Event) -> Ordering {
    a.start.cmp(&b.start)
}

/// Whole days since the Unix epoch, in UTC.
pub fn sync_day(now: DateTime<Utc>) -> i64 {
    now.timestamp().div_euclid(86_400)
}

/// Sync bookkeeping for one calendar.
///
/// While `sync_token` is set, `events` holds a full sync from `last_sync_day`
/// with every later change folded in. Without a token the next sync is full.
/// Nothing here changes until a sync has read every page.
#[derive(Debug)]
pub struct CalendarSyncState {
    calendar_id: String,
    events: SortedList<Event>,
    /// Work area for an in-flight sync, swapped with `events` on success
    staging: SortedList<Event>,
    last_sync_day: i64,
    sync_token: Option<String>,
}

impl CalendarSyncState {
    pub fn new(calendar_id: &str) -> Self {
        CalendarSyncState {
            calendar_id: calendar_id.to_string(),
            events: SortedList::new(by_start),
            staging: SortedList::new(by_start),
            last_sync_day: 0,
            sync_token: None,
        }
    }

    pub fn calendar_id(&self) -> &str {
        &self.calendar_id
    }

    pub fn events(&self) -> &SortedList<Event> {
        &self.events
    }

    pub fn sync_token(&self) -> Option<&str> {
        self.sync_token.as_deref()
    }

    pub fn last_sync_day(&self) -> i64 {
        self.last_sync_day
    }

    /// Whether the next sync on `today` has to be a full one: there is no
    /// cursor yet, or this is the first sync of a new day, which refreshes
    /// the operating window.
    pub fn needs_full_sync(&self, today: i64) -> bool {
        self.sync_token.is_none() || self.last_sync_day < today
    }

    pub fn is_stale(&self, today: i64) -> bool {
        today.saturating_sub(self.last_sync_day) > STALE_AFTER_DAYS
    }

    /// Prepare the staging list for a sync and hand it out.
    ///
    /// A full sync starts from nothing, an incremental one from the current
    /// cache. The cache itself is untouched until [`commit`](Self::commit).
    pub fn begin_staging(&mut self, incremental: bool) -> &mut SortedList<Event> {
        if incremental {
            self.staging.copy_from(&self.events);
        } else {
            self.staging.clear();
        }
        &mut self.staging
    }

    /// Publish the staged events together with the cursor that produced them
    /// and the day they were synced on.
    pub fn commit(&mut self, sync_token: Option<String>, today: i64) {
        std::mem::swap(&mut self.events, &mut self.staging);
        self.staging.clear();
        self.sync_token = sync_token;
        self.last_sync_day = today;
    }
}
