use std::collections::HashSet;
use std::mem;
use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use tracing::{info, warn};

use crate::error::{CalendarSyncError, SyncError, SyncFailure};
use crate::services::{ServiceCache, ServiceFactory};
use crate::settings::AccountConfig;
use crate::sorted_list::SortedList;
use crate::tracking::merge::merge_into;
use crate::tracking::tracked_event::{TrackedEvent, by_start_time};

/// Events that ended longer ago than this are dropped from the cache.
const EXPIRY_GRACE_MINUTES: i64 = 15;

/// Owner of the aggregate cache of tracked events across all calendars.
pub struct EventsManager {
    services: ServiceCache,
    events: SortedList<Arc<TrackedEvent>>,
    /// Reused between cycles for the remote snapshot and the merge output
    remote: SortedList<Arc<TrackedEvent>>,
    merged: SortedList<Arc<TrackedEvent>>,
}

impl EventsManager {
    pub fn new(factory: impl ServiceFactory + 'static) -> Self {
        EventsManager {
            services: ServiceCache::new(factory),
            events: SortedList::new(by_start_time),
            remote: SortedList::new(by_start_time),
            merged: SortedList::new(by_start_time),
        }
    }

    /// The aggregate cache, ordered by start time.
    pub fn events(&self) -> &SortedList<Arc<TrackedEvent>> {
        &self.events
    }

    pub fn services(&mut self) -> &mut ServiceCache {
        &mut self.services
    }

    /// Sync every configured calendar and merge the results into the cache.
    ///
    /// A failing calendar doesn't stop the others. Its cached events are kept
    /// as they were and it is reported in the returned [`SyncFailure`], which
    /// only comes back after the cache was updated for everything else.
    pub async fn synchronize_all(
        &mut self,
        accounts: &[AccountConfig],
        lookahead: TimeDelta,
        now: DateTime<Utc>,
    ) -> Result<(), SyncFailure> {
        let window_end = now + lookahead;
        let mut errors = Vec::new();
        let mut failed = HashSet::new();
        self.remote.clear();

        for account in accounts {
            let service = match self.services.get_or_create(account.service, &account.account_id) {
                Ok(service) => service,
                Err(e) => {
                    warn!(
                        account = %account.account_id,
                        error = %e,
                        "No calendar service for account"
                    );
                    for calendar in &account.calendars {
                        failed.insert(calendar.id.clone());
                        errors.push(CalendarSyncError {
                            account_id: account.account_id.clone(),
                            calendar_id: calendar.id.clone(),
                            source: SyncError::Provider(e.clone()),
                        });
                    }
                    continue;
                }
            };

            for calendar in &account.calendars {
                match service
                    .list_calendar_events(&calendar.id, now, window_end, now)
                    .await
                {
                    Ok(events) => {
                        let calendar = Arc::new(calendar.clone());
                        for event in events {
                            self.remote
                                .add(Arc::new(TrackedEvent::new(Arc::clone(&calendar), event)));
                        }
                    }
                    Err(e) => {
                        warn!(
                            account = %account.account_id,
                            calendar = %calendar.id,
                            error = %e,
                            "Calendar sync failed"
                        );
                        failed.insert(calendar.id.clone());
                        errors.push(CalendarSyncError {
                            account_id: account.account_id.clone(),
                            calendar_id: calendar.id.clone(),
                            source: e,
                        });
                    }
                }
            }
        }

        merge_into(&mut self.merged, &self.events, &self.remote, &failed);
        mem::swap(&mut self.events, &mut self.merged);
        self.merged.clear();
        self.remote.clear();

        info!(
            events = self.events.len(),
            failed = errors.len(),
            "Synchronized calendars"
        );

        if errors.is_empty() {
            Ok(())
        } else {
            Err(SyncFailure { errors })
        }
    }

    /// Events whose reminder is due at `now`.
    ///
    /// Events that ended over 15 minutes ago are evicted along the way.
    pub fn get_active_events(&mut self, now: DateTime<Utc>) -> Vec<Arc<TrackedEvent>> {
        let expired_before = now - TimeDelta::minutes(EXPIRY_GRACE_MINUTES);
        let mut active = Vec::new();

        self.events.retain(|tracked| {
            if tracked.event().end < expired_before {
                return false;
            }
            if tracked.is_due(now) {
                active.push(Arc::clone(tracked));
            }
            true
        });

        active
    }

    /// Dismiss every event that is due at `now`.
    ///
    /// For front ends offering a "dismiss all" action. The terminal commands
    /// keep no state between runs and don't use it.
    pub fn dismiss_all(&mut self, now: DateTime<Utc>) {
        for tracked in self.get_active_events(now) {
            tracked.dismiss();
        }
    }
}
