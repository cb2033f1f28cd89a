//! The reminder poll loop.
//!
//! Each cycle shows what is due, syncs every calendar, then sleeps until just
//! past the next whole minute, since reminders have minute granularity.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::error::SyncFailure;
use crate::settings::Settings;
use crate::tracking::{EventsManager, TrackedEvent};

/// Wake this long after the minute boundary so reminders never fire early.
const MINUTE_OVERSHOOT_MS: i64 = 500;
const FIRST_WAIT_FLOOR_MS: i64 = 5_000;
const NEXT_WAIT_FLOOR_MS: i64 = 1_000;

/// Where the poll loop reports to.
pub trait ReminderSink {
    /// Called every cycle with the events currently due, possibly none.
    fn show_active(&mut self, events: &[Arc<TrackedEvent>], now: DateTime<Utc>);

    fn sync_finished(&mut self, outcome: &Result<(), SyncFailure>);
}

/// How long to sleep before checking whether the minute has turned over.
pub fn refresh_delay(now: DateTime<Utc>, first_wait: bool) -> Duration {
    let into_minute = now.timestamp_millis().rem_euclid(60_000);
    let until_next_minute = 60_000 - into_minute + MINUTE_OVERSHOOT_MS;
    let floor = if first_wait {
        FIRST_WAIT_FLOOR_MS
    } else {
        NEXT_WAIT_FLOOR_MS
    };

    Duration::from_millis(until_next_minute.max(floor).unsigned_abs())
}

fn minute_of(time: DateTime<Utc>) -> i64 {
    time.timestamp().div_euclid(60)
}

/// Run poll cycles until `shutdown` resolves.
///
/// Shutdown is checked during the sync as well, abandoning it midway. That
/// leaves every calendar's cache as it was before that calendar's sync.
pub async fn run(
    manager: &mut EventsManager,
    settings: &Settings,
    sink: &mut impl ReminderSink,
    shutdown: impl Future<Output = ()>,
) {
    tokio::pin!(shutdown);

    loop {
        let now = Utc::now();
        let active = manager.get_active_events(now);
        sink.show_active(&active, now);

        let refreshed_minute = minute_of(now);
        let outcome = tokio::select! {
            outcome = manager.synchronize_all(&settings.accounts, settings.lookahead(), now) => {
                outcome
            }
            _ = &mut shutdown => {
                info!("Shutting down during sync");
                return;
            }
        };
        sink.sync_finished(&outcome);

        let mut first_wait = true;
        while minute_of(Utc::now()) <= refreshed_minute {
            let delay = refresh_delay(Utc::now(), first_wait);
            debug!(?delay, "Waiting for next cycle");
            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = &mut shutdown => {
                    info!("Shutting down");
                    return;
                }
            }
            first_wait = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderResult;
    use crate::services::ServiceFactory;
    use crate::settings::ServiceKind;
    use crate::sync::CalendarService;
    use chrono::TimeZone;

    #[test]
    fn test_refresh_delay_aligns_past_minute() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 20).unwrap();
        assert_eq!(refresh_delay(now, true), Duration::from_millis(40_500));
        assert_eq!(refresh_delay(now, false), Duration::from_millis(40_500));
    }

    #[test]
    fn test_refresh_delay_has_floor() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 58).unwrap();
        assert_eq!(refresh_delay(now, true), Duration::from_millis(5_000));
        assert_eq!(refresh_delay(now, false), Duration::from_millis(2_500));

        let now = now + chrono::TimeDelta::milliseconds(1_800);
        assert_eq!(refresh_delay(now, false), Duration::from_millis(1_000));
    }

    struct NoServices;

    impl ServiceFactory for NoServices {
        fn create(&self, kind: ServiceKind, _: &str) -> ProviderResult<Box<dyn CalendarService>> {
            Err(crate::error::ProviderError::UnsupportedService(kind.to_string()))
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        shown: usize,
        synced: usize,
    }

    impl ReminderSink for RecordingSink {
        fn show_active(&mut self, _: &[Arc<TrackedEvent>], _: DateTime<Utc>) {
            self.shown += 1;
        }

        fn sync_finished(&mut self, _: &Result<(), SyncFailure>) {
            self.synced += 1;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_loop_stops_on_shutdown() {
        let mut manager = EventsManager::new(NoServices);
        let settings = Settings::default();
        let mut sink = RecordingSink::default();

        run(
            &mut manager,
            &settings,
            &mut sink,
            tokio::time::sleep(Duration::from_secs(1)),
        )
        .await;

        // One cycle, unless the wall clock happened to cross a minute
        assert!(sink.shown >= 1);
        assert_eq!(sink.synced, sink.shown);
    }
}
