use std::cmp::Ordering;
use std::sync::Arc;
use std::sync::atomic::{self, AtomicI64};

use chrono::{DateTime, Utc};

use crate::event::{Calendar, Event};

/// Sentinel for "dismissed".
const DISMISSED: i64 = i64::MIN;

/// An event the user is being reminded about.
///
/// The reminder time is the only mutable state in the aggregate cache. It is
/// kept atomic so snoozing from another task needs no extra locking.
#[derive(Debug)]
pub struct TrackedEvent {
    calendar: Arc<Calendar>,
    event: Event,
    /// Milliseconds since the epoch, or `DISMISSED`
    remind_at: AtomicI64,
}

impl TrackedEvent {
    /// Start tracking `event`, reminding `reminder_lead` before it starts.
    ///
    /// A lead reaching past the representable range reminds at the start.
    pub fn new(calendar: Arc<Calendar>, event: Event) -> Self {
        let remind_at = event
            .start
            .checked_sub_signed(event.reminder_lead)
            .unwrap_or(event.start)
            .timestamp_millis();
        TrackedEvent {
            calendar,
            event,
            remind_at: AtomicI64::new(remind_at),
        }
    }

    pub fn calendar(&self) -> &Calendar {
        &self.calendar
    }

    pub fn event(&self) -> &Event {
        &self.event
    }

    /// When to remind next, `None` once dismissed.
    pub fn remind_at(&self) -> Option<DateTime<Utc>> {
        match self.remind_at.load(atomic::Ordering::Relaxed) {
            DISMISSED => None,
            millis => DateTime::from_timestamp_millis(millis),
        }
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.remind_at().is_some_and(|at| now >= at)
    }

    pub fn snooze(&self, until: DateTime<Utc>) {
        self.remind_at
            .store(until.timestamp_millis(), atomic::Ordering::Relaxed);
    }

    pub fn dismiss(&self) {
        self.remind_at.store(DISMISSED, atomic::Ordering::Relaxed);
    }
}

impl PartialEq for TrackedEvent {
    fn eq(&self, other: &Self) -> bool {
        self.calendar.id == other.calendar.id && self.event.id == other.event.id
    }
}

impl Eq for TrackedEvent {}

/// Total order of the aggregate cache: start time, then calendar id, then event id.
pub fn by_start_time(a: &Arc<TrackedEvent>, b: &Arc<TrackedEvent>) -> Ordering {
    a.event
        .start
        .cmp(&b.event.start)
        .then_with(|| a.calendar.id.cmp(&b.calendar.id))
        .then_with(|| a.event.id.cmp(&b.event.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, TimeZone};

    fn tracked(calendar: &str, id: &str, hour: u32) -> Arc<TrackedEvent> {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, hour, 0, 0).unwrap();
        Arc::new(TrackedEvent::new(
            Arc::new(Calendar::new(calendar, calendar)),
            Event {
                id: id.into(),
                title: id.into(),
                event_uri: None,
                conference_uri: None,
                start,
                end: start + TimeDelta::hours(1),
                reminder_lead: TimeDelta::minutes(15),
            },
        ))
    }

    #[test]
    fn test_reminder_starts_lead_before_start() {
        let event = tracked("cal", "e", 10);
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 9, 45, 0).unwrap();

        assert_eq!(event.remind_at(), Some(at));
        assert!(!event.is_due(at - TimeDelta::seconds(1)));
        assert!(event.is_due(at));
    }

    #[test]
    fn test_lead_past_representable_range_reminds_at_start() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
        let event = TrackedEvent::new(
            Arc::new(Calendar::new("cal", "cal")),
            Event {
                id: "e".into(),
                title: "e".into(),
                event_uri: None,
                conference_uri: None,
                start,
                end: start + TimeDelta::hours(1),
                reminder_lead: TimeDelta::try_days(100_000_000).unwrap(),
            },
        );

        assert_eq!(event.remind_at(), Some(start));
    }

    #[test]
    fn test_snooze_and_dismiss() {
        let event = tracked("cal", "e", 10);
        let later = Utc.with_ymd_and_hms(2024, 1, 1, 9, 55, 0).unwrap();

        event.snooze(later);
        assert_eq!(event.remind_at(), Some(later));

        event.dismiss();
        assert_eq!(event.remind_at(), None);
        assert!(!event.is_due(later + TimeDelta::days(1)));
    }

    #[test]
    fn test_order_breaks_ties_by_calendar_then_event() {
        let a = tracked("a", "2", 10);
        let b = tracked("b", "1", 10);
        let c = tracked("b", "2", 10);
        let early = tracked("z", "z", 9);

        assert_eq!(by_start_time(&early, &a), Ordering::Less);
        assert_eq!(by_start_time(&a, &b), Ordering::Less);
        assert_eq!(by_start_time(&b, &c), Ordering::Less);
        assert_eq!(by_start_time(&c, &tracked("b", "2", 10)), Ordering::Equal);
    }
}
