//! Provider-neutral calendar and event types.
//!
//! Providers convert their API responses into [`RawEvent`]s. The sync engine
//! translates those into immutable [`Event`]s, which is all the rest of the
//! engine ever works with.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// A calendar of some account. Identity is the id alone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Calendar {
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Hex color as reported by the provider, e.g. `#9fe1e7`
    #[serde(default)]
    pub color: Option<String>,
}

impl Calendar {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Calendar {
            id: id.into(),
            name: name.into(),
            color: None,
        }
    }
}

impl PartialEq for Calendar {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Calendar {}

impl Hash for Calendar {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// An upcoming event, as cached by the engine.
///
/// Never mutated after creation. A change on the provider side produces a new
/// `Event` that replaces the cached one.
#[derive(Debug, Clone)]
pub struct Event {
    pub id: String,
    pub title: String,
    /// Link to the event in the provider's UI
    pub event_uri: Option<String>,
    /// Link to join the event's video conference
    pub conference_uri: Option<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// How long before `start` the user wants to be reminded
    pub reminder_lead: TimeDelta,
}

impl Event {
    /// Whether any field the user sees differs from `other`.
    ///
    /// Start, end and id are part of the cache ordering and are compared there.
    pub fn display_differs(&self, other: &Event) -> bool {
        self.title != other.title
            || self.event_uri != other.event_uri
            || self.conference_uri != other.conference_uri
            || self.reminder_lead != other.reminder_lead
    }

    pub fn is_over(&self, now: DateTime<Utc>) -> bool {
        now >= self.end
    }
}

impl PartialEq for Event {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Event {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EventTime {
    DateTime(DateTime<Utc>),
    Date(NaiveDate),
}

impl EventTime {
    pub fn is_all_day(&self) -> bool {
        matches!(self, EventTime::Date(_))
    }

    /// The instant this time refers to. Dates are taken as UTC midnight.
    pub fn to_utc(&self) -> DateTime<Utc> {
        match self {
            EventTime::DateTime(dt) => *dt,
            EventTime::Date(date) => date.and_time(NaiveTime::MIN).and_utc(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EventStatus {
    #[default]
    Confirmed,
    Tentative,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReminderMethod {
    Popup,
    Email,
    Other(String),
}

/// A reminder configured on an event or as a calendar default
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    pub method: ReminderMethod,
    /// Minutes before the event to trigger
    pub minutes: i64,
}

impl Reminder {
    pub fn popup(minutes: i64) -> Self {
        Reminder {
            method: ReminderMethod::Popup,
            minutes,
        }
    }
}

/// Largest popup-style lead among `reminders`, in minutes.
pub fn max_popup_minutes<'a>(reminders: impl IntoIterator<Item = &'a Reminder>) -> Option<i64> {
    reminders
        .into_iter()
        .filter(|r| r.method == ReminderMethod::Popup)
        .map(|r| r.minutes)
        .max()
}

/// A conference entry point (video link, phone dial-in, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConferenceEntryPoint {
    /// "video", "phone", "sip", "more"
    pub entry_point_type: String,
    pub uri: String,
}

/// An event item as delivered by a provider, before translation.
///
/// A deleted event shows up in an incremental sync as an item that is
/// cancelled or has no start time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawEvent {
    pub id: String,
    pub status: EventStatus,
    pub summary: Option<String>,
    pub html_link: Option<String>,
    pub location: Option<String>,
    pub start: Option<EventTime>,
    pub end: Option<EventTime>,
    /// Per-event reminder overrides. Empty when the event uses the calendar defaults.
    pub reminders: Vec<Reminder>,
    pub entry_points: Vec<ConferenceEntryPoint>,
}

impl RawEvent {
    pub fn is_cancelled(&self) -> bool {
        self.status == EventStatus::Cancelled
    }
}
