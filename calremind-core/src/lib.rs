//! Incremental calendar sync and reminder tracking for calremind.
//!
//! This crate holds everything between an authenticated provider client and
//! the notification UI:
//! - `sync` keeps a per-calendar cache of upcoming events, mostly through
//!   incremental "changes since cursor" fetches
//! - `tracking` merges all calendars into one ordered cache of
//!   [`TrackedEvent`]s and answers which of them are due
//! - `poll` drives both on a minute-aligned timer

pub mod cursor;
pub mod error;
pub mod event;
pub mod poll;
pub mod provider;
pub mod services;
pub mod settings;
pub mod snooze;
pub mod sorted_list;
pub mod sync;
pub mod tracking;

pub use error::{
    CalendarSyncError, ProviderError, ProviderResult, SyncError, SyncFailure, SyncResult,
};
pub use event::{
    Calendar, ConferenceEntryPoint, Event, EventStatus, EventTime, RawEvent, Reminder,
    ReminderMethod,
};
pub use provider::{CalendarProvider, EventsPage, EventsRequest};
pub use services::{ServiceCache, ServiceFactory};
pub use settings::{AccountConfig, ServiceKind, Settings};
pub use sorted_list::SortedList;
pub use sync::{CalendarService, SyncingCalendarService};
pub use tracking::{EventsManager, TrackedEvent};
