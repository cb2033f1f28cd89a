//! Per-calendar synchronization against a provider.
//!
//! Each calendar keeps its own cache of events for a fixed operating window.
//! The first sync of a UTC day is a full one; later syncs that day only fetch
//! the changes since the stored cursor.

pub mod service;
pub mod state;
pub mod translate;

pub use service::{CalendarService, SyncingCalendarService, events_within};
pub use state::CalendarSyncState;
pub use translate::to_event;
