//! The aggregate cache of tracked events and how it's kept up to date.

pub mod manager;
pub mod merge;
pub mod tracked_event;

pub use manager::EventsManager;
pub use merge::merge_into;
pub use tracked_event::{TrackedEvent, by_start_time};
