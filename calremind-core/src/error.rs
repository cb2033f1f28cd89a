//! Error types for calremind-core.

use std::fmt;

use thiserror::Error;

/// Failures reported by a calendar provider.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// The provider no longer accepts the stored change cursor; a full resync is required.
    #[error("Sync cursor is no longer valid, a full resync is required")]
    CursorInvalidated,

    #[error("Not authorized: {0}")]
    Unauthorized(String),

    #[error("Provider returned HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Failed to decode provider response: {0}")]
    Decode(String),

    #[error("Calendar service '{0}' is not supported")]
    UnsupportedService(String),
}

pub type ProviderResult<T> = Result<T, ProviderError>;

/// Failures while synchronizing a single calendar.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("Sync cursor for calendar '{0}' stayed invalid after a full resync")]
    RetryExhausted(String),
}

pub type SyncResult<T> = Result<T, SyncError>;

/// A sync failure attributed to one configured calendar.
#[derive(Error, Debug, Clone)]
#[error("Failed to sync calendar '{calendar_id}' of account '{account_id}': {source}")]
pub struct CalendarSyncError {
    pub account_id: String,
    pub calendar_id: String,
    #[source]
    pub source: SyncError,
}

/// Every calendar that failed during one synchronization pass.
///
/// Returned only after the merge has run for the calendars that did succeed.
#[derive(Error, Debug, Clone)]
pub struct SyncFailure {
    pub errors: Vec<CalendarSyncError>,
}

impl SyncFailure {
    pub fn failed_calendars(&self) -> impl Iterator<Item = &str> {
        self.errors.iter().map(|e| e.calendar_id.as_str())
    }
}

impl fmt::Display for SyncFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} calendar(s) failed to sync", self.errors.len())?;
        for error in &self.errors {
            write!(f, "\n  {}", error)?;
        }
        Ok(())
    }
}
