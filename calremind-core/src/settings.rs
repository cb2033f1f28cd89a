//! Configuration values consumed by the engine.

use std::fmt;
use std::path::PathBuf;

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

use crate::event::Calendar;

const DEFAULT_LOOKAHEAD_HOURS: u32 = 48;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// How far ahead of now events are tracked
    #[serde(default = "default_lookahead_hours")]
    pub lookahead_hours: u32,
    #[serde(default)]
    pub accounts: Vec<AccountConfig>,
}

fn default_lookahead_hours() -> u32 {
    DEFAULT_LOOKAHEAD_HOURS
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            lookahead_hours: DEFAULT_LOOKAHEAD_HOURS,
            accounts: Vec::new(),
        }
    }
}

impl Settings {
    pub fn lookahead(&self) -> TimeDelta {
        TimeDelta::hours(i64::from(self.lookahead_hours))
    }
}

/// One calendar account and the calendars to watch in it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountConfig {
    pub service: ServiceKind,
    pub account_id: String,
    /// Where the account's access token lives, if not the default location
    #[serde(default)]
    pub token_file: Option<PathBuf>,
    #[serde(default)]
    pub calendars: Vec<Calendar>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceKind {
    Google,
    /// Any service name this build doesn't know about
    #[serde(other)]
    Unknown,
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceKind::Google => write!(f, "google"),
            ServiceKind::Unknown => write!(f, "unknown"),
        }
    }
}
