//! calremind-provider-google - Google Calendar provider for calremind
//!
//! Talks to the Calendar v3 REST API with an OAuth access token obtained
//! elsewhere. Tokens conventionally live at:
//!   ~/.config/calremind/providers/google/tokens/{account}.json

mod client;
mod from_google;
mod types;

pub use client::GoogleCalendarProvider;
