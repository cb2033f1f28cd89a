//! Provider item to [`Event`] translation.

use std::sync::LazyLock;

use chrono::TimeDelta;
use regex::Regex;

use crate::event::{Event, EventTime, RawEvent, max_popup_minutes};

const ALL_DAY_REMINDER_MINUTES: i64 = 24 * 60;
const TIMED_REMINDER_MINUTES: i64 = 15;
const UNTITLED: &str = "(No title)";

static VIDEO_LOCATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)https?://(?:[^./\s]+\.zoom\.us/j/\S*|meet\.google\.com/\S+|teams\.microsoft\.com/l/meetup-join/\S+)",
    )
    .expect("video location pattern is valid")
});

/// Translate a provider item, or `None` when it carries no upcoming occurrence
/// (cancelled, or deleted and therefore missing a start).
///
/// `default_reminder` is the calendar's default lead in minutes.
pub fn to_event(raw: RawEvent, default_reminder: Option<i64>) -> Option<Event> {
    if raw.is_cancelled() {
        return None;
    }
    let start_time = raw.start?;

    let all_day = start_time.is_all_day();
    let start = start_time.to_utc();
    let mut end = raw.end.as_ref().map_or(start, EventTime::to_utc);
    if all_day && end == start {
        end = end.checked_add_signed(TimeDelta::days(1)).unwrap_or(end);
    }

    // Leads too large to represent fall through to the next source
    let reminder_lead = max_popup_minutes(&raw.reminders)
        .and_then(TimeDelta::try_minutes)
        .or_else(|| default_reminder.and_then(TimeDelta::try_minutes))
        .unwrap_or_else(|| {
            TimeDelta::minutes(if all_day {
                ALL_DAY_REMINDER_MINUTES
            } else {
                TIMED_REMINDER_MINUTES
            })
        });

    let conference_uri = raw
        .entry_points
        .iter()
        .find(|ep| ep.entry_point_type == "video")
        .map(|ep| ep.uri.clone())
        .or_else(|| video_link_in(raw.location.as_deref()?));

    Some(Event {
        id: raw.id,
        title: raw
            .summary
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| UNTITLED.to_string()),
        event_uri: raw.html_link,
        conference_uri,
        start,
        end,
        reminder_lead,
    })
}

fn video_link_in(location: &str) -> Option<String> {
    VIDEO_LOCATION
        .find(location)
        .map(|m| m.as_str().to_string())
}
