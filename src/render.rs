//! Terminal rendering of reminders and sync failures.

use calremind_core::snooze;
use calremind_core::{SyncFailure, TrackedEvent};
use chrono::{DateTime, Local, Utc};
use owo_colors::OwoColorize;

/// One line per due event, plus its meeting link if it has one.
pub fn reminder(tracked: &TrackedEvent, now: DateTime<Utc>) -> String {
    let event = tracked.event();
    let when = match snooze::remaining_label(event.start - now) {
        label if event.start > now && label != "Now" => format!("in {}", label),
        label => label,
    };

    let mut line = format!(
        "🔔 {} {} {} {}",
        local_time(event.start),
        event.title.bold(),
        format!("({})", calendar_label(tracked)).dimmed(),
        when.cyan()
    );
    if let Some(uri) = &event.conference_uri {
        line.push_str(&format!("\n   join: {}", uri.underline()));
    }
    line
}

fn calendar_label(tracked: &TrackedEvent) -> &str {
    let calendar = tracked.calendar();
    if calendar.name.is_empty() {
        &calendar.id
    } else {
        &calendar.name
    }
}

/// The soonest few snooze choices for an event, on one line.
pub fn snooze_options(
    tracked: &TrackedEvent,
    now: DateTime<Utc>,
    limit: usize,
) -> Option<String> {
    let mut options = snooze::suggest(tracked.event(), now);
    options.sort_by_key(|option| option.remind_at);
    options.dedup_by_key(|option| option.remind_at);

    let options: Vec<_> = options
        .into_iter()
        .take(limit)
        .map(|option| format!("{} ({})", option.label, local_time(option.remind_at)))
        .collect();

    if options.is_empty() {
        None
    } else {
        Some(format!("   snooze: {}", options.join(", ").dimmed()))
    }
}

pub fn failure(failure: &SyncFailure) -> String {
    failure
        .errors
        .iter()
        .map(|e| format!("   {}", e.to_string().red()))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn local_time(time: DateTime<Utc>) -> String {
    time.with_timezone(&Local).format("%a %H:%M").to_string()
}
