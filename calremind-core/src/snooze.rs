//! Snooze suggestions and human-readable remaining-time labels.

use chrono::{DateTime, TimeDelta, Utc};

use crate::event::Event;

/// Standard snooze intervals in minutes, longest first.
const STANDARD_INTERVAL_MINUTES: [i64; 15] = [
    14 * 24 * 60,
    7 * 24 * 60,
    5 * 24 * 60,
    2 * 24 * 60,
    24 * 60,
    18 * 60,
    12 * 60,
    8 * 60,
    6 * 60,
    2 * 60,
    60,
    45,
    30,
    15,
    5,
];

/// Events starting sooner than this are considered to be happening now.
const STARTING_NOW_SECONDS: i64 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnoozeOption {
    pub label: String,
    pub remind_at: DateTime<Utc>,
}

/// Snooze options for `event`, in display order.
///
/// "Before start" options come first, then "when event starts", then
/// "snooze for" options from the shortest interval up, none of which reach
/// past the event's end.
pub fn suggest(event: &Event, now: DateTime<Utc>) -> Vec<SnoozeOption> {
    let mut options = Vec::new();

    for interval in standard_intervals() {
        let remind_at = event.start - interval;
        if remind_at > now {
            options.push(SnoozeOption {
                label: format!("{} before start", remaining_label(interval)),
                remind_at,
            });
        }
    }

    if now <= event.start - TimeDelta::seconds(STARTING_NOW_SECONDS) {
        options.push(SnoozeOption {
            label: "When event starts".to_string(),
            remind_at: event.start,
        });
    }

    // The longest interval is only ever offered relative to the start
    for interval in standard_intervals().skip(1).rev() {
        let remind_at = now + interval;
        if remind_at >= event.end {
            break;
        }
        options.push(SnoozeOption {
            label: remaining_label(interval),
            remind_at,
        });
    }

    options
}

fn standard_intervals() -> impl DoubleEndedIterator<Item = TimeDelta> + ExactSizeIterator {
    STANDARD_INTERVAL_MINUTES.into_iter().map(TimeDelta::minutes)
}

/// Render the time left before something starts. Negative values are overdue.
///
/// Within 10 seconds before and one minute after, this is "Now". Otherwise
/// the interval is rounded to whole minutes (up while pending, down once
/// overdue) and shown in the largest unit that fits at least once.
pub fn remaining_label(remaining: TimeDelta) -> String {
    let overdue = remaining < TimeDelta::zero();
    let remaining = remaining.abs();

    let seconds = remaining.num_milliseconds() as f64 / 1000.0;
    if seconds < STARTING_NOW_SECONDS as f64 || (overdue && seconds < 60.0) {
        return "Now".to_string();
    }

    let minutes = seconds / 60.0;
    let minutes = if overdue {
        minutes.trunc()
    } else {
        minutes.ceil()
    };

    let hours = minutes / 60.0;
    let days = hours / 24.0;
    let weeks = days / 7.0;

    let base = match (
        round_at_least_one(weeks),
        round_at_least_one(days),
        round_at_least_one(hours),
    ) {
        (w, _, _) if w >= 2.0 => format!("{w} weeks"),
        (w, _, _) if w >= 1.0 => "1 week".to_string(),
        (_, d, _) if d >= 2.0 => format!("{d} days"),
        (_, d, _) if d >= 1.0 => "1 day".to_string(),
        (_, _, h) if h >= 2.0 => format!("{h} hours"),
        (_, _, h) if h >= 1.0 => "1 hour".to_string(),
        _ if minutes >= 2.0 => format!("{minutes} minutes"),
        _ => "1 minute".to_string(),
    };

    if overdue {
        format!("{base} overdue")
    } else {
        base
    }
}

/// Units below one are dropped so the next smaller unit is used instead.
fn round_at_least_one(value: f64) -> f64 {
    if value >= 1.0 {
        value.round_ties_even()
    } else {
        0.0
    }
}
