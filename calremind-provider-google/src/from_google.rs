use calremind_core::event::{
    Calendar, ConferenceEntryPoint, EventStatus, EventTime, RawEvent, Reminder, ReminderMethod,
};

use crate::types::{CalendarListEntry, EventDateTime, GoogleEvent, GoogleReminder};

pub trait FromGoogle<T> {
    fn from_google(value: T) -> Self;
}

impl FromGoogle<GoogleEvent> for RawEvent {
    fn from_google(event: GoogleEvent) -> Self {
        let status = match event.status.as_deref() {
            Some("tentative") => EventStatus::Tentative,
            Some("cancelled") => EventStatus::Cancelled,
            _ => EventStatus::Confirmed,
        };

        // Overrides only count when the calendar default is switched off
        let reminders = event
            .reminders
            .filter(|r| !r.use_default)
            .map(|r| r.overrides.into_iter().map(Reminder::from_google).collect())
            .unwrap_or_default();

        let entry_points = event
            .conference_data
            .map(|cd| {
                cd.entry_points
                    .into_iter()
                    .map(|ep| ConferenceEntryPoint {
                        entry_point_type: ep.entry_point_type,
                        uri: ep.uri,
                    })
                    .collect()
            })
            .unwrap_or_default();

        RawEvent {
            id: event.id,
            status,
            summary: event.summary,
            html_link: event.html_link,
            location: event.location.filter(|l| !l.is_empty()),
            start: event.start.and_then(event_time),
            end: event.end.and_then(event_time),
            reminders,
            entry_points,
        }
    }
}

impl FromGoogle<GoogleReminder> for Reminder {
    fn from_google(reminder: GoogleReminder) -> Self {
        let method = match reminder.method.as_str() {
            "popup" => ReminderMethod::Popup,
            "email" => ReminderMethod::Email,
            _ => ReminderMethod::Other(reminder.method),
        };
        Reminder {
            method,
            minutes: reminder.minutes,
        }
    }
}

impl FromGoogle<CalendarListEntry> for Calendar {
    fn from_google(entry: CalendarListEntry) -> Self {
        Calendar {
            name: entry
                .summary_override
                .or(entry.summary)
                .unwrap_or_else(|| entry.id.clone()),
            id: entry.id,
            color: entry.background_color,
        }
    }
}

fn event_time(time: EventDateTime) -> Option<EventTime> {
    match (time.date_time, time.date) {
        (Some(dt), _) => Some(EventTime::DateTime(dt)),
        (None, Some(d)) => Some(EventTime::Date(d)),
        (None, None) => None,
    }
}
