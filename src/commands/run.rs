use std::sync::Arc;

use anyhow::Result;
use calremind_core::poll::{self, ReminderSink};
use calremind_core::{EventsManager, Settings, SyncFailure, TrackedEvent};
use chrono::{DateTime, Utc};
use owo_colors::OwoColorize;
use tracing::{info, warn};

use crate::providers::ProviderFactory;
use crate::render;

/// Prints due reminders, once per event and reminder time.
#[derive(Default)]
struct TerminalSink {
    shown: Vec<(String, String, Option<DateTime<Utc>>)>,
}

impl TerminalSink {
    fn key(tracked: &TrackedEvent) -> (String, String, Option<DateTime<Utc>>) {
        (
            tracked.calendar().id.clone(),
            tracked.event().id.clone(),
            tracked.remind_at(),
        )
    }
}

impl ReminderSink for TerminalSink {
    fn show_active(&mut self, events: &[Arc<TrackedEvent>], now: DateTime<Utc>) {
        let keys: Vec<_> = events.iter().map(|e| Self::key(e)).collect();

        for (tracked, key) in events.iter().zip(&keys) {
            if !self.shown.contains(key) {
                println!("{}", render::reminder(tracked, now));
            }
        }

        // Forget events that are no longer due so they show again if re-armed
        self.shown = keys;
    }

    fn sync_finished(&mut self, outcome: &Result<(), SyncFailure>) {
        if let Err(failure) = outcome {
            warn!(failed = failure.errors.len(), "Sync incomplete");
            eprintln!("{}", render::failure(failure));
        }
    }
}

pub async fn run(settings: Settings) -> Result<()> {
    super::require_accounts(&settings)?;

    let mut manager = EventsManager::new(ProviderFactory::new(&settings));
    let mut sink = TerminalSink::default();

    println!(
        "Watching {} account(s), looking {} hours ahead. Press Ctrl-C to stop.",
        settings.accounts.len(),
        settings.lookahead_hours
    );

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            eprintln!("{}", format!("Could not listen for Ctrl-C: {}", e).red());
            std::future::pending::<()>().await;
        }
    };

    poll::run(&mut manager, &settings, &mut sink, shutdown).await;
    info!("Stopped");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use calremind_core::{Calendar, Event};
    use chrono::{TimeDelta, TimeZone};

    fn tracked(id: &str) -> Arc<TrackedEvent> {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
        let event = Event {
            id: id.into(),
            title: id.into(),
            event_uri: None,
            conference_uri: None,
            start,
            end: start + TimeDelta::hours(1),
            reminder_lead: TimeDelta::minutes(10),
        };
        Arc::new(TrackedEvent::new(Arc::new(Calendar::new("primary", "Work")), event))
    }

    #[test]
    fn test_sink_remembers_shown_events_until_they_stop_being_due() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 9, 55, 0).unwrap();
        let standup = tracked("standup");
        let mut sink = TerminalSink::default();

        sink.show_active(&[standup.clone()], now);
        assert_eq!(sink.shown.len(), 1);

        standup.snooze(now + TimeDelta::minutes(5));
        sink.show_active(&[], now);
        assert!(sink.shown.is_empty());

        sink.show_active(&[standup.clone()], now + TimeDelta::minutes(5));
        assert_eq!(sink.shown, vec![TerminalSink::key(&standup)]);
    }
}
