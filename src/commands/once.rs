use anyhow::Result;
use calremind_core::EventsManager;
use chrono::Utc;
use owo_colors::OwoColorize;

use crate::providers::ProviderFactory;
use crate::render;

const SNOOZE_CHOICES: usize = 3;

pub async fn run(settings: calremind_core::Settings) -> Result<()> {
    super::require_accounts(&settings)?;

    let mut manager = EventsManager::new(ProviderFactory::new(&settings));
    let now = Utc::now();

    let outcome = manager
        .synchronize_all(&settings.accounts, settings.lookahead(), now)
        .await;

    let active = manager.get_active_events(now);
    if active.is_empty() {
        println!("Nothing due. {} upcoming events tracked.", manager.events().len());
    } else {
        for tracked in &active {
            println!("{}", render::reminder(tracked, now));
            if let Some(options) = render::snooze_options(tracked, now, SNOOZE_CHOICES) {
                println!("{}", options);
            }
        }
    }

    if let Err(failure) = outcome {
        let summary = format!("{} calendar(s) failed to sync", failure.errors.len());
        println!("\n{}", summary.red());
        println!("{}", render::failure(&failure));
    }

    Ok(())
}
