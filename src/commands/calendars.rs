use anyhow::Result;
use calremind_core::{ServiceCache, Settings};
use owo_colors::OwoColorize;

use crate::providers::ProviderFactory;

pub async fn run(settings: Settings) -> Result<()> {
    super::require_accounts(&settings)?;

    let mut services = ServiceCache::new(ProviderFactory::new(&settings));

    for (i, account) in settings.accounts.iter().enumerate() {
        println!("{} ({})", account.account_id.bold(), account.service);

        let result = match services.get_or_create(account.service, &account.account_id) {
            Ok(service) => service.list_calendars().await,
            Err(e) => Err(e),
        };

        match result {
            Ok(calendars) => {
                for calendar in calendars {
                    let color = calendar.color.as_deref().unwrap_or("");
                    println!("   {}  {} {}", calendar.id, calendar.name, color.dimmed());
                }
            }
            Err(e) => println!("   {}", e.to_string().red()),
        }

        // Add spacing between accounts (but not after the last one)
        if i < settings.accounts.len() - 1 {
            println!();
        }
    }

    Ok(())
}
