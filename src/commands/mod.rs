pub mod calendars;
pub mod once;
pub mod run;

use anyhow::Result;
use calremind_core::Settings;

fn require_accounts(settings: &Settings) -> Result<()> {
    if settings.accounts.is_empty() {
        anyhow::bail!(
            "No accounts configured.\n\
            Add an [[accounts]] entry to ~/.config/calremind/config.toml, e.g.:\n\n\
            [[accounts]]\n\
            service = \"google\"\n\
            account_id = \"you@gmail.com\"\n\n\
            [[accounts.calendars]]\n\
            id = \"primary\""
        );
    }
    Ok(())
}
