//! Maps configured accounts to provider clients.

use std::collections::HashMap;
use std::path::PathBuf;

use calremind_core::{
    CalendarService, ProviderError, ProviderResult, ServiceFactory, ServiceKind, Settings,
    SyncingCalendarService,
};
use calremind_provider_google::GoogleCalendarProvider;

use crate::config;

/// Builds a syncing service per account, reading its access token from disk.
pub struct ProviderFactory {
    token_files: HashMap<String, PathBuf>,
}

impl ProviderFactory {
    pub fn new(settings: &Settings) -> Self {
        let token_files = settings
            .accounts
            .iter()
            .filter_map(|account| {
                let path = account.token_file.as_deref()?;
                Some((account.account_id.clone(), config::expand_path(path)))
            })
            .collect();

        ProviderFactory { token_files }
    }

    fn google_token(&self, account_id: &str) -> anyhow::Result<String> {
        let path = match self.token_files.get(account_id) {
            Some(path) => path.clone(),
            None => config::google_token_path(account_id)?,
        };
        config::load_access_token(&path)
    }
}

impl ServiceFactory for ProviderFactory {
    fn create(
        &self,
        kind: ServiceKind,
        account_id: &str,
    ) -> ProviderResult<Box<dyn CalendarService>> {
        match kind {
            ServiceKind::Google => {
                let token = self
                    .google_token(account_id)
                    .map_err(|e| ProviderError::Unauthorized(format!("{:#}", e)))?;
                let provider = GoogleCalendarProvider::new(token);
                Ok(Box::new(SyncingCalendarService::new(provider)))
            }
            ServiceKind::Unknown => Err(ProviderError::UnsupportedService(kind.to_string())),
        }
    }
}
