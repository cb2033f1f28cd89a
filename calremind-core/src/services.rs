//! One long-lived calendar service per configured account.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use tracing::debug;

use crate::error::ProviderResult;
use crate::settings::ServiceKind;
use crate::sync::CalendarService;

/// Builds the calendar service for an account.
pub trait ServiceFactory: Send + Sync {
    /// Fails with `ProviderError::UnsupportedService` for kinds it can't serve.
    fn create(
        &self,
        kind: ServiceKind,
        account_id: &str,
    ) -> ProviderResult<Box<dyn CalendarService>>;
}

/// Services keyed by `(kind, account id)`, reused across sync cycles so that
/// each keeps its per-calendar caches and cursors.
pub struct ServiceCache {
    factory: Box<dyn ServiceFactory>,
    services: HashMap<(ServiceKind, String), Box<dyn CalendarService>>,
}

impl ServiceCache {
    pub fn new(factory: impl ServiceFactory + 'static) -> Self {
        ServiceCache {
            factory: Box::new(factory),
            services: HashMap::new(),
        }
    }

    /// The cached service for the account, created on first use.
    ///
    /// A failed creation is not cached, so the next call tries again.
    pub fn get_or_create(
        &mut self,
        kind: ServiceKind,
        account_id: &str,
    ) -> ProviderResult<&mut Box<dyn CalendarService>> {
        match self.services.entry((kind, account_id.to_string())) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                debug!(service = %kind, account = %account_id, "Creating calendar service");
                let service = self.factory.create(kind, account_id)?;
                Ok(entry.insert(service))
            }
        }
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}
