//! Collaborators shared by every use case.

use std::sync::Arc;

use registry_core::academic::AcademicRepository;
use registry_core::account::AccountRepository;
use registry_core::clock::Clock;
use registry_core::credential::CredentialHasher;
use registry_core::profile::ProfileRepository;
use registry_core::transaction::TransactionalStore;

/// Store, hasher and clock handles the use cases are built from.
#[derive(Clone)]
pub struct RegistryServices {
    pub academic: Arc<dyn AcademicRepository>,
    pub accounts: Arc<dyn AccountRepository>,
    pub profiles: Arc<dyn ProfileRepository>,
    pub store: Arc<dyn TransactionalStore>,
    pub hasher: Arc<dyn CredentialHasher>,
    pub clock: Arc<dyn Clock>,
}

impl RegistryServices {
    /// Wires every repository role to one store implementation.
    pub fn from_store<S>(
        store: Arc<S>,
        hasher: Arc<dyn CredentialHasher>,
        clock: Arc<dyn Clock>,
    ) -> Self
    where
        S: AcademicRepository
            + AccountRepository
            + ProfileRepository
            + TransactionalStore
            + 'static,
    {
        Self {
            academic: store.clone(),
            accounts: store.clone(),
            profiles: store.clone(),
            store,
            hasher,
            clock,
        }
    }
}
