//! Wiring of configuration, logging and the store for one CLI invocation.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use registry_application::{
    CredentialUseCase, DeprovisioningUseCase, ProfileUpdateUseCase, ProvisioningUseCase,
    RegistryQueries, RegistryServices,
};
use registry_core::config::RegistryConfig;
use registry_infrastructure::{
    ConfigService, InMemoryDocumentStore, RegistryPaths, Sha256CredentialHasher, SystemClock,
};

pub struct App {
    pub config: RegistryConfig,
    pub store: Arc<InMemoryDocumentStore>,
    pub services: RegistryServices,
}

impl App {
    /// Loads configuration, installs the log subscriber and opens the store.
    ///
    /// The snapshot path is resolved from `--snapshot`, then the config, then
    /// the platform data directory.
    pub async fn bootstrap(
        config_path: Option<PathBuf>,
        snapshot: Option<PathBuf>,
    ) -> Result<Self> {
        let service = match config_path {
            Some(path) => ConfigService::with_path(path),
            None => ConfigService::new()?,
        };
        let config = service.get_config().await?;

        init_logging(&config.logging.level);
        tracing::debug!("[App] Using config {:?}", service.path());

        let snapshot_path = match snapshot.or_else(|| config.store.snapshot_path.clone()) {
            Some(path) => path,
            None => RegistryPaths::default_snapshot_file()?,
        };
        let store = Arc::new(
            InMemoryDocumentStore::open(&snapshot_path)
                .with_context(|| format!("Failed to open store snapshot {:?}", snapshot_path))?,
        );

        let services = RegistryServices::from_store(
            store.clone(),
            Arc::new(Sha256CredentialHasher::new(config.hashing.rounds)),
            Arc::new(SystemClock),
        );

        Ok(Self {
            config,
            store,
            services,
        })
    }

    pub fn provisioning(&self) -> ProvisioningUseCase {
        ProvisioningUseCase::new(
            &self.services,
            self.config.credentials.clone(),
            &self.config.provisioning,
        )
    }

    pub fn deprovisioning(&self) -> DeprovisioningUseCase {
        DeprovisioningUseCase::new(&self.services)
    }

    pub fn profile_updates(&self) -> ProfileUpdateUseCase {
        ProfileUpdateUseCase::new(&self.services)
    }

    pub fn credentials(&self) -> CredentialUseCase {
        CredentialUseCase::new(&self.services)
    }

    pub fn queries(&self) -> RegistryQueries {
        RegistryQueries::new(&self.services)
    }
}

/// Logs go to stderr so stdout stays machine-readable.
///
/// `RUST_LOG` wins over the configured level.
fn init_logging(level: &str) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init();
}
