pub mod clock;
pub mod config_service;
pub mod credential_hasher;
pub mod memory_store;
pub mod paths;
pub mod storage;

pub use clock::SystemClock;
pub use config_service::ConfigService;
pub use credential_hasher::Sha256CredentialHasher;
pub use memory_store::InMemoryDocumentStore;
pub use paths::RegistryPaths;
