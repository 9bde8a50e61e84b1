//! Application layer for the campus registry.
//!
//! Use cases here coordinate the core traits (catalog lookups, the
//! transactional store, the credential hasher and the clock) to provision,
//! update and deprovision accounts.

pub mod credential_usecase;
pub mod deprovisioning_usecase;
pub mod profile_update_usecase;
pub mod provisioning_usecase;
pub mod queries;
pub mod reference_validator;
pub mod sequence_allocator;
pub mod services;

pub use credential_usecase::{CredentialCheck, CredentialUseCase};
pub use deprovisioning_usecase::DeprovisioningUseCase;
pub use profile_update_usecase::ProfileUpdateUseCase;
pub use provisioning_usecase::ProvisioningUseCase;
pub use queries::RegistryQueries;
pub use reference_validator::ReferenceValidator;
pub use sequence_allocator::SequenceAllocator;
pub use services::RegistryServices;
