use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::account::Role;
use crate::credential::Secret;

/// Root configuration, read from `config.toml`.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct RegistryConfig {
    #[serde(default)]
    pub credentials: CredentialDefaults,
    #[serde(default)]
    pub hashing: HashingSettings,
    #[serde(default)]
    pub provisioning: ProvisioningSettings,
    #[serde(default)]
    pub store: StoreSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Secrets assigned when a provisioning request carries none.
#[derive(Deserialize, Serialize, Clone, PartialEq)]
pub struct CredentialDefaults {
    #[serde(default = "default_student_secret")]
    pub default_student_secret: String,
    #[serde(default = "default_faculty_secret")]
    pub default_faculty_secret: String,
    #[serde(default = "default_admin_secret")]
    pub default_admin_secret: String,
}

impl CredentialDefaults {
    pub fn secret_for(&self, role: Role) -> Secret {
        match role {
            Role::Student => Secret::new(self.default_student_secret.clone()),
            Role::Faculty => Secret::new(self.default_faculty_secret.clone()),
            Role::Admin => Secret::new(self.default_admin_secret.clone()),
        }
    }
}

impl Default for CredentialDefaults {
    fn default() -> Self {
        Self {
            default_student_secret: default_student_secret(),
            default_faculty_secret: default_faculty_secret(),
            default_admin_secret: default_admin_secret(),
        }
    }
}

impl std::fmt::Debug for CredentialDefaults {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialDefaults")
            .field("default_student_secret", &"**redacted**")
            .field("default_faculty_secret", &"**redacted**")
            .field("default_admin_secret", &"**redacted**")
            .finish()
    }
}

fn default_student_secret() -> String {
    "student-change-me".to_string()
}

fn default_faculty_secret() -> String {
    "faculty-change-me".to_string()
}

fn default_admin_secret() -> String {
    "admin-change-me".to_string()
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct HashingSettings {
    /// Number of digest iterations per hash.
    #[serde(default = "default_rounds")]
    pub rounds: u32,
}

impl Default for HashingSettings {
    fn default() -> Self {
        Self {
            rounds: default_rounds(),
        }
    }
}

fn default_rounds() -> u32 {
    10_000
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ProvisioningSettings {
    /// How many times a provisioning call may run when its generated
    /// identifier collides with a concurrent call. `1` disables retries.
    #[serde(default = "default_identifier_attempts")]
    pub identifier_attempts: u32,
}

impl Default for ProvisioningSettings {
    fn default() -> Self {
        Self {
            identifier_attempts: default_identifier_attempts(),
        }
    }
}

fn default_identifier_attempts() -> u32 {
    1
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct StoreSettings {
    /// JSON snapshot the in-memory store is loaded from and saved to.
    /// `None` keeps everything in memory.
    #[serde(default)]
    pub snapshot_path: Option<PathBuf>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: RegistryConfig = toml::from_str(
            r#"
            [credentials]
            default_admin_secret = "root"

            [provisioning]
            identifier_attempts = 3
            "#,
        )
        .unwrap();

        assert_eq!(config.credentials.default_admin_secret, "root");
        assert_eq!(config.credentials.default_student_secret, "student-change-me");
        assert_eq!(config.provisioning.identifier_attempts, 3);
        assert_eq!(config.hashing.rounds, 10_000);
        assert_eq!(config.logging.level, "info");
        assert!(config.store.snapshot_path.is_none());
    }

    #[test]
    fn test_each_role_gets_its_own_default() {
        let defaults = CredentialDefaults::default();
        assert_eq!(defaults.secret_for(Role::Student).expose(), "student-change-me");
        assert_eq!(defaults.secret_for(Role::Faculty).expose(), "faculty-change-me");
        assert_eq!(defaults.secret_for(Role::Admin).expose(), "admin-change-me");
    }

    #[test]
    fn test_debug_hides_default_secrets() {
        let rendered = format!("{:?}", CredentialDefaults::default());
        assert!(!rendered.contains("change-me"));
    }
}
