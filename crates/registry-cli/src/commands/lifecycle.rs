use std::path::Path;

use anyhow::{Context, Result, bail};

use registry_core::account::Role;
use registry_core::credential::Secret;
use registry_core::identifier::ExternalId;
use registry_core::profile::{AccountPayload, ProfileDetails, ProfilePatch};

use super::print_json;
use crate::app::App;

fn read_json<T: serde::de::DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {} file {:?}", what, path))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid {} JSON in {:?}", what, path))
}

pub async fn provision(
    app: &App,
    role: Role,
    profile_path: &Path,
    secret: Option<String>,
    no_reset: bool,
) -> Result<()> {
    let details: ProfileDetails = read_json(profile_path, "profile")?;
    if details.role() != role {
        bail!(
            "profile file describes a {} but {} was requested",
            details.role(),
            role
        );
    }

    let payload = AccountPayload {
        credential_secret: secret.map(Secret::new),
        requires_credential_reset: no_reset.then_some(false),
    };

    match app.provisioning().provision(details, payload).await? {
        Some(view) => print_json(&view),
        None => {
            tracing::warn!("[CLI] Provisioned, but the new account could not be read back");
            print_json(&serde_json::Value::Null)
        }
    }
}

pub async fn deprovision(app: &App, external_id: &str) -> Result<()> {
    let deleted = app
        .deprovisioning()
        .deprovision(&ExternalId::from(external_id))
        .await?;
    print_json(&deleted)
}

pub async fn update(app: &App, external_id: &str, patch_path: &Path) -> Result<()> {
    let patch: ProfilePatch = read_json(patch_path, "patch")?;
    let updated = app
        .profile_updates()
        .update(&ExternalId::from(external_id), patch)
        .await?;
    print_json(&updated)
}
