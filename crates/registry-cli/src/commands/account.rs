use anyhow::Result;

use registry_core::credential::Secret;
use registry_core::identifier::ExternalId;

use super::print_json;
use crate::app::App;

pub async fn show(app: &App, external_id: &str) -> Result<()> {
    let view = app
        .queries()
        .account_view(&ExternalId::from(external_id))
        .await?;
    print_json(&view)
}

pub async fn login(app: &App, external_id: &str, secret: String) -> Result<()> {
    let check = app
        .credentials()
        .verify(&ExternalId::from(external_id), &Secret::new(secret))
        .await?;
    print_json(&check)
}

pub async fn change_secret(
    app: &App,
    external_id: &str,
    current: String,
    replacement: String,
) -> Result<()> {
    let check = app
        .credentials()
        .change(
            &ExternalId::from(external_id),
            &Secret::new(current),
            &Secret::new(replacement),
        )
        .await?;
    print_json(&check)
}
