use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use registry_core::academic::{Month, SemesterCode, SemesterTitle};
use registry_core::account::Role;

mod app;
mod commands;

#[derive(Parser)]
#[command(name = "registry")]
#[command(about = "Campus Registry CLI - provision and manage university accounts", long_about = None)]
struct Cli {
    /// Path to config.toml (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Store snapshot file; overrides the configured path
    #[arg(long, global = true)]
    snapshot: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the academic catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// Create a profile and its account
    Provision {
        role: Role,
        /// JSON file holding the profile
        #[arg(long)]
        profile: PathBuf,
        /// Initial secret; the role's default when omitted
        #[arg(long)]
        secret: Option<String>,
        /// Do not require a credential change on first login
        #[arg(long)]
        no_reset: bool,
    },
    /// Delete a profile and its account
    Deprovision { external_id: String },
    /// Apply a partial profile update from a JSON file
    Update {
        external_id: String,
        #[arg(long)]
        patch: PathBuf,
    },
    /// Print the expanded account view
    Show { external_id: String },
    /// Check a credential
    Login {
        external_id: String,
        #[arg(long)]
        secret: String,
    },
    /// Replace a credential
    ChangeSecret {
        external_id: String,
        #[arg(long)]
        current: String,
        #[arg(long)]
        new: String,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    AddSemester {
        #[arg(long, value_parser = commands::catalog::parse_title)]
        title: SemesterTitle,
        #[arg(long)]
        year: String,
        #[arg(long, value_parser = commands::catalog::parse_code)]
        code: SemesterCode,
        #[arg(long)]
        start_month: Month,
        #[arg(long)]
        end_month: Month,
    },
    AddFaculty {
        #[arg(long)]
        title: String,
    },
    AddDepartment {
        #[arg(long)]
        title: String,
        /// Academic faculty the department belongs to
        #[arg(long)]
        faculty: String,
    },
    AddManagementDepartment {
        #[arg(long)]
        title: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            commands::report_error(&err);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let app = app::App::bootstrap(cli.config, cli.snapshot).await?;

    match cli.command {
        Commands::Catalog { action } => match action {
            CatalogAction::AddSemester {
                title,
                year,
                code,
                start_month,
                end_month,
            } => {
                commands::catalog::add_semester(&app, title, &year, code, start_month, end_month)
                    .await?
            }
            CatalogAction::AddFaculty { title } => {
                commands::catalog::add_faculty(&app, title).await?
            }
            CatalogAction::AddDepartment { title, faculty } => {
                commands::catalog::add_department(&app, title, faculty).await?
            }
            CatalogAction::AddManagementDepartment { title } => {
                commands::catalog::add_management_department(&app, title).await?
            }
        },
        Commands::Provision {
            role,
            profile,
            secret,
            no_reset,
        } => commands::lifecycle::provision(&app, role, &profile, secret, no_reset).await?,
        Commands::Deprovision { external_id } => {
            commands::lifecycle::deprovision(&app, &external_id).await?
        }
        Commands::Update { external_id, patch } => {
            commands::lifecycle::update(&app, &external_id, &patch).await?
        }
        Commands::Show { external_id } => commands::account::show(&app, &external_id).await?,
        Commands::Login {
            external_id,
            secret,
        } => commands::account::login(&app, &external_id, secret).await?,
        Commands::ChangeSecret {
            external_id,
            current,
            new,
        } => commands::account::change_secret(&app, &external_id, current, new).await?,
    }

    Ok(())
}
