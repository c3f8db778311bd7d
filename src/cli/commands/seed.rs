use serde_json::json;

use crate::auth::PasswordHasher;
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::config::config;
use crate::database::DatabaseManager;
use crate::services::{seed_super_admin, SeedOutcome};

pub async fn handle(output_format: OutputFormat) -> anyhow::Result<()> {
    let pool = DatabaseManager::pool()?;
    let outcome = seed_super_admin(&pool, PasswordHasher::from_config(), &config().security.superadmin).await?;

    match outcome {
        SeedOutcome::Created(user_name) => output_success(
            output_format,
            &format!("Super admin {} created", user_name),
            Some(json!({ "userName": user_name })),
        ),
        SeedOutcome::AlreadyPresent => output_success(output_format, "An admin account already exists", None),
        SeedOutcome::NotConfigured => {
            anyhow::bail!("SUPERADMIN_USERNAME and SUPERADMIN_PASSWORD must be set")
        }
    }
}
