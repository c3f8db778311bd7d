use anyhow::Context;
use serde_json::json;
use std::path::{Path, PathBuf};

use crate::auth::PasswordHasher;
use crate::cli::utils::{output_error, output_success};
use crate::cli::OutputFormat;
use crate::config::config;
use crate::database::DatabaseManager;
use crate::importer::{ImportOutcome, PgTeacherStore, TeacherImporter, ERROR_FILE_NAME};

/// Offline teacher import against the configured database
pub async fn handle(path: PathBuf, errors_out: Option<PathBuf>, output_format: OutputFormat) -> anyhow::Result<()> {
    let bytes = tokio::fs::read(&path)
        .await
        .with_context(|| format!("cannot read {}", path.display()))?;

    let pool = DatabaseManager::pool()?;
    let store = PgTeacherStore::new(pool);
    let importer = TeacherImporter::new(&store, &store, PasswordHasher::from_config(), config().import.clone());
    let outcome = importer.import_bytes(&bytes).await?;
    let message = outcome.message();

    match outcome {
        ImportOutcome::Committed { imported } => {
            output_success(output_format, &message, Some(json!({ "importedCount": imported })))
        }
        ImportOutcome::Rejected { errors, workbook } => {
            let target = errors_out.unwrap_or_else(|| default_errors_path(&path));
            tokio::fs::write(&target, workbook)
                .await
                .with_context(|| format!("cannot write {}", target.display()))?;

            if let OutputFormat::Text = output_format {
                for error in &errors {
                    eprintln!("  {}", error.message);
                }
            }
            output_error(
                output_format,
                &message,
                Some(json!({ "errors": errors, "errorFile": target.display().to_string() })),
            )?;
            anyhow::bail!("{} row(s) rejected, annotated file written to {}", errors.len(), target.display())
        }
    }
}

/// Next to the input: `<dir>/danh_sach_gv_loi.xlsx`
fn default_errors_path(input: &Path) -> PathBuf {
    input
        .parent()
        .map(|dir| dir.join(ERROR_FILE_NAME))
        .unwrap_or_else(|| PathBuf::from(ERROR_FILE_NAME))
}
