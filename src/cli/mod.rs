pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "school-admin")]
#[command(about = "Operator tools for the school administration backend")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Apply database migrations")]
    Migrate,

    #[command(about = "Create the super admin from SUPERADMIN_* when no admin exists")]
    SeedAdmin,

    #[command(about = "Import teachers from an .xlsx file")]
    Import {
        #[arg(help = "Path to the workbook")]
        path: PathBuf,

        #[arg(long, help = "Where to write the annotated workbook when rows are rejected")]
        errors_out: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Migrate => commands::migrate::handle(output_format).await,
        Commands::SeedAdmin => commands::seed::handle(output_format).await,
        Commands::Import { path, errors_out } => commands::import::handle(path, errors_out, output_format).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_import_arguments() {
        let cli = Cli::try_parse_from(["school-admin", "--json", "import", "gv.xlsx", "--errors-out", "loi.xlsx"]).unwrap();
        assert!(matches!(OutputFormat::from_cli(&cli), OutputFormat::Json));
        match cli.command {
            Commands::Import { path, errors_out } => {
                assert_eq!(path, PathBuf::from("gv.xlsx"));
                assert_eq!(errors_out, Some(PathBuf::from("loi.xlsx")));
            }
            _ => panic!("expected import"),
        }
        assert!(Cli::try_parse_from(["school-admin", "seed-admin"]).is_ok());
    }
}
