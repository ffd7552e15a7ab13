//! Command-line interface

pub mod commands;
pub mod console;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::config::Config;
use commands::auth::AuthCommands;
use commands::catalog::CatalogArgs;
use commands::import::ImportArgs;

#[derive(Parser)]
#[command(
    name = "stockroom",
    version,
    about = "Stockroom inventory client",
    long_about = "Bulk-import spreadsheets of items into the Stockroom inventory.\n\n\
                  Rows are previewed, corrected and then created one by one."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Override the API base URL for this run
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in, log out or show the current session
    #[command(subcommand)]
    Auth(AuthCommands),

    /// List a lookup catalog
    Catalog(CatalogArgs),

    /// Preview, correct and import a spreadsheet of items
    Import(ImportArgs),
}

impl Cli {
    /// Log filter for the requested verbosity
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

/// Dispatch a parsed command line
pub async fn run(cli: Cli) -> Result<()> {
    if cli.no_color {
        colored::control::set_override(false);
    }

    let mut config = Config::load()?;
    if let Some(url) = &cli.api_url {
        config.set_base_url(url);
    }
    log::debug!("Using API at {}", config.api.base_url);

    match cli.command {
        Commands::Auth(cmd) => commands::auth::handler::handle_auth_command(cmd, &config).await,
        Commands::Catalog(args) => {
            commands::catalog::handler::handle_catalog_command(args, &config).await
        }
        Commands::Import(args) => {
            commands::import::handler::handle_import_command(args, &config).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_parse_import_command() {
        let cli = Cli::parse_from([
            "stockroom",
            "-vv",
            "import",
            "items.xlsx",
            "--local",
            "--category",
            "Power tools",
            "--yes",
            "--report",
            "out.xlsx",
        ]);
        assert_eq!(cli.log_level(), "debug");
        match cli.command {
            Commands::Import(args) => {
                assert_eq!(args.file, PathBuf::from("items.xlsx"));
                assert!(args.local);
                assert!(args.yes);
                assert_eq!(args.category.as_deref(), Some("Power tools"));
                assert_eq!(args.location, None);
                assert_eq!(args.report, Some(PathBuf::from("out.xlsx")));
            }
            _ => panic!("expected import command"),
        }
    }

    #[test]
    fn test_parse_auth_and_catalog() {
        let cli = Cli::parse_from(["stockroom", "auth", "login", "--email", "ops@example.com"]);
        assert!(matches!(
            cli.command,
            Commands::Auth(AuthCommands::Login { email: Some(_) })
        ));
        assert_eq!(cli.log_level(), "warn");

        let cli = Cli::parse_from(["stockroom", "catalog", "specs", "--json"]);
        match cli.command {
            Commands::Catalog(args) => assert!(args.json),
            _ => panic!("expected catalog command"),
        }
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
