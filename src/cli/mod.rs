//
//  cdek-client
//  cli/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/10/16.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! # Command-Line Interface
//!
//! Argument definitions for the `cdek` binary, built with clap's derive API.
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `auth` | Store credentials, check or drop the access token |
//! | `offices` | List pickup points |
//! | `calculate` | Price a shipment |
//! | `action` | Raw host-action dispatcher output |
//! | `tariffs` | Print the tariff catalogs |
//! | `api` | Send a raw request |
//! | `sync` | Mirror regions, cities and pickup points into SQLite |
//! | `config` | Read and write settings |
//! | `completion` | Shell completion scripts |
//!
//! ## Global Options
//!
//! | Flag | Environment | Description |
//! |------|-------------|-------------|
//! | `--client-id` | `CDEK_CLIENT_ID` | API account |
//! | `--client-secret` | `CDEK_CLIENT_SECRET` | API secret |
//! | `--test` | `CDEK_TEST_MODE` | Use the sandbox API |
//! | `--sandbox` | | Use the provider's public test account |
//! | `--base-url` | `CDEK_BASE_URL` | Send requests to another host |
//! | `--json` | | JSON output |

mod action;
mod api;
mod auth;
mod calculate;
mod completion;
mod config;
mod offices;
mod session;
mod sync;
mod tariffs;

pub use action::ActionCommand;
pub use api::ApiCommand;
pub use auth::AuthCommand;
pub use calculate::CalculateCommand;
pub use completion::CompletionCommand;
pub use config::ConfigCommand;
pub use offices::OfficesCommand;
pub use session::Session;
pub use sync::SyncCommand;
pub use tariffs::TariffsCommand;

use clap::{Parser, Subcommand};

/// Main CLI structure
#[derive(Parser, Debug)]
#[command(
    name = "cdek",
    version,
    about = "Work with the CDEK delivery API from the command line",
    long_about = "cdek is a client for the CDEK delivery API v2.\n\n\
                  It lists pickup points, prices shipments, sends raw API requests \
                  and mirrors reference data into a local SQLite database.",
    propagate_version = true,
    after_help = "Use 'cdek <command> --help' for more information about a command."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOptions,
}

/// Options shared by every command
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOptions {
    /// API client id
    #[arg(long, global = true, env = "CDEK_CLIENT_ID")]
    pub client_id: Option<String>,

    /// API client secret
    #[arg(long, global = true, env = "CDEK_CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: Option<String>,

    /// Use the sandbox API
    #[arg(long, global = true, env = "CDEK_TEST_MODE")]
    pub test: bool,

    /// Use the provider's public sandbox account
    #[arg(long, global = true, conflicts_with_all = ["client_id", "client_secret"])]
    pub sandbox: bool,

    /// Send requests to this base URL instead of the provider's host
    #[arg(long, global = true, env = "CDEK_BASE_URL")]
    pub base_url: Option<String>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage API credentials
    #[command(visible_alias = "login")]
    Auth(AuthCommand),

    /// List pickup points
    #[command(visible_alias = "pvz")]
    Offices(OfficesCommand),

    /// Price a shipment
    #[command(visible_alias = "calc")]
    Calculate(CalculateCommand),

    /// Run a host action and print its response envelope
    Action(ActionCommand),

    /// Show the tariff catalogs
    Tariffs(TariffsCommand),

    /// Make an authenticated API request
    Api(ApiCommand),

    /// Mirror reference data into SQLite
    Sync(SyncCommand),

    /// Manage configuration
    Config(ConfigCommand),

    /// Generate shell completion scripts
    Completion(CompletionCommand),

    /// Show version information
    Version,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_sandbox_conflicts_with_client_id() {
        let parsed = Cli::try_parse_from(["cdek", "--sandbox", "--client-id", "x", "tariffs"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["cdek", "tariffs", "--json", "--code", "136"]).unwrap();
        assert!(cli.global.json);
        assert!(matches!(cli.command, Commands::Tariffs(_)));
    }
}
