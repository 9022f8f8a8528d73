//
//  cdek-client
//  lib.rs
//
//  Created by Ngonidzashe Mangudya on 2026/10/16.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! # CDEK Client Library
//!
//! A client for the CDEK delivery API v2 and a sync job that mirrors its
//! reference data (regions, cities, delivery points) into SQLite.
//!
//! ## Overview
//!
//! This library powers the `cdek` CLI and can be embedded directly. Every API
//! call goes through one [`CdekClient`], which obtains an OAuth token with
//! the client-credentials grant, caches it, strips empty parameters and maps
//! failures into a uniform error. Resource handlers (orders, calculator,
//! locations, delivery points, webhooks, intakes, print forms, payments) sit
//! on top of it and are reached through the [`Cdek`] facade.
//!
//! ## Module Structure
//!
//! - [`cli`]: Command-line interface definitions using clap
//! - [`api`]: HTTP client, error mapping and parameter handling
//! - [`auth`]: Credentials, access tokens, keyring storage
//! - [`cache`]: Key/value cache used for tokens and delivery-point lists
//! - [`entities`]: One handler per API resource
//! - [`facade`]: Entity registry and typed accessors
//! - [`actions`]: Named host actions returning a success/error envelope
//! - [`tariffs`]: Built-in tariff catalogs
//! - [`store`]: Reference tables and their SQLite implementation
//! - [`sync`]: Paginated truncate-and-reload job
//! - [`config`]: Configuration file management
//! - [`output`]: Table and JSON output
//! - [`interactive`]: Prompts used by `cdek auth login`
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use cdek_client::{Cdek, CdekClient};
//! use cdek_client::auth::Credentials;
//! use serde_json::json;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let cdek = Cdek::new(CdekClient::new(Credentials::sandbox())?);
//!
//! let points = cdek
//!     .delivery_points()
//!     .list(&json!({ "city_code": 44 }))
//!     .await?;
//! println!("{} pickup points", points.as_array().map_or(0, Vec::len));
//! # Ok(())
//! # }
//! ```
//!
//! ## Environments
//!
//! | Mode | Base URL |
//! |------|----------|
//! | Production | `https://api.cdek.ru/v2` |
//! | Test | `https://api.edu.cdek.ru/v2` |

/// Command-line interface definitions.
///
/// Each command module parses its arguments and drives the library types
/// below.
pub mod cli;

/// HTTP client for the CDEK API.
pub mod api;

/// Credentials, access tokens and secret storage.
pub mod auth;

/// Token and response caching.
pub mod cache;

/// Configuration file management.
///
/// - Linux: `~/.config/cdek/config.toml`
/// - macOS: `~/Library/Application Support/cdek/config.toml`
/// - Windows: `%APPDATA%\cdek\config.toml`
pub mod config;

pub mod entities;

pub mod facade;

pub mod actions;

pub mod tariffs;

/// Reference-data persistence.
pub mod store;

/// Reference-data sync.
pub mod sync;

/// Output formatting (table and JSON).
pub mod output;

/// Interactive terminal prompts.
pub mod interactive;

pub use api::CdekClient;
pub use cli::Cli;
pub use config::Config;
pub use facade::Cdek;

/// Name of the binary, used for completions and display.
pub const APP_NAME: &str = "cdek";

/// Crate version, also sent in the `User-Agent` header.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Exit codes for the CLI.
///
/// ```rust,no_run
/// use cdek_client::exit_codes;
///
/// std::process::exit(exit_codes::ERROR);
/// ```
pub mod exit_codes {
    /// The command completed without errors.
    pub const SUCCESS: i32 = 0;

    /// Any failure: API error, failed or partial sync, bad input.
    pub const ERROR: i32 = 1;

    /// Invalid arguments (reported by clap).
    pub const USAGE: i32 = 2;
}
