//
//  cdek-client
//  config/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/10/16.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! # Configuration Module
//!
//! Loading, saving and accessing the `cdek` settings file.
//!
//! ## Configuration File Location
//!
//! - **Linux**: `~/.config/cdek/config.toml`
//! - **macOS**: `~/Library/Application Support/cdek/config.toml`
//! - **Windows**: `C:\Users\<User>\AppData\Roaming\cdek\config.toml`
//!
//! Setting `CDEK_CONFIG_DIR` moves the file (and the token cache) to another
//! directory.
//!
//! ## Example Configuration File
//!
//! ```toml
//! [credentials]
//! client_id = "EMscd6r9JnFiQ3bLoyjJY6eM78JrJceI"
//! test_mode = true
//!
//! [core]
//! show_errors = true
//! timeout_secs = 30
//!
//! [sync]
//! database = "/var/lib/cdek/cdek.sqlite"
//! page_size = 500
//! countries = ["RU", "KZ"]
//! update_regions = true
//! update_cities = true
//! update_delivery_points = true
//! ```
//!
//! The client secret is better kept in the system keyring
//! (`cdek auth login`) than in this file.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use cdek_client::config::Config;
//!
//! let mut config = Config::load()?;
//! config.set("sync.countries", "RU,KZ".to_string())?;
//! config.save()?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::sync::{SyncOptions, ALL_COUNTRIES};

/// Environment variable overriding the configuration directory.
pub const CONFIG_DIR_ENV: &str = "CDEK_CONFIG_DIR";

/// Every key accepted by [`Config::get`] and [`Config::set`].
pub const CONFIG_KEYS: &[&str] = &[
    "credentials.client_id",
    "credentials.client_secret",
    "credentials.test_mode",
    "core.show_errors",
    "core.timeout_secs",
    "core.base_url",
    "sync.database",
    "sync.page_size",
    "sync.countries",
    "sync.update_regions",
    "sync.update_cities",
    "sync.update_delivery_points",
];

/// Global configuration container.
///
/// All sections use `#[serde(default)]`, so a partial file loads fine.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub credentials: CredentialsConfig,

    #[serde(default)]
    pub core: CoreConfig,

    #[serde(default)]
    pub sync: SyncConfig,
}

/// API account settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct CredentialsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,

    /// Plain-text secret. The keyring is consulted when this is absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,

    /// Talk to the sandbox instead of production.
    #[serde(default)]
    pub test_mode: bool,
}

/// General client behaviour.
///
/// | Field | Default |
/// |-------|---------|
/// | `show_errors` | `false` |
/// | `timeout_secs` | `30` |
/// | `base_url` | `None` (environment's host) |
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CoreConfig {
    /// Print provider errors to stderr as they happen.
    #[serde(default)]
    pub show_errors: bool,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Replaces the production/sandbox URL, e.g. for a proxy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            show_errors: false,
            timeout_secs: default_timeout_secs(),
            base_url: None,
        }
    }
}

/// Reference-data sync settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SyncConfig {
    /// SQLite file; defaults to `<data_dir>/cdek.sqlite`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,

    #[serde(default = "default_countries")]
    pub countries: Vec<String>,

    #[serde(default = "default_true")]
    pub update_regions: bool,

    #[serde(default = "default_true")]
    pub update_cities: bool,

    #[serde(default = "default_true")]
    pub update_delivery_points: bool,
}

fn default_countries() -> Vec<String> {
    vec![ALL_COUNTRIES.to_string()]
}

fn default_true() -> bool {
    true
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            database: None,
            page_size: None,
            countries: default_countries(),
            update_regions: true,
            update_cities: true,
            update_delivery_points: true,
        }
    }
}

impl SyncConfig {
    /// Sync options described by these settings.
    pub fn to_options(&self) -> SyncOptions {
        SyncOptions {
            update_regions: self.update_regions,
            update_cities: self.update_cities,
            update_delivery_points: self.update_delivery_points,
            page_size: self.page_size,
            countries: self.countries.clone(),
        }
    }
}

impl Config {
    /// Loads the configuration file, or defaults when there is none.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            toml::from_str(&content).with_context(|| format!("Invalid config file {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV) {
            return Ok(PathBuf::from(dir).join("config.toml"));
        }
        Ok(project_dirs()?.config_dir().join("config.toml"))
    }

    pub fn data_dir() -> Result<PathBuf> {
        if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV) {
            return Ok(PathBuf::from(dir).join("data"));
        }
        Ok(project_dirs()?.data_dir().to_path_buf())
    }

    /// Directory of the file cache shared by `cdek` invocations.
    pub fn cache_dir() -> Result<PathBuf> {
        if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV) {
            return Ok(PathBuf::from(dir).join("cache"));
        }
        Ok(project_dirs()?.cache_dir().to_path_buf())
    }

    /// The reference database, configured or default.
    pub fn database_path(&self) -> Result<PathBuf> {
        match &self.sync.database {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::data_dir()?.join("cdek.sqlite")),
        }
    }

    /// Reads a setting by dotted key.
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "credentials.client_id" => self.credentials.client_id.clone(),
            "credentials.client_secret" => self.credentials.client_secret.clone(),
            "credentials.test_mode" => Some(self.credentials.test_mode.to_string()),
            "core.show_errors" => Some(self.core.show_errors.to_string()),
            "core.timeout_secs" => Some(self.core.timeout_secs.to_string()),
            "core.base_url" => self.core.base_url.clone(),
            "sync.database" => self.sync.database.as_ref().map(|p| p.display().to_string()),
            "sync.page_size" => self.sync.page_size.map(|s| s.to_string()),
            "sync.countries" => Some(self.sync.countries.join(",")),
            "sync.update_regions" => Some(self.sync.update_regions.to_string()),
            "sync.update_cities" => Some(self.sync.update_cities.to_string()),
            "sync.update_delivery_points" => Some(self.sync.update_delivery_points.to_string()),
            _ => None,
        }
    }

    /// Writes a setting by dotted key.
    ///
    /// Returns `Ok(false)` for an unknown key and an error for a value of the
    /// wrong type.
    pub fn set(&mut self, key: &str, value: String) -> Result<bool> {
        match key {
            "credentials.client_id" => self.credentials.client_id = non_empty(value),
            "credentials.client_secret" => self.credentials.client_secret = non_empty(value),
            "credentials.test_mode" => self.credentials.test_mode = parse_bool(key, &value)?,
            "core.show_errors" => self.core.show_errors = parse_bool(key, &value)?,
            "core.timeout_secs" => {
                self.core.timeout_secs = value
                    .trim()
                    .parse()
                    .with_context(|| format!("{key} must be a number of seconds"))?
            }
            "core.base_url" => {
                if !value.is_empty() {
                    url::Url::parse(&value).with_context(|| format!("{key} must be a URL"))?;
                }
                self.core.base_url = non_empty(value)
            }
            "sync.database" => self.sync.database = non_empty(value).map(PathBuf::from),
            "sync.page_size" => {
                self.sync.page_size = if value.trim().is_empty() {
                    None
                } else {
                    Some(
                        value
                            .trim()
                            .parse()
                            .with_context(|| format!("{key} must be a positive number"))?,
                    )
                }
            }
            "sync.countries" => {
                self.sync.countries = value
                    .split(',')
                    .map(|c| c.trim().to_string())
                    .filter(|c| !c.is_empty())
                    .collect()
            }
            "sync.update_regions" => self.sync.update_regions = parse_bool(key, &value)?,
            "sync.update_cities" => self.sync.update_cities = parse_bool(key, &value)?,
            "sync.update_delivery_points" => {
                self.sync.update_delivery_points = parse_bool(key, &value)?
            }
            _ => return Ok(false),
        }
        Ok(true)
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("", "", "cdek")
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        other => bail!("{key} must be true or false, got '{other}'"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(!config.credentials.test_mode);
        assert_eq!(config.core.timeout_secs, 30);
        assert_eq!(config.sync.countries, vec!["--".to_string()]);
        assert!(config.sync.to_options().country_filter().is_none());
    }

    #[test]
    fn test_partial_file_loads() {
        let config: Config = toml::from_str("[sync]\npage_size = 100\n").unwrap();
        assert_eq!(config.sync.page_size, Some(100));
        assert!(config.sync.update_cities);
        assert_eq!(config.core.timeout_secs, 30);
    }

    #[test]
    fn test_get_set_round_trip() {
        let mut config = Config::default();
        assert!(config.set("sync.countries", "RU, KZ".to_string()).unwrap());
        assert!(config.set("credentials.test_mode", "yes".to_string()).unwrap());
        assert!(config.set("sync.page_size", "250".to_string()).unwrap());

        assert_eq!(config.get("sync.countries").as_deref(), Some("RU,KZ"));
        assert_eq!(config.get("credentials.test_mode").as_deref(), Some("true"));
        assert_eq!(config.sync.to_options().page_size, Some(250));
    }

    #[test]
    fn test_set_rejects_bad_values() {
        let mut config = Config::default();
        assert!(!config.set("core.editor", "vim".to_string()).unwrap());
        assert!(config.set("core.show_errors", "maybe".to_string()).is_err());
        assert!(config.set("core.timeout_secs", "soon".to_string()).is_err());
        assert!(config.set("core.base_url", "not a url".to_string()).is_err());
    }

    #[test]
    fn test_every_key_is_readable() {
        let mut config = Config::default();
        config.credentials.client_id = Some("id".into());
        config.credentials.client_secret = Some("secret".into());
        config.core.base_url = Some("http://localhost".into());
        config.sync.database = Some(PathBuf::from("/tmp/cdek.sqlite"));
        config.sync.page_size = Some(10);
        for key in CONFIG_KEYS {
            assert!(config.get(key).is_some(), "{key} not readable");
        }
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.set("credentials.client_id", "abc".to_string()).unwrap();
        config.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), config);
        assert_eq!(Config::load_from(&dir.path().join("missing.toml")).unwrap(), Config::default());
    }
}
