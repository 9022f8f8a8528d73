//
//  cdek-client
//  cli/config.rs
//
//  Created by Ngonidzashe Mangudya on 2026/10/16.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! Configuration commands
//!
//! ```bash
//! cdek config set sync.countries RU,KZ
//! cdek config get core.timeout_secs
//! cdek config unset core.base_url
//! cdek config list
//! cdek config path
//! ```

use std::process::Command;

use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use console::style;
use serde_json::{json, Map, Value};

use crate::config::{Config, CONFIG_KEYS};

use super::GlobalOptions;

const SECRET_KEYS: &[&str] = &["credentials.client_secret"];

#[derive(Args, Debug)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigSubcommand {
    /// Print one setting
    Get(KeyArgs),

    /// Change one setting
    Set(SetArgs),

    /// Reset one setting to its default
    Unset(KeyArgs),

    /// Print every setting
    #[command(visible_alias = "ls")]
    List,

    /// Open the config file in $EDITOR
    Edit,

    /// Print the config file location
    Path,
}

#[derive(Args, Debug)]
pub struct KeyArgs {
    /// Dotted key, e.g. core.timeout_secs
    pub key: String,
}

#[derive(Args, Debug)]
pub struct SetArgs {
    /// Dotted key, e.g. core.timeout_secs
    pub key: String,

    /// New value
    pub value: String,
}

impl ConfigCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            ConfigSubcommand::Get(args) => self.get(args, global).await,
            ConfigSubcommand::Set(args) => self.set(args, global).await,
            ConfigSubcommand::Unset(args) => self.unset(args, global).await,
            ConfigSubcommand::List => self.list(global).await,
            ConfigSubcommand::Edit => self.edit().await,
            ConfigSubcommand::Path => self.path(global).await,
        }
    }

    async fn get(&self, args: &KeyArgs, global: &GlobalOptions) -> Result<()> {
        check_key(&args.key)?;
        let config = Config::load()?;
        let value = config.get(&args.key);

        if global.json {
            let result = json!({
                "key": args.key,
                "value": value,
            });
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else if let Some(v) = value {
            println!("{}", v);
        }

        Ok(())
    }

    async fn set(&self, args: &SetArgs, global: &GlobalOptions) -> Result<()> {
        check_key(&args.key)?;
        let mut config = Config::load()?;
        config.set(&args.key, args.value.clone())?;
        config.save()?;

        let shown = display_value(&args.key, Some(args.value.clone()));
        if global.json {
            let result = json!({
                "success": true,
                "key": args.key,
                "value": shown,
            });
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else {
            println!(
                "{} Set {} = {}",
                style("✓").green(),
                style(&args.key).cyan(),
                shown.unwrap_or_default()
            );
        }

        Ok(())
    }

    async fn unset(&self, args: &KeyArgs, global: &GlobalOptions) -> Result<()> {
        check_key(&args.key)?;
        let mut config = Config::load()?;
        let default = Config::default().get(&args.key).unwrap_or_default();
        config.set(&args.key, default)?;
        config.save()?;

        if global.json {
            let result = json!({
                "success": true,
                "key": args.key,
                "value": config.get(&args.key),
            });
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else {
            println!("{} Unset {}", style("✓").green(), style(&args.key).cyan());
        }

        Ok(())
    }

    async fn list(&self, global: &GlobalOptions) -> Result<()> {
        let config = Config::load()?;
        let entries = list_entries(&config);

        if global.json {
            let result: Map<String, Value> = entries
                .into_iter()
                .map(|(key, value)| (key.to_string(), json!(value)))
                .collect();
            println!("{}", serde_json::to_string_pretty(&result)?);
            return Ok(());
        }

        let mut section = "";
        for (key, value) in entries {
            let (group, name) = key.split_once('.').unwrap_or(("", key));
            if group != section {
                section = group;
                println!();
                println!("{}", style(format!("[{}]", group)).bold());
            }
            match value {
                Some(v) => println!("  {} = {}", style(name).cyan(), v),
                None => println!("  {} = {}", style(name).cyan(), style("(not set)").dim()),
            }
        }
        println!();

        Ok(())
    }

    async fn edit(&self) -> Result<()> {
        let path = Config::config_path()?;
        if !path.exists() {
            Config::load()?.save_to(&path)?;
        }

        let editor = std::env::var("VISUAL")
            .or_else(|_| std::env::var("EDITOR"))
            .unwrap_or_else(|_| "vi".to_string());

        let status = Command::new(&editor).arg(&path).status()?;
        if !status.success() {
            bail!("{} exited with {}", editor, status);
        }

        // Reject edits that no longer parse
        Config::load_from(&path)?;
        Ok(())
    }

    async fn path(&self, global: &GlobalOptions) -> Result<()> {
        let path = Config::config_path()?;

        if global.json {
            let result = json!({
                "path": path.display().to_string(),
                "exists": path.exists(),
            });
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else {
            println!("{}", path.display());
        }

        Ok(())
    }
}

fn check_key(key: &str) -> Result<()> {
    if !CONFIG_KEYS.contains(&key) {
        bail!(
            "Unknown configuration key '{}'. Valid keys: {}",
            key,
            CONFIG_KEYS.join(", ")
        );
    }
    Ok(())
}

fn display_value(key: &str, value: Option<String>) -> Option<String> {
    match value {
        Some(v) if SECRET_KEYS.contains(&key) && !v.is_empty() => Some("********".to_string()),
        other => other,
    }
}

fn list_entries(config: &Config) -> Vec<(&'static str, Option<String>)> {
    CONFIG_KEYS
        .iter()
        .map(|key| (*key, display_value(key, config.get(key))))
        .collect()
}
