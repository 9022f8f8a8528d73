//
//  cdek-client
//  cli/auth.rs
//
//  Created by Ngonidzashe Mangudya on 2026/10/16.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! Authentication commands
//!
//! ```bash
//! # Store an account; the secret goes to the system keyring
//! cdek auth login --client-id EMscd6r9JnFiQ3bLoyjJY6eM78JrJceI --test
//!
//! # Script-friendly: read the secret from stdin
//! echo "$SECRET" | cdek auth login --client-id ID --with-secret
//!
//! # Obtain (or reuse) a token and show when it expires
//! cdek auth status
//!
//! # Forget the secret and the cached token
//! cdek auth logout
//! ```

use std::io::BufRead;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use clap::{Args, Subcommand};
use serde::Serialize;
use serde_json::json;

use crate::auth::{Credentials, KeyringStore};
use crate::config::Config;
use crate::interactive::{can_prompt, prompt_confirm_with_default, prompt_input, prompt_password};
use crate::output::{format_bool, print_field, print_header, OutputWriter, TableOutput};

use super::session::{build_client, resolve_credentials};
use super::GlobalOptions;

#[derive(Args, Debug)]
pub struct AuthCommand {
    #[command(subcommand)]
    pub command: AuthSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum AuthSubcommand {
    /// Store API credentials
    Login(LoginArgs),

    /// Remove stored credentials and the cached token
    Logout,

    /// Authorize and show token details
    Status,
}

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Read the client secret from stdin
    #[arg(long)]
    pub with_secret: bool,

    /// Store the secret in config.toml instead of the keyring
    #[arg(long)]
    pub plain: bool,

    /// Skip the test authorization after storing
    #[arg(long)]
    pub no_verify: bool,
}

impl AuthCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            AuthSubcommand::Login(args) => login(args, global).await,
            AuthSubcommand::Logout => logout(global).await,
            AuthSubcommand::Status => status(global).await,
        }
    }
}

async fn login(args: &LoginArgs, global: &GlobalOptions) -> Result<()> {
    let mut config = Config::load()?;
    let writer = OutputWriter::from_flag(global.json);

    let client_id = match global
        .client_id
        .clone()
        .or_else(|| config.credentials.client_id.clone())
    {
        Some(id) => id,
        None if can_prompt() => prompt_input("Client id (account):", None)?,
        None => bail!("--client-id is required when not running interactively"),
    };
    let client_id = client_id.trim().to_string();
    if client_id.is_empty() {
        bail!("Client id cannot be empty");
    }

    let secret = if let Some(secret) = &global.client_secret {
        secret.clone()
    } else if args.with_secret {
        read_secret_from_stdin()?
    } else if can_prompt() {
        prompt_password("Client secret (secure password):")?
    } else {
        bail!("Pass --with-secret and pipe the secret on stdin when not running interactively");
    };
    if secret.is_empty() {
        bail!("Client secret cannot be empty");
    }

    let test_mode = global.test || config.credentials.test_mode;

    if !args.no_verify {
        let credentials = Credentials::new(client_id.clone(), secret.clone(), test_mode);
        let client = build_client(global, &config, credentials)?;
        client
            .authorize()
            .await
            .map_err(|e| anyhow::anyhow!("Authorization failed: {}", e.error_message()))?;
    }

    if args.plain {
        config.credentials.client_secret = Some(secret);
    } else {
        KeyringStore::new()
            .store(&client_id, &secret)
            .context("Failed to store the secret in the keyring (use --plain to keep it in config.toml)")?;
        config.credentials.client_secret = None;
    }
    config.credentials.client_id = Some(client_id.clone());
    config.credentials.test_mode = test_mode;
    config.save()?;

    if global.json {
        writer.write_value(&json!({
            "success": true,
            "client_id": client_id,
            "test_mode": test_mode,
            "verified": !args.no_verify,
        }))?;
    } else {
        let env = if test_mode { "sandbox" } else { "production" };
        writer.write_success(&format!("Stored credentials for {} ({})", client_id, env));
    }
    Ok(())
}

async fn logout(global: &GlobalOptions) -> Result<()> {
    let mut config = Config::load()?;
    let writer = OutputWriter::from_flag(global.json);

    let Some(client_id) = global
        .client_id
        .clone()
        .or_else(|| config.credentials.client_id.clone())
    else {
        writer.write_info("Not logged in");
        return Ok(());
    };

    if !global.json
        && can_prompt()
        && !prompt_confirm_with_default(&format!("Log out {}?", client_id), true)?
    {
        return Ok(());
    }

    // Forget the token of both environments
    for test_mode in [false, true] {
        let credentials = Credentials::new(client_id.clone(), "", test_mode);
        build_client(global, &config, credentials)?.forget_token();
    }

    KeyringStore::new().delete(&client_id)?;
    config.credentials.client_secret = None;
    config.save()?;

    if global.json {
        writer.write_value(&json!({"success": true, "client_id": client_id}))?;
    } else {
        writer.write_success(&format!("Logged out {}", client_id));
    }
    Ok(())
}

/// What `cdek auth status` reports.
#[derive(Debug, Serialize)]
struct TokenStatus {
    client_id: String,
    test_mode: bool,
    base_url: String,
    token_type: String,
    expires_at: DateTime<Utc>,
}

impl TableOutput for TokenStatus {
    fn print_table(&self, color: bool) {
        print_header("CDEK authorization");
        print_field("Client id", &self.client_id, color);
        print_field("Test mode", &format_bool(self.test_mode, color), color);
        print_field("API", &self.base_url, color);
        print_field("Token type", &self.token_type, color);
        print_field("Expires at", &self.expires_at.to_rfc3339(), color);
    }
}

async fn status(global: &GlobalOptions) -> Result<()> {
    let config = Config::load()?;
    let credentials = resolve_credentials(global, &config)?;
    let client = build_client(global, &config, credentials)?;

    let token = client
        .access_token()
        .await
        .map_err(|e| anyhow::anyhow!("Authorization failed: {}", e.error_message()))?;

    let status = TokenStatus {
        client_id: client.credentials().client_id.clone(),
        test_mode: client.credentials().test_mode,
        base_url: client.base_url().to_string(),
        token_type: token.token_type,
        expires_at: token.expires_at,
    };
    OutputWriter::from_flag(global.json).write(&status)
}

fn read_secret_from_stdin() -> Result<String> {
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read the secret from stdin")?;
    Ok(line.trim().to_string())
}
