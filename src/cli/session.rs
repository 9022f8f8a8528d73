//
//  cdek-client
//  cli/session.rs
//
//  Created by Ngonidzashe Mangudya on 2026/10/16.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! Turns global options and the config file into a ready client.
//!
//! # Credential Resolution
//!
//! | Credential | Order |
//! |------------|-------|
//! | client id | `--client-id` / `CDEK_CLIENT_ID`, then `credentials.client_id` |
//! | secret | `--client-secret` / `CDEK_CLIENT_SECRET`, then `credentials.client_secret`, then keyring |
//! | test mode | `--test` / `CDEK_TEST_MODE`, or `credentials.test_mode` |
//!
//! `--sandbox` skips all of this and uses the provider's public test account.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};

use crate::api::client::LOG_TARGET;
use crate::api::{CdekClient, StderrSink};
use crate::auth::{Credentials, KeyringStore};
use crate::cache::FileCache;
use crate::config::Config;
use crate::facade::Cdek;

use super::GlobalOptions;

/// A loaded configuration plus a client built from it.
pub struct Session {
    pub config: Config,
    pub cdek: Cdek,
}

impl Session {
    /// Loads the config file and builds the client.
    pub fn open(global: &GlobalOptions) -> Result<Self> {
        let config = Config::load()?;
        let credentials = resolve_credentials(global, &config)?;
        let client = build_client(global, &config, credentials)?;
        Ok(Self {
            config,
            cdek: Cdek::new(client),
        })
    }

    pub fn client(&self) -> &CdekClient {
        self.cdek.client()
    }
}

/// Picks credentials from flags, config and keyring.
pub fn resolve_credentials(global: &GlobalOptions, config: &Config) -> Result<Credentials> {
    if global.sandbox {
        return Ok(Credentials::sandbox());
    }

    let Some(client_id) = global
        .client_id
        .clone()
        .or_else(|| config.credentials.client_id.clone())
        .filter(|id| !id.trim().is_empty())
    else {
        bail!("No client id configured. Run 'cdek auth login', pass --client-id, or use --sandbox");
    };

    let secret = match global
        .client_secret
        .clone()
        .or_else(|| config.credentials.client_secret.clone())
    {
        Some(secret) => Some(secret),
        None => KeyringStore::new().get(&client_id)?,
    };

    let Some(client_secret) = secret.filter(|s| !s.is_empty()) else {
        bail!(
            "No client secret found for {}. Run 'cdek auth login' or pass --client-secret",
            client_id
        );
    };

    let test_mode = global.test || config.credentials.test_mode;
    Ok(Credentials::new(client_id, client_secret, test_mode))
}

/// Builds a client that caches its token on disk.
pub fn build_client(
    global: &GlobalOptions,
    config: &Config,
    credentials: Credentials,
) -> Result<CdekClient> {
    let mut client = CdekClient::new(credentials)?
        .with_timeout(Duration::from_secs(config.core.timeout_secs))?
        .with_cache(Arc::new(FileCache::new(Config::cache_dir()?)));

    if let Some(base_url) = global.base_url.as_ref().or(config.core.base_url.as_ref()) {
        client = client.with_base_url(base_url)?;
    }

    if config.core.show_errors {
        client = client.with_error_sink(Arc::new(StderrSink));
    }

    tracing::debug!(target: LOG_TARGET, base_url = client.base_url(), "Client ready");
    Ok(client)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sandbox_wins() {
        let global = GlobalOptions {
            sandbox: true,
            ..Default::default()
        };
        let credentials = resolve_credentials(&global, &Config::default()).unwrap();
        assert!(credentials.test_mode);
        assert_eq!(credentials, Credentials::sandbox());
    }

    #[test]
    fn test_flags_override_config() {
        let mut config = Config::default();
        config.credentials.client_id = Some("from-config".into());
        config.credentials.client_secret = Some("config-secret".into());

        let global = GlobalOptions {
            client_id: Some("from-flag".into()),
            client_secret: Some("flag-secret".into()),
            test: true,
            ..Default::default()
        };
        let credentials = resolve_credentials(&global, &config).unwrap();
        assert_eq!(credentials.client_id, "from-flag");
        assert_eq!(credentials.client_secret, "flag-secret");
        assert!(credentials.test_mode);
    }

    #[test]
    fn test_config_secret_is_used() {
        let mut config = Config::default();
        config.credentials.client_id = Some("id".into());
        config.credentials.client_secret = Some("secret".into());
        config.credentials.test_mode = true;

        let credentials = resolve_credentials(&GlobalOptions::default(), &config).unwrap();
        assert_eq!(credentials.client_secret, "secret");
        assert!(credentials.test_mode);
    }

    #[test]
    fn test_missing_client_id() {
        let err = resolve_credentials(&GlobalOptions::default(), &Config::default()).unwrap_err();
        assert!(err.to_string().contains("No client id"));
    }
}
