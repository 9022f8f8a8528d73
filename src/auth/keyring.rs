//
//  cdek-client
//  auth/keyring.rs
//
//  Created by Ngonidzashe Mangudya on 2026/10/16.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! # Client Secret Storage
//!
//! Keeps the integration's client secret in the system keyring so it does not
//! have to sit in `config.toml`.
//!
//! - **Service**: `cdek-client`
//! - **Username/Key**: the client id
//! - **Password/Value**: the client secret
//!
//! ## Example
//!
//! ```rust,no_run
//! use cdek_client::auth::KeyringStore;
//!
//! fn remember_secret() -> anyhow::Result<()> {
//!     let store = KeyringStore::new();
//!     store.store("my-client-id", "my-client-secret")?;
//!
//!     if let Some(secret) = store.get("my-client-id")? {
//!         println!("secret has {} characters", secret.len());
//!     }
//!
//!     store.delete("my-client-id")?;
//!     Ok(())
//! }
//! ```

use anyhow::Result;
use keyring::Entry;

/// The service name used to identify this application in the system keyring.
const SERVICE_NAME: &str = "cdek-client";

/// Client secret storage backed by the platform keyring.
pub struct KeyringStore {
    service: String,
}

impl Default for KeyringStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyringStore {
    /// Creates a store under the default service name.
    pub fn new() -> Self {
        Self {
            service: SERVICE_NAME.to_string(),
        }
    }

    /// Stores the secret for a client id, replacing any previous value.
    pub fn store(&self, client_id: &str, secret: &str) -> Result<()> {
        let entry = Entry::new(&self.service, client_id)?;
        entry.set_password(secret)?;
        Ok(())
    }

    /// Returns the secret for a client id, if one is stored.
    pub fn get(&self, client_id: &str) -> Result<Option<String>> {
        let entry = Entry::new(&self.service, client_id)?;
        match entry.get_password() {
            Ok(secret) => Ok(Some(secret)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Removes the secret for a client id. Missing entries are not an error.
    pub fn delete(&self, client_id: &str) -> Result<()> {
        let entry = Entry::new(&self.service, client_id)?;
        match entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
