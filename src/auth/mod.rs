//
//  cdek-client
//  auth/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/10/16.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! # Authentication Module
//!
//! The CDEK API authenticates integrations with the OAuth 2.0 client-credentials
//! grant: a client id/secret pair is exchanged for a short-lived bearer token,
//! which is then attached to every call.
//!
//! ## Module Structure
//!
//! - [`oauth`]: Token endpoint request/response handling
//! - [`keyring`]: Storage of the client secret in the system keyring
//!
//! ## Example
//!
//! ```rust
//! use cdek_client::auth::{AccessToken, Credentials};
//! use chrono::{Duration, Utc};
//!
//! let credentials = Credentials::new("client-id", "client-secret", false);
//! assert!(!credentials.test_mode);
//!
//! let token = AccessToken {
//!     access_token: "eyJhbGciOi...".to_string(),
//!     token_type: "bearer".to_string(),
//!     expires_at: Utc::now() + Duration::hours(1),
//! };
//! assert!(!token.is_expired());
//! ```

mod keyring;
mod oauth;

pub use keyring::*;
pub use oauth::*;

use chrono::{DateTime, Utc};
use md5::{Digest, Md5};
use reqwest::RequestBuilder;
use serde::{Deserialize, Serialize};

/// Client id of the provider's public sandbox account.
pub const SANDBOX_CLIENT_ID: &str = "EMscd6r9JnFiQ3bLoyjJY6eM78JrJceI";

/// Client secret of the provider's public sandbox account.
pub const SANDBOX_CLIENT_SECRET: &str = "PjLZkKBHEiLK3YsjtNrt3TGNG0ahs3kG";

/// Prefix of the cache key under which access tokens are stored.
pub const TOKEN_CACHE_KEY: &str = "cdek_access_token";

/// Integration credentials issued by CDEK.
///
/// Credentials are fixed for the lifetime of a client; build a new client to
/// switch accounts or environments.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// OAuth client id (the integration "account").
    pub client_id: String,
    /// OAuth client secret (the integration "secure password").
    pub client_secret: String,
    /// Route requests to the sandbox host instead of production.
    pub test_mode: bool,
}

impl Credentials {
    /// Creates credentials for the given account.
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        test_mode: bool,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            test_mode,
        }
    }

    /// The provider's public sandbox account, with test mode enabled.
    pub fn sandbox() -> Self {
        Self::new(SANDBOX_CLIENT_ID, SANDBOX_CLIENT_SECRET, true)
    }

    /// Whether both the id and the secret are present.
    pub fn is_complete(&self) -> bool {
        !self.client_id.trim().is_empty() && !self.client_secret.trim().is_empty()
    }

    /// The cache key owning this account's token.
    ///
    /// Two accounts (or the same account in both environments) sharing one
    /// cache store get distinct entries.
    pub fn token_cache_key(&self) -> String {
        let mut hasher = Md5::new();
        hasher.update(self.client_id.as_bytes());
        hasher.update(if self.test_mode { b":test" } else { b":prod" });
        let digest = format!("{:x}", hasher.finalize());
        format!("{}_{}", TOKEN_CACHE_KEY, &digest[..12])
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("test_mode", &self.test_mode)
            .finish()
    }
}

/// A bearer token obtained from the token endpoint.
///
/// This is also the JSON layout of the cached token entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    /// The token value sent as `Authorization: Bearer <token>`.
    pub access_token: String,
    /// Token type reported by the provider, normally `bearer`.
    pub token_type: String,
    /// Instant after which the token must not be used.
    pub expires_at: DateTime<Utc>,
}

impl AccessToken {
    /// Checks if the token has expired.
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }

    /// Adds the bearer header to a request.
    pub fn apply_to_request(&self, request: RequestBuilder) -> RequestBuilder {
        request.bearer_auth(&self.access_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_token_expiry() {
        let mut token = AccessToken {
            access_token: "t".to_string(),
            token_type: "bearer".to_string(),
            expires_at: Utc::now() - Duration::seconds(1),
        };
        assert!(token.is_expired());

        token.expires_at = Utc::now() + Duration::minutes(5);
        assert!(!token.is_expired());
    }

    #[test]
    fn test_cache_key_differs_per_environment() {
        let prod = Credentials::new("id", "secret", false);
        let test = Credentials::new("id", "secret", true);
        assert_ne!(prod.token_cache_key(), test.token_cache_key());
        assert!(prod.token_cache_key().starts_with(TOKEN_CACHE_KEY));
        assert_eq!(prod.token_cache_key(), prod.clone().token_cache_key());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let creds = Credentials::new("id", "very-secret", false);
        let printed = format!("{:?}", creds);
        assert!(!printed.contains("very-secret"));
    }

    #[test]
    fn test_sandbox_is_complete() {
        let creds = Credentials::sandbox();
        assert!(creds.test_mode);
        assert!(creds.is_complete());
        assert!(!Credentials::new("id", " ", false).is_complete());
    }
}
