//
//  cdek-client
//  auth/oauth.rs
//
//  Created by Ngonidzashe Mangudya on 2026/10/16.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! # OAuth 2.0 Client-Credentials Grant
//!
//! CDEK issues tokens from `POST /oauth/token` with a form-encoded body:
//!
//! ```text
//! grant_type=client_credentials&client_id=<id>&client_secret=<secret>
//! ```
//!
//! and answers with:
//!
//! ```json
//! {"access_token": "eyJ...", "token_type": "bearer", "expires_in": 3599, "scope": "order:all payment:all", "jti": "..."}
//! ```
//!
//! The request itself is sent by [`CdekClient::authorize`](crate::api::CdekClient::authorize);
//! this module only knows the wire format.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::{AccessToken, Credentials};

/// Path of the token endpoint, relative to the API base URL.
pub const TOKEN_PATH: &str = "/oauth/token";

/// Shortest lifetime a cached token entry is given.
pub const MIN_TOKEN_TTL: Duration = Duration::from_secs(60);

/// Builds the form body of a client-credentials grant.
pub fn grant_params(credentials: &Credentials) -> [(&'static str, &str); 3] {
    [
        ("grant_type", "client_credentials"),
        ("client_id", &credentials.client_id),
        ("client_secret", &credentials.client_secret),
    ]
}

/// Successful response of the token endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    /// The bearer token.
    pub access_token: String,
    /// Normally `bearer`.
    #[serde(default = "default_token_type")]
    pub token_type: String,
    /// Token lifetime in seconds.
    #[serde(default)]
    pub expires_in: u64,
    /// Space-separated scopes granted to the integration.
    #[serde(default)]
    pub scope: Option<String>,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

impl TokenResponse {
    /// Converts the response into a token expiring `expires_in` seconds after `now`.
    pub fn into_token(self, now: DateTime<Utc>) -> AccessToken {
        let lifetime = i64::try_from(self.expires_in).unwrap_or(i64::MAX / 1000);
        AccessToken {
            access_token: self.access_token,
            token_type: self.token_type,
            expires_at: now + chrono::Duration::seconds(lifetime),
        }
    }

    /// TTL for the cache entry holding this token.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.expires_in).max(MIN_TOKEN_TTL)
    }
}
