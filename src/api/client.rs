//
//  cdek-client
//  api/client.rs
//
//  Created by Ngonidzashe Mangudya on 2026/10/16.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! # HTTP Client for the CDEK API
//!
//! [`CdekClient`] is the transport every entity handler goes through. One call
//! to [`CdekClient::send`] is one HTTP request:
//!
//! 1. make sure a bearer token is available (memory, then cache store, then
//!    the token endpoint);
//! 2. build the URL from the environment's base URL and the endpoint path;
//! 3. put parameters in the query string (GET/DELETE) or a JSON body
//!    (POST/PATCH/PUT), dropping empty values;
//! 4. map the response: 2xx bodies are returned decoded, everything else
//!    becomes an [`ApiError`].
//!
//! Remote errors are logged under the `cdek` target and, if configured,
//! forwarded to an [`ErrorSink`].

use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use reqwest::header::ACCEPT;
use reqwest::{Client, Method, Response, StatusCode};
use serde_json::Value;

use super::common::{extract_error_message, ApiError, ApiResult};
use super::params::{query_pairs, strip_empty};
use super::sink::ErrorSink;
use crate::auth::{grant_params, AccessToken, Credentials, TokenResponse, TOKEN_PATH};
use crate::cache::{CacheStore, MemoryCache};

/// Production API base URL.
pub const PRODUCTION_URL: &str = "https://api.cdek.ru/v2";

/// Sandbox API base URL, used in test mode.
pub const SANDBOX_URL: &str = "https://api.edu.cdek.ru/v2";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Tracing target for everything the client logs.
pub const LOG_TARGET: &str = "cdek";

/// Longest slice of an unparseable error body kept in an error message.
const MAX_FALLBACK_BODY: usize = 500;

/// The transport/auth client for the CDEK API.
///
/// # Creating a Client
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use cdek_client::api::CdekClient;
/// use cdek_client::auth::Credentials;
/// use cdek_client::cache::FileCache;
///
/// let client = CdekClient::new(Credentials::sandbox())?
///     .with_cache(Arc::new(FileCache::new("/tmp/cdek-cache")));
/// assert_eq!(client.base_url(), "https://api.edu.cdek.ru/v2");
/// # Ok::<(), anyhow::Error>(())
/// ```
///
/// # Making Requests
///
/// ```rust,no_run
/// use cdek_client::api::CdekClient;
/// use cdek_client::auth::Credentials;
/// use reqwest::Method;
/// use serde_json::json;
///
/// # async fn example() -> anyhow::Result<()> {
/// let client = CdekClient::new(Credentials::sandbox())?;
/// match client.send("/location/regions", Some(&json!({"size": 10})), Method::GET).await {
///     Ok(regions) => println!("{}", regions),
///     Err(e) => eprintln!("{} ({})", e.error_message(), e.error_code()),
/// }
/// # Ok(())
/// # }
/// ```
pub struct CdekClient {
    /// The underlying HTTP client
    http: Client,
    /// Account used for the client-credentials grant
    credentials: Credentials,
    /// Base URL without a trailing slash
    base_url: String,
    /// Store shared with other clients/processes for the token
    cache: Arc<dyn CacheStore>,
    /// Token held by this instance
    token: Mutex<Option<AccessToken>>,
    /// Optional receiver of remote errors
    sink: Option<Arc<dyn ErrorSink>>,
}

impl CdekClient {
    /// Creates a client for the given account.
    ///
    /// The base URL follows `credentials.test_mode`, the timeout is
    /// [`DEFAULT_TIMEOUT`] and tokens are cached in a private [`MemoryCache`].
    pub fn new(credentials: Credentials) -> Result<Self> {
        let base_url = if credentials.test_mode {
            SANDBOX_URL
        } else {
            PRODUCTION_URL
        };

        Ok(Self {
            http: build_http(DEFAULT_TIMEOUT)?,
            credentials,
            base_url: base_url.to_string(),
            cache: Arc::new(MemoryCache::new()),
            token: Mutex::new(None),
            sink: None,
        })
    }

    /// Sends requests to `base_url` instead of the environment's host.
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self> {
        url::Url::parse(base_url).with_context(|| format!("Invalid base URL: {base_url}"))?;
        self.base_url = base_url.trim_end_matches('/').to_string();
        Ok(self)
    }

    /// Replaces the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.http = build_http(timeout)?;
        Ok(self)
    }

    /// Stores tokens (and delivery-point results) in `cache`.
    pub fn with_cache(mut self, cache: Arc<dyn CacheStore>) -> Self {
        self.cache = cache;
        self
    }

    /// Forwards every remote error to `sink`.
    pub fn with_error_sink(mut self, sink: Arc<dyn ErrorSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// The base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The account this client authenticates as.
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// The cache store shared by this client.
    pub fn cache(&self) -> Arc<dyn CacheStore> {
        Arc::clone(&self.cache)
    }

    /// Sends one request and maps its response.
    ///
    /// `params` go into the query string for GET and DELETE and into a JSON
    /// body otherwise. Any path other than the token endpoint is sent with a
    /// bearer token, obtaining one first if needed.
    pub async fn send(&self, path: &str, params: Option<&Value>, method: Method) -> ApiResult {
        let result = self.dispatch(path, params, method).await;
        if let Err(e) = &result {
            self.report(e);
        }
        result
    }

    async fn dispatch(&self, path: &str, params: Option<&Value>, method: Method) -> ApiResult {
        let token = if path == TOKEN_PATH {
            None
        } else {
            Some(self.access_token().await?)
        };

        let url = self.url(path);
        let mut request = self
            .http
            .request(method.clone(), &url)
            .header(ACCEPT, "application/json");

        if let Some(params) = params {
            if method == Method::GET || method == Method::DELETE {
                request = request.query(&query_pairs(params));
            } else {
                request = request.json(&strip_empty(params));
            }
        }

        if let Some(token) = &token {
            request = token.apply_to_request(request);
        }

        tracing::debug!(target: LOG_TARGET, %method, %url, "Sending request");
        let response = request.send().await.map_err(|e| ApiError::transport(&e))?;
        self.map_response(response).await
    }

    /// Returns a usable access token, authorizing if none is held.
    ///
    /// The in-memory token is checked first, then the cache store. An expired
    /// or unreadable cache entry is deleted before re-authorizing.
    pub async fn access_token(&self) -> Result<AccessToken, ApiError> {
        if let Some(token) = self.memory_token() {
            return Ok(token);
        }

        let key = self.credentials.token_cache_key();
        if let Some(raw) = self.cache.get(&key) {
            match serde_json::from_str::<AccessToken>(&raw) {
                Ok(token) if !token.is_expired() => {
                    tracing::debug!(target: LOG_TARGET, "Using cached access token");
                    self.remember(Some(token.clone()));
                    return Ok(token);
                }
                Ok(token) => {
                    tracing::debug!(target: LOG_TARGET, expired_at = %token.expires_at, "Cached access token expired");
                }
                Err(e) => {
                    tracing::warn!(target: LOG_TARGET, "Discarding unreadable cached token: {}", e);
                }
            }
            if let Err(e) = self.cache.delete(&key) {
                tracing::warn!(target: LOG_TARGET, "Failed to delete cached token: {}", e);
            }
        }

        self.request_token().await
    }

    /// Runs the client-credentials grant and stores the new token.
    ///
    /// The token is kept in memory and written to the cache store with a TTL
    /// of `expires_in` seconds (at least one minute).
    pub async fn authorize(&self) -> Result<AccessToken, ApiError> {
        let result = self.request_token().await;
        if let Err(e) = &result {
            self.report(e);
        }
        result
    }

    /// Drops the held token and its cache entry.
    pub fn forget_token(&self) {
        self.remember(None);
        if let Err(e) = self.cache.delete(&self.credentials.token_cache_key()) {
            tracing::warn!(target: LOG_TARGET, "Failed to delete cached token: {}", e);
        }
    }

    async fn request_token(&self) -> Result<AccessToken, ApiError> {
        if !self.credentials.is_complete() {
            return Err(ApiError::validation(
                "client_id and client_secret are required to authorize",
            ));
        }

        tracing::debug!(target: LOG_TARGET, test_mode = self.credentials.test_mode, "Requesting access token");
        let response = self
            .http
            .post(self.url(TOKEN_PATH))
            .header(ACCEPT, "application/json")
            .form(&grant_params(&self.credentials))
            .send()
            .await
            .map_err(|e| ApiError::transport(&e))?;

        let body = self.map_response(response).await?;
        let parsed: TokenResponse = serde_json::from_value(body).map_err(|e| ApiError::Transport {
            code: 0,
            message: format!("Malformed token response: {e}"),
        })?;

        let ttl = parsed.cache_ttl();
        let token = parsed.into_token(Utc::now());

        match serde_json::to_string(&token) {
            Ok(raw) => {
                if let Err(e) = self.cache.set(&self.credentials.token_cache_key(), &raw, Some(ttl)) {
                    tracing::warn!(target: LOG_TARGET, "Failed to cache access token: {}", e);
                }
            }
            Err(e) => tracing::warn!(target: LOG_TARGET, "Failed to encode access token: {}", e),
        }

        tracing::info!(target: LOG_TARGET, expires_at = %token.expires_at, "Obtained access token");
        self.remember(Some(token.clone()));
        Ok(token)
    }

    fn memory_token(&self) -> Option<AccessToken> {
        let guard = self.token.lock().unwrap_or_else(|e| e.into_inner());
        guard.as_ref().filter(|t| !t.is_expired()).cloned()
    }

    fn remember(&self, token: Option<AccessToken>) {
        let mut guard = self.token.lock().unwrap_or_else(|e| e.into_inner());
        *guard = token;
    }

    async fn map_response(&self, response: Response) -> ApiResult {
        let status = response.status();
        let body = response.text().await.map_err(|e| ApiError::transport(&e))?;

        if status.is_success() {
            return Ok(decode_body(&body));
        }

        if status.is_client_error() {
            let message =
                extract_error_message(&body).unwrap_or_else(|| fallback_message(status, &body));
            return Err(ApiError::Client {
                status: status.as_u16(),
                message,
            });
        }

        tracing::error!(target: LOG_TARGET, status = status.as_u16(), body = %body, "Provider failed to process the request");
        Err(ApiError::Server {
            status: status.as_u16(),
        })
    }

    fn report(&self, error: &ApiError) {
        if !error.is_remote() {
            return;
        }
        tracing::error!(target: LOG_TARGET, code = %error.error_code(), "{}", error.error_message());
        if let Some(sink) = &self.sink {
            sink.report(error);
        }
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

fn build_http(timeout: Duration) -> Result<Client> {
    Ok(Client::builder()
        .user_agent(format!("cdek-client/{}", crate::VERSION))
        .timeout(timeout)
        .build()?)
}

/// Decodes a 2xx body: empty is `null`, non-JSON is returned as a string.
fn decode_body(body: &str) -> Value {
    if body.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string()))
}

/// Message for a 4xx body no extractor understood.
fn fallback_message(status: StatusCode, body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        return status
            .canonical_reason()
            .unwrap_or("Request rejected")
            .to_string();
    }
    body.chars().take(MAX_FALLBACK_BODY).collect()
}
