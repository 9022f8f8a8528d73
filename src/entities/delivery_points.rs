//
//  cdek-client
//  entities/delivery_points.rs
//
//  Created by Ngonidzashe Mangudya on 2026/10/16.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! Pickup points and parcel lockers.
//!
//! [`DeliveryPoints::list`] fills in `type=ALL` and `lang=rus` when absent and
//! caches successful answers in the client's cache store. The key is the MD5
//! of the cleaned, merged options, so identical filters share one entry. There
//! is no invalidation: entries live for the store's default TTL.
//!
//! The sync job pages through every point and uses
//! [`DeliveryPoints::list_uncached`] instead.

use std::sync::Arc;

use md5::{Digest, Md5};
use reqwest::Method;
use serde_json::{json, Value};

use super::with_defaults;
use crate::api::client::LOG_TARGET;
use crate::api::common::ApiResult;
use crate::api::params::strip_empty;
use crate::api::CdekClient;

/// Prefix of the cache keys holding listing results.
pub const DELIVERY_POINTS_CACHE_PREFIX: &str = "cdek_delivery_points";

/// Handler for `/deliverypoints`.
#[derive(Clone)]
pub struct DeliveryPoints {
    client: Arc<CdekClient>,
}

impl DeliveryPoints {
    pub fn new(client: Arc<CdekClient>) -> Self {
        Self { client }
    }

    /// Lists delivery points, answering from the cache when possible.
    pub async fn list(&self, params: &Value) -> ApiResult {
        let params = merged_options(params);
        let key = cache_key(&params);
        let cache = self.client.cache();

        if let Some(raw) = cache.get(&key) {
            match serde_json::from_str(&raw) {
                Ok(cached) => {
                    tracing::debug!(target: LOG_TARGET, %key, "Delivery points served from cache");
                    return Ok(cached);
                }
                Err(e) => tracing::warn!(target: LOG_TARGET, "Ignoring unreadable cache entry {}: {}", key, e),
            }
        }

        let points = self.fetch(&params).await?;
        if let Err(e) = cache.set(&key, &points.to_string(), None) {
            tracing::warn!(target: LOG_TARGET, "Failed to cache delivery points: {}", e);
        }
        Ok(points)
    }

    /// Lists delivery points straight from the API.
    pub async fn list_uncached(&self, params: &Value) -> ApiResult {
        self.fetch(&merged_options(params)).await
    }

    async fn fetch(&self, params: &Value) -> ApiResult {
        self.client
            .send("/deliverypoints", Some(params), Method::GET)
            .await
    }
}

fn merged_options(params: &Value) -> Value {
    strip_empty(&with_defaults(
        params,
        &[("type", json!("ALL")), ("lang", json!("rus"))],
    ))
}

fn cache_key(options: &Value) -> String {
    let digest = Md5::digest(options.to_string().as_bytes());
    format!("{}_{:x}", DELIVERY_POINTS_CACHE_PREFIX, digest)
}
