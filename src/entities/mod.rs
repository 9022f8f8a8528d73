//
//  cdek-client
//  entities/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/10/16.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! # Entity Handlers
//!
//! One handler per API resource group. Every handler follows the same
//! contract:
//!
//! 1. check the fields the provider requires (simple presence checks, no deep
//!    schema validation);
//! 2. if one is missing, return [`ApiError::Validation`] (code `"500"`)
//!    without touching the network;
//! 3. otherwise call [`CdekClient::send`] with the operation's method and path
//!    and return its result unchanged.
//!
//! | Handler | Resource |
//! |---------|----------|
//! | [`Orders`] | `/orders` |
//! | [`Calculator`] | `/calculator` |
//! | [`Locations`] | `/location` |
//! | [`DeliveryPoints`] | `/deliverypoints` |
//! | [`Webhooks`] | `/webhooks` |
//! | [`Intakes`] | `/intakes` |
//! | [`Print`] | `/print` |
//! | [`Payments`] | `/payment` |
//!
//! Handlers are cheap: they only hold an `Arc` of the shared client.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use cdek_client::api::CdekClient;
//! use cdek_client::auth::Credentials;
//! use cdek_client::entities::Orders;
//! use serde_json::json;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = Arc::new(CdekClient::new(Credentials::sandbox())?);
//! let orders = Orders::new(client);
//!
//! // Missing `packages`: rejected locally, no request is sent
//! let err = orders
//!     .create(&json!({"tariff_code": 136, "recipient": {"name": "Ivan"}}))
//!     .await
//!     .unwrap_err();
//! assert_eq!(err.error_code(), "500");
//! # Ok(())
//! # }
//! ```

mod calculator;
mod delivery_points;
mod intakes;
mod locations;
mod orders;
mod payments;
mod print;
mod webhooks;

pub use calculator::Calculator;
pub use delivery_points::{DeliveryPoints, DELIVERY_POINTS_CACHE_PREFIX};
pub use intakes::Intakes;
pub use locations::{Locations, DEFAULT_CITIES_PAGE_SIZE, DEFAULT_REGIONS_PAGE_SIZE};
pub use orders::Orders;
pub use payments::Payments;
pub use print::Print;
pub use webhooks::Webhooks;

use serde_json::{Map, Value};

use crate::api::common::ApiError;
use crate::api::params::is_empty_value;

/// Looks up a dotted path (`recipient.name`) in a JSON value.
fn lookup<'a>(params: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(params, |current, segment| current.get(segment))
}

/// Fails unless `path` holds a non-empty value.
pub(crate) fn require(params: &Value, path: &str) -> Result<(), ApiError> {
    match lookup(params, path) {
        Some(value) if !is_empty_value(value) => Ok(()),
        _ => Err(ApiError::validation(format!("Field `{path}` is required"))),
    }
}

/// Fails unless `path` holds a non-empty array, which is returned.
pub(crate) fn require_list<'a>(params: &'a Value, path: &str) -> Result<&'a [Value], ApiError> {
    match lookup(params, path).and_then(Value::as_array) {
        Some(items) if !items.is_empty() => Ok(items),
        _ => Err(ApiError::validation(format!(
            "Field `{path}` must be a non-empty list"
        ))),
    }
}

/// Fails unless every item of `items` has a non-empty `field`.
pub(crate) fn require_each(items: &[Value], list: &str, field: &str) -> Result<(), ApiError> {
    for (index, item) in items.iter().enumerate() {
        if require(item, field).is_err() {
            return Err(ApiError::validation(format!(
                "Field `{list}[{index}].{field}` is required"
            )));
        }
    }
    Ok(())
}

/// Fails on a blank identifier (uuid, order number, date).
pub(crate) fn require_id<'a>(value: &'a str, name: &str) -> Result<&'a str, ApiError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation(format!("`{name}` is required")));
    }
    Ok(trimmed)
}

/// Copies `params` and fills in `defaults` for keys that are absent or empty.
pub(crate) fn with_defaults(params: &Value, defaults: &[(&str, Value)]) -> Value {
    let mut merged: Map<String, Value> = params.as_object().cloned().unwrap_or_default();
    for (key, value) in defaults {
        let missing = merged.get(*key).map(is_empty_value).unwrap_or(true);
        if missing {
            merged.insert((*key).to_string(), value.clone());
        }
    }
    Value::Object(merged)
}
