//
//  cdek-client
//  entities/orders.rs
//
//  Created by Ngonidzashe Mangudya on 2026/10/16.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! Orders: registration, lookup, update, deletion and client refusal.
//!
//! # Order Creation
//!
//! The provider rejects an order without these fields, so they are checked
//! locally first:
//!
//! * `tariff_code`
//! * `recipient.name`
//! * `recipient.phones[].number` (only when phones are given)
//! * `packages` (non-empty), each with `number` and `weight`
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use cdek_client::api::CdekClient;
//! use cdek_client::auth::Credentials;
//! use cdek_client::entities::Orders;
//! use serde_json::json;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let orders = Orders::new(Arc::new(CdekClient::new(Credentials::sandbox())?));
//! let created = orders
//!     .create(&json!({
//!         "tariff_code": 136,
//!         "recipient": {"name": "Ivan Petrov", "phones": [{"number": "+79001234567"}]},
//!         "to_location": {"code": 44},
//!         "packages": [{"number": "1", "weight": 500}]
//!     }))
//!     .await;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use reqwest::Method;
use serde_json::{json, Value};

use super::{require, require_each, require_id, require_list};
use crate::api::common::{ApiError, ApiResult};
use crate::api::params::is_empty_value;
use crate::api::CdekClient;

/// Handler for `/orders`.
#[derive(Clone)]
pub struct Orders {
    client: Arc<CdekClient>,
}

impl Orders {
    pub fn new(client: Arc<CdekClient>) -> Self {
        Self { client }
    }

    /// Registers an order.
    pub async fn create(&self, order: &Value) -> ApiResult {
        require(order, "tariff_code")?;
        require(order, "recipient")?;
        require(order, "recipient.name")?;

        if let Some(phones) = order.pointer("/recipient/phones").and_then(Value::as_array) {
            require_each(phones, "recipient.phones", "number")?;
        }

        let packages = require_list(order, "packages")?;
        require_each(packages, "packages", "number")?;
        require_each(packages, "packages", "weight")?;

        self.client.send("/orders", Some(order), Method::POST).await
    }

    /// Fetches an order by its provider uuid.
    pub async fn get(&self, uuid: &str) -> ApiResult {
        let uuid = require_id(uuid, "uuid")?;
        self.client
            .send(&format!("/orders/{uuid}"), None, Method::GET)
            .await
    }

    /// Fetches an order by the provider's order number.
    pub async fn get_by_cdek_number(&self, cdek_number: &str) -> ApiResult {
        let number = require_id(cdek_number, "cdek_number")?;
        self.client
            .send("/orders", Some(&json!({ "cdek_number": number })), Method::GET)
            .await
    }

    /// Fetches an order by the shop's own order number.
    pub async fn get_by_im_number(&self, im_number: &str) -> ApiResult {
        let number = require_id(im_number, "im_number")?;
        self.client
            .send("/orders", Some(&json!({ "im_number": number })), Method::GET)
            .await
    }

    /// Changes an order identified by `uuid` or `cdek_number`.
    pub async fn update(&self, order: &Value) -> ApiResult {
        let identified = ["uuid", "cdek_number"]
            .iter()
            .any(|key| order.get(*key).is_some_and(|v| !is_empty_value(v)));
        if !identified {
            return Err(ApiError::validation(
                "Field `uuid` or `cdek_number` is required",
            ));
        }

        self.client.send("/orders", Some(order), Method::PATCH).await
    }

    /// Deletes an order that has not been handed over yet.
    pub async fn delete(&self, uuid: &str) -> ApiResult {
        let uuid = require_id(uuid, "uuid")?;
        self.client
            .send(&format!("/orders/{uuid}"), None, Method::DELETE)
            .await
    }

    /// Registers the recipient's refusal of an order.
    pub async fn refusal(&self, uuid: &str) -> ApiResult {
        let uuid = require_id(uuid, "uuid")?;
        self.client
            .send(&format!("/orders/{uuid}/refusal"), None, Method::POST)
            .await
    }
}
