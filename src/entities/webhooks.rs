//
//  cdek-client
//  entities/webhooks.rs
//
//  Created by Ngonidzashe Mangudya on 2026/10/16.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! Webhook subscriptions.
//!
//! # Event Types
//!
//! * `ORDER_STATUS` - Order status changed
//! * `PRINT_FORM` - A requested receipt or barcode is ready
//! * `DOWNLOAD_PHOTO` - Package photos are available
//! * `PREALERT_CLOSED` - A pre-alert was closed
//!
//! A subscription needs the callback `url` and the event `type`.

use std::sync::Arc;

use reqwest::Method;
use serde_json::Value;

use super::{require, require_id};
use crate::api::common::ApiResult;
use crate::api::CdekClient;

/// Handler for `/webhooks`.
#[derive(Clone)]
pub struct Webhooks {
    client: Arc<CdekClient>,
}

impl Webhooks {
    pub fn new(client: Arc<CdekClient>) -> Self {
        Self { client }
    }

    /// Lists the account's subscriptions.
    pub async fn list(&self) -> ApiResult {
        self.client.send("/webhooks", None, Method::GET).await
    }

    /// Subscribes `url` to an event type.
    pub async fn create(&self, payload: &Value) -> ApiResult {
        require(payload, "url")?;
        require(payload, "type")?;
        self.client
            .send("/webhooks", Some(payload), Method::POST)
            .await
    }

    pub async fn get(&self, uuid: &str) -> ApiResult {
        let uuid = require_id(uuid, "uuid")?;
        self.client
            .send(&format!("/webhooks/{uuid}"), None, Method::GET)
            .await
    }

    pub async fn delete(&self, uuid: &str) -> ApiResult {
        let uuid = require_id(uuid, "uuid")?;
        self.client
            .send(&format!("/webhooks/{uuid}"), None, Method::DELETE)
            .await
    }
}
