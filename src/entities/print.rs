//
//  cdek-client
//  entities/print.rs
//
//  Created by Ngonidzashe Mangudya on 2026/10/16.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! Printable forms: order receipts and package barcodes.
//!
//! Forms are generated asynchronously by the provider. `create_*` returns the
//! uuid of the print task; `get_*` reports its status and, once ready, the
//! download URL.

use std::sync::Arc;

use reqwest::Method;
use serde_json::Value;

use super::{require_id, require_list};
use crate::api::common::ApiResult;
use crate::api::CdekClient;

/// Handler for `/print`.
#[derive(Clone)]
pub struct Print {
    client: Arc<CdekClient>,
}

impl Print {
    pub fn new(client: Arc<CdekClient>) -> Self {
        Self { client }
    }

    /// Requests a receipt for the listed `orders`.
    pub async fn create_receipt(&self, payload: &Value) -> ApiResult {
        require_list(payload, "orders")?;
        self.client
            .send("/print/orders", Some(payload), Method::POST)
            .await
    }

    pub async fn get_receipt(&self, uuid: &str) -> ApiResult {
        let uuid = require_id(uuid, "uuid")?;
        self.client
            .send(&format!("/print/orders/{uuid}"), None, Method::GET)
            .await
    }

    /// Requests barcode labels for the listed `orders`.
    pub async fn create_barcode(&self, payload: &Value) -> ApiResult {
        require_list(payload, "orders")?;
        self.client
            .send("/print/barcodes", Some(payload), Method::POST)
            .await
    }

    pub async fn get_barcode(&self, uuid: &str) -> ApiResult {
        let uuid = require_id(uuid, "uuid")?;
        self.client
            .send(&format!("/print/barcodes/{uuid}"), None, Method::GET)
            .await
    }
}
