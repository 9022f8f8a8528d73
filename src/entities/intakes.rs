//
//  cdek-client
//  entities/intakes.rs
//
//  Created by Ngonidzashe Mangudya on 2026/10/16.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! Courier pickup requests ("intakes").

use std::sync::Arc;

use reqwest::Method;
use serde_json::Value;

use super::require_id;
use crate::api::common::{ApiError, ApiResult};
use crate::api::params::is_empty_value;
use crate::api::CdekClient;

/// Handler for `/intakes`.
#[derive(Clone)]
pub struct Intakes {
    client: Arc<CdekClient>,
}

impl Intakes {
    pub fn new(client: Arc<CdekClient>) -> Self {
        Self { client }
    }

    /// Requests a courier pickup.
    pub async fn create(&self, payload: &Value) -> ApiResult {
        if !payload.is_object() || is_empty_value(payload) {
            return Err(ApiError::validation("Intake request must not be empty"));
        }
        self.client
            .send("/intakes", Some(payload), Method::POST)
            .await
    }

    pub async fn get(&self, uuid: &str) -> ApiResult {
        let uuid = require_id(uuid, "uuid")?;
        self.client
            .send(&format!("/intakes/{uuid}"), None, Method::GET)
            .await
    }

    pub async fn delete(&self, uuid: &str) -> ApiResult {
        let uuid = require_id(uuid, "uuid")?;
        self.client
            .send(&format!("/intakes/{uuid}"), None, Method::DELETE)
            .await
    }
}
