//
//  cdek-client
//  entities/payments.rs
//
//  Created by Ngonidzashe Mangudya on 2026/10/16.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! Cash-on-delivery transfers.

use std::sync::Arc;

use reqwest::Method;
use serde_json::json;

use super::require_id;
use crate::api::common::ApiResult;
use crate::api::CdekClient;

/// Handler for `/payment`.
#[derive(Clone)]
pub struct Payments {
    client: Arc<CdekClient>,
}

impl Payments {
    pub fn new(client: Arc<CdekClient>) -> Self {
        Self { client }
    }

    /// Lists orders paid out on `date` (`YYYY-MM-DD`).
    pub async fn by_date(&self, date: &str) -> ApiResult {
        let date = require_id(date, "date")?;
        self.client
            .send("/payment", Some(&json!({ "date": date })), Method::GET)
            .await
    }
}
