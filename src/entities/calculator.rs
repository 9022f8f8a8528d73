//
//  cdek-client
//  entities/calculator.rs
//
//  Created by Ngonidzashe Mangudya on 2026/10/16.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! Delivery cost calculator.
//!
//! Both endpoints take the same shape: `from_location`, `to_location` and a
//! non-empty `packages` list (weights in grams). [`Calculator::tariff`] also
//! needs the `tariff_code` to price.

use std::sync::Arc;

use reqwest::Method;
use serde_json::Value;

use super::{require, require_each, require_list};
use crate::api::common::{ApiError, ApiResult};
use crate::api::CdekClient;

/// Handler for `/calculator`.
#[derive(Clone)]
pub struct Calculator {
    client: Arc<CdekClient>,
}

impl Calculator {
    pub fn new(client: Arc<CdekClient>) -> Self {
        Self { client }
    }

    /// Prices every tariff available between two locations.
    pub async fn tariff_list(&self, params: &Value) -> ApiResult {
        validate_route(params)?;
        self.client
            .send("/calculator/tarifflist", Some(params), Method::POST)
            .await
    }

    /// Prices a single tariff.
    pub async fn tariff(&self, params: &Value) -> ApiResult {
        validate_route(params)?;
        require(params, "tariff_code")?;
        self.client
            .send("/calculator/tariff", Some(params), Method::POST)
            .await
    }
}

fn validate_route(params: &Value) -> Result<(), ApiError> {
    require(params, "from_location")?;
    require(params, "to_location")?;
    let packages = require_list(params, "packages")?;
    require_each(packages, "packages", "weight")
}
