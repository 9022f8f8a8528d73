//
//  cdek-client
//  entities/locations.rs
//
//  Created by Ngonidzashe Mangudya on 2026/10/16.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! Location directory: regions, cities and postal codes.
//!
//! The list endpoints are paginated with `page` (0-based) and `size`. When the
//! caller gives no `size`, the defaults below are sent. `country_codes` may be
//! a list; it is sent comma-joined.

use std::sync::Arc;

use reqwest::Method;
use serde_json::{json, Value};

use super::{require_id, with_defaults};
use crate::api::common::ApiResult;
use crate::api::CdekClient;

/// Page size of a region listing when none is given.
pub const DEFAULT_REGIONS_PAGE_SIZE: u32 = 1000;

/// Page size of a city listing when none is given.
pub const DEFAULT_CITIES_PAGE_SIZE: u32 = 500;

/// Handler for `/location`.
#[derive(Clone)]
pub struct Locations {
    client: Arc<CdekClient>,
}

impl Locations {
    pub fn new(client: Arc<CdekClient>) -> Self {
        Self { client }
    }

    /// Lists regions.
    pub async fn regions(&self, params: &Value) -> ApiResult {
        let params = with_defaults(params, &[("size", json!(DEFAULT_REGIONS_PAGE_SIZE))]);
        self.client
            .send("/location/regions", Some(&params), Method::GET)
            .await
    }

    /// Lists cities.
    pub async fn cities(&self, params: &Value) -> ApiResult {
        let params = with_defaults(params, &[("size", json!(DEFAULT_CITIES_PAGE_SIZE))]);
        self.client
            .send("/location/cities", Some(&params), Method::GET)
            .await
    }

    /// Lists the postal codes of a city.
    pub async fn postal_codes(&self, city_code: &str) -> ApiResult {
        let code = require_id(city_code, "city_code")?;
        self.client
            .send("/location/postalcodes", Some(&json!({ "code": code })), Method::GET)
            .await
    }
}
