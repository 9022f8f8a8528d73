//
//  cdek-client
//  actions.rs
//
//  Created by Ngonidzashe Mangudya on 2026/10/16.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! # Host Actions
//!
//! The request dispatcher a site front end talks to. The caller names an
//! action and passes a JSON payload; the answer is always a JSON envelope:
//!
//! ```json
//! {"success": true, "data": [...]}
//! {"success": false, "error_code": "500", "error_message": "..."}
//! ```
//!
//! | Action | Handler call |
//! |--------|--------------|
//! | `offices` | [`DeliveryPoints::list`](crate::entities::DeliveryPoints::list) |
//! | `calculate` | [`Calculator::tariff`](crate::entities::Calculator::tariff) when `tariff_code` is given, otherwise [`Calculator::tariff_list`](crate::entities::Calculator::tariff_list) |

use std::str::FromStr;

use serde_json::{json, Value};

use crate::api::client::LOG_TARGET;
use crate::api::common::{ApiError, ApiResult};
use crate::api::params::is_empty_value;
use crate::facade::Cdek;

/// An action the dispatcher understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// List pickup points
    Offices,
    /// Price a shipment
    Calculate,
}

impl Action {
    /// Parses an action name.
    pub fn parse(name: &str) -> Result<Self, ApiError> {
        match name.trim() {
            "offices" => Ok(Action::Offices),
            "calculate" => Ok(Action::Calculate),
            other => Err(ApiError::validation(format!("Unknown action: {other}"))),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Action::Offices => "offices",
            Action::Calculate => "calculate",
        }
    }

    /// Runs the action and returns the raw handler result.
    pub async fn execute(&self, cdek: &Cdek, payload: &Value) -> ApiResult {
        match self {
            Action::Offices => cdek.delivery_points().list(payload).await,
            Action::Calculate => {
                let single = payload
                    .get("tariff_code")
                    .is_some_and(|code| !is_empty_value(code));
                if single {
                    cdek.calculator().tariff(payload).await
                } else {
                    cdek.calculator().tariff_list(payload).await
                }
            }
        }
    }
}

impl FromStr for Action {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::parse(s)
    }
}

/// Dispatches `action` and wraps the outcome in the response envelope.
pub async fn run_action(cdek: &Cdek, action: &str, payload: &Value) -> Value {
    let result = match Action::parse(action) {
        Ok(action) => {
            tracing::debug!(target: LOG_TARGET, "Running action {}", action.name());
            action.execute(cdek, payload).await
        }
        Err(e) => Err(e),
    };
    envelope(result)
}

/// Wraps a handler result in the response envelope.
pub fn envelope(result: ApiResult) -> Value {
    match result {
        Ok(data) => json!({ "success": true, "data": data }),
        Err(e) => json!({
            "success": false,
            "error_code": e.error_code(),
            "error_message": e.error_message(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::CdekClient;
    use crate::auth::Credentials;

    #[test]
    fn test_parse() {
        assert_eq!(Action::parse("offices").unwrap(), Action::Offices);
        assert_eq!("calculate".parse::<Action>().unwrap(), Action::Calculate);
        assert_eq!(Action::parse("drop").unwrap_err().error_code(), "500");
    }

    #[test]
    fn test_envelope() {
        assert_eq!(
            envelope(Ok(json!([1]))),
            json!({"success": true, "data": [1]})
        );
        let failed = envelope(Err(ApiError::validation("Field `url` is required")));
        assert_eq!(failed["success"], json!(false));
        assert_eq!(failed["error_code"], json!("500"));
        assert_eq!(failed["error_message"], json!("Field `url` is required"));
    }

    #[tokio::test]
    async fn test_unknown_action_is_a_validation_error() {
        let cdek = Cdek::new(CdekClient::new(Credentials::sandbox()).unwrap());
        let response = run_action(&cdek, "refund", &json!({})).await;
        assert_eq!(response["success"], json!(false));
        assert_eq!(response["error_code"], json!("500"));
    }

    #[tokio::test]
    async fn test_calculate_validates_before_sending() {
        let cdek = Cdek::new(CdekClient::new(Credentials::sandbox()).unwrap());
        let response = run_action(&cdek, "calculate", &json!({"to_location": {"code": 44}})).await;
        assert_eq!(response["error_code"], json!("500"));
    }
}
