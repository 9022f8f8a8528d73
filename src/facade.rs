//
//  cdek-client
//  facade.rs
//
//  Created by Ngonidzashe Mangudya on 2026/10/16.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! # Facade
//!
//! [`Cdek`] bundles one [`CdekClient`] with every entity handler.
//!
//! Handlers can be reached two ways:
//!
//! - typed accessors: [`Cdek::orders`], [`Cdek::calculator`], ...
//! - by name through the registry: [`Cdek::entity`]
//!
//! ## Registered Names
//!
//! | Name | Handler |
//! |------|---------|
//! | `orders` | [`Orders`] |
//! | `calculator` | [`Calculator`] |
//! | `location` | [`Locations`] |
//! | `deliverypoints` | [`DeliveryPoints`] |
//! | `webhooks` | [`Webhooks`] |
//! | `intakes` | [`Intakes`] |
//! | `print` | [`Print`] |
//! | `payment` | [`Payments`] |
//!
//! ```rust,no_run
//! use cdek_client::api::CdekClient;
//! use cdek_client::auth::Credentials;
//! use cdek_client::facade::{Cdek, Entity};
//!
//! # fn example() -> anyhow::Result<()> {
//! let cdek = Cdek::new(CdekClient::new(Credentials::sandbox())?);
//! match cdek.entity("location") {
//!     Some(Entity::Locations(_locations)) => { /* ... */ }
//!     _ => unreachable!(),
//! }
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use serde_json::Value;

use crate::api::common::ApiResult;
use crate::api::CdekClient;
use crate::entities::{
    Calculator, DeliveryPoints, Intakes, Locations, Orders, Payments, Print, Webhooks,
};

/// A handler resolved by name.
#[derive(Clone)]
pub enum Entity {
    Orders(Orders),
    Calculator(Calculator),
    Locations(Locations),
    DeliveryPoints(DeliveryPoints),
    Webhooks(Webhooks),
    Intakes(Intakes),
    Print(Print),
    Payments(Payments),
}

impl Entity {
    /// The registry name this handler is found under.
    pub fn name(&self) -> &'static str {
        match self {
            Entity::Orders(_) => "orders",
            Entity::Calculator(_) => "calculator",
            Entity::Locations(_) => "location",
            Entity::DeliveryPoints(_) => "deliverypoints",
            Entity::Webhooks(_) => "webhooks",
            Entity::Intakes(_) => "intakes",
            Entity::Print(_) => "print",
            Entity::Payments(_) => "payment",
        }
    }
}

type EntityFactory = fn(Arc<CdekClient>) -> Entity;

static REGISTRY: Lazy<HashMap<&'static str, EntityFactory>> = Lazy::new(|| {
    let mut registry: HashMap<&'static str, EntityFactory> = HashMap::new();
    registry.insert("orders", |c| Entity::Orders(Orders::new(c)));
    registry.insert("calculator", |c| Entity::Calculator(Calculator::new(c)));
    registry.insert("location", |c| Entity::Locations(Locations::new(c)));
    registry.insert("deliverypoints", |c| {
        Entity::DeliveryPoints(DeliveryPoints::new(c))
    });
    registry.insert("webhooks", |c| Entity::Webhooks(Webhooks::new(c)));
    registry.insert("intakes", |c| Entity::Intakes(Intakes::new(c)));
    registry.insert("print", |c| Entity::Print(Print::new(c)));
    registry.insert("payment", |c| Entity::Payments(Payments::new(c)));
    registry
});

/// Names accepted by [`Cdek::entity`], sorted.
pub fn registered_entities() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = REGISTRY.keys().copied().collect();
    names.sort_unstable();
    names
}

/// Entry point bundling the client and its handlers.
#[derive(Clone)]
pub struct Cdek {
    client: Arc<CdekClient>,
}

impl Cdek {
    pub fn new(client: CdekClient) -> Self {
        Self::from_arc(Arc::new(client))
    }

    /// Wraps a client that is already shared.
    pub fn from_arc(client: Arc<CdekClient>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Arc<CdekClient> {
        &self.client
    }

    /// Resolves a handler by its registry name.
    pub fn entity(&self, name: &str) -> Option<Entity> {
        REGISTRY
            .get(name)
            .map(|factory| factory(Arc::clone(&self.client)))
    }

    pub fn orders(&self) -> Orders {
        Orders::new(Arc::clone(&self.client))
    }

    pub fn calculator(&self) -> Calculator {
        Calculator::new(Arc::clone(&self.client))
    }

    pub fn locations(&self) -> Locations {
        Locations::new(Arc::clone(&self.client))
    }

    pub fn delivery_points(&self) -> DeliveryPoints {
        DeliveryPoints::new(Arc::clone(&self.client))
    }

    pub fn webhooks(&self) -> Webhooks {
        Webhooks::new(Arc::clone(&self.client))
    }

    pub fn intakes(&self) -> Intakes {
        Intakes::new(Arc::clone(&self.client))
    }

    pub fn print(&self) -> Print {
        Print::new(Arc::clone(&self.client))
    }

    pub fn payments(&self) -> Payments {
        Payments::new(Arc::clone(&self.client))
    }

    #[deprecated(note = "use `calculator().tariff_list()`")]
    pub async fn calculate_tariff_list(&self, params: &Value) -> ApiResult {
        self.calculator().tariff_list(params).await
    }

    #[deprecated(note = "use `calculator().tariff()`")]
    pub async fn calculate_tariff(&self, params: &Value) -> ApiResult {
        self.calculator().tariff(params).await
    }

    #[deprecated(note = "use `delivery_points().list()`")]
    pub async fn get_offices(&self, params: &Value) -> ApiResult {
        self.delivery_points().list(params).await
    }

    #[deprecated(note = "use `orders().create()`")]
    pub async fn create_order(&self, order: &Value) -> ApiResult {
        self.orders().create(order).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Credentials;
    use serde_json::json;

    fn cdek() -> Cdek {
        Cdek::new(CdekClient::new(Credentials::sandbox()).unwrap())
    }

    #[test]
    fn test_registry_names_resolve() {
        let cdek = cdek();
        for name in registered_entities() {
            let entity = cdek.entity(name).unwrap();
            assert_eq!(entity.name(), name);
        }
        assert_eq!(registered_entities().len(), 8);
    }

    #[test]
    fn test_unknown_entity() {
        assert!(cdek().entity("invoices").is_none());
        assert!(cdek().entity("Orders").is_none());
    }

    #[tokio::test]
    #[allow(deprecated)]
    async fn test_deprecated_methods_validate_locally() {
        let cdek = cdek();
        let err = cdek.create_order(&json!({})).await.unwrap_err();
        assert_eq!(err.error_code(), "500");
        let err = cdek.calculate_tariff(&json!({"from_location": {"code": 44}})).await.unwrap_err();
        assert_eq!(err.error_code(), "500");
    }
}
