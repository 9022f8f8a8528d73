//
//  cdek-client
//  tariffs.rs
//
//  Created by Ngonidzashe Mangudya on 2026/10/16.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! # Tariff Catalogs
//!
//! The provider prices shipments per tariff code. Two families exist:
//!
//! - **Online store** tariffs, available to e-commerce contracts
//! - **Delivery** tariffs, for regular (non-shop) contracts
//!
//! Each tariff fixes how the parcel enters and leaves the network:
//!
//! | Mode | Code | Meaning |
//! |------|------|---------|
//! | `door-door` | 1 | Courier pickup, courier delivery |
//! | `door-warehouse` | 2 | Courier pickup, recipient collects at a point |
//! | `warehouse-door` | 3 | Sender drops off, courier delivery |
//! | `warehouse-warehouse` | 4 | Drop-off and collection at points |
//! | `door-postamat` | 6 | Courier pickup, parcel locker |
//! | `warehouse-postamat` | 7 | Drop-off, parcel locker |
//!
//! The catalogs are static data; [`find_tariff`] searches both.

use serde::Serialize;

/// How a parcel enters and leaves the delivery network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeliveryMode {
    DoorDoor,
    DoorWarehouse,
    WarehouseDoor,
    WarehouseWarehouse,
    DoorPostamat,
    WarehousePostamat,
}

impl DeliveryMode {
    /// The provider's numeric `delivery_mode`.
    pub fn code(&self) -> u8 {
        match self {
            DeliveryMode::DoorDoor => 1,
            DeliveryMode::DoorWarehouse => 2,
            DeliveryMode::WarehouseDoor => 3,
            DeliveryMode::WarehouseWarehouse => 4,
            DeliveryMode::DoorPostamat => 6,
            DeliveryMode::WarehousePostamat => 7,
        }
    }
}

impl std::fmt::Display for DeliveryMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DeliveryMode::DoorDoor => "door-door",
            DeliveryMode::DoorWarehouse => "door-warehouse",
            DeliveryMode::WarehouseDoor => "warehouse-door",
            DeliveryMode::WarehouseWarehouse => "warehouse-warehouse",
            DeliveryMode::DoorPostamat => "door-postamat",
            DeliveryMode::WarehousePostamat => "warehouse-postamat",
        };
        write!(f, "{}", name)
    }
}

/// Which contract family a tariff belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TariffCatalog {
    OnlineStore,
    Delivery,
}

impl std::fmt::Display for TariffCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TariffCatalog::OnlineStore => write!(f, "online store"),
            TariffCatalog::Delivery => write!(f, "delivery"),
        }
    }
}

/// One entry of a tariff catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Tariff {
    pub code: u32,
    pub name: &'static str,
    pub mode: DeliveryMode,
    pub catalog: TariffCatalog,
}

const fn store(code: u32, name: &'static str, mode: DeliveryMode) -> Tariff {
    Tariff {
        code,
        name,
        mode,
        catalog: TariffCatalog::OnlineStore,
    }
}

const fn delivery(code: u32, name: &'static str, mode: DeliveryMode) -> Tariff {
    Tariff {
        code,
        name,
        mode,
        catalog: TariffCatalog::Delivery,
    }
}

use DeliveryMode::*;

/// Tariffs of online-store contracts.
pub const ONLINE_STORE_TARIFFS: &[Tariff] = &[
    store(136, "Parcel warehouse-warehouse", WarehouseWarehouse),
    store(137, "Parcel warehouse-door", WarehouseDoor),
    store(138, "Parcel door-warehouse", DoorWarehouse),
    store(139, "Parcel door-door", DoorDoor),
    store(233, "Economy parcel warehouse-door", WarehouseDoor),
    store(234, "Economy parcel warehouse-warehouse", WarehouseWarehouse),
    store(291, "CDEK Express warehouse-warehouse", WarehouseWarehouse),
    store(293, "CDEK Express door-door", DoorDoor),
    store(294, "CDEK Express warehouse-door", WarehouseDoor),
    store(295, "CDEK Express door-warehouse", DoorWarehouse),
    store(366, "Parcel door-postamat", DoorPostamat),
    store(368, "Parcel warehouse-postamat", WarehousePostamat),
    store(378, "Economy parcel warehouse-postamat", WarehousePostamat),
    store(480, "Express door-door", DoorDoor),
    store(481, "Express door-warehouse", DoorWarehouse),
    store(482, "Express warehouse-door", WarehouseDoor),
    store(483, "Express warehouse-warehouse", WarehouseWarehouse),
    store(485, "Express door-postamat", DoorPostamat),
    store(486, "Express warehouse-postamat", WarehousePostamat),
];

/// Tariffs of regular delivery contracts.
pub const DELIVERY_TARIFFS: &[Tariff] = &[
    delivery(7, "International express documents door-door", DoorDoor),
    delivery(8, "International express cargo door-door", DoorDoor),
    delivery(62, "Trunk express warehouse-warehouse", WarehouseWarehouse),
    delivery(121, "Trunk express door-door", DoorDoor),
    delivery(122, "Trunk express warehouse-door", WarehouseDoor),
    delivery(123, "Trunk express door-warehouse", DoorWarehouse),
    delivery(124, "Super express by 18 warehouse-warehouse", WarehouseWarehouse),
    delivery(125, "Super express by 18 door-warehouse", DoorWarehouse),
    delivery(126, "Super express by 18 warehouse-door", WarehouseDoor),
    delivery(3, "Super express by 18 door-door", DoorDoor),
    delivery(57, "Super express by 9 door-door", DoorDoor),
    delivery(58, "Super express by 10 door-door", DoorDoor),
    delivery(59, "Super express by 12 door-door", DoorDoor),
    delivery(60, "Super express by 14 door-door", DoorDoor),
    delivery(61, "Super express by 16 door-door", DoorDoor),
];

/// Looks a tariff code up in both catalogs.
pub fn find_tariff(code: u32) -> Option<&'static Tariff> {
    ONLINE_STORE_TARIFFS
        .iter()
        .chain(DELIVERY_TARIFFS.iter())
        .find(|t| t.code == code)
}

/// Every tariff of both catalogs, online-store tariffs first.
pub fn all_tariffs() -> impl Iterator<Item = &'static Tariff> {
    ONLINE_STORE_TARIFFS.iter().chain(DELIVERY_TARIFFS.iter())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_find_tariff_in_both_catalogs() {
        let parcel = find_tariff(136).unwrap();
        assert_eq!(parcel.catalog, TariffCatalog::OnlineStore);
        assert_eq!(parcel.mode, DeliveryMode::WarehouseWarehouse);

        let trunk = find_tariff(62).unwrap();
        assert_eq!(trunk.catalog, TariffCatalog::Delivery);

        assert!(find_tariff(9999).is_none());
    }

    #[test]
    fn test_codes_are_unique() {
        let codes: HashSet<u32> = all_tariffs().map(|t| t.code).collect();
        assert_eq!(codes.len(), ONLINE_STORE_TARIFFS.len() + DELIVERY_TARIFFS.len());
    }

    #[test]
    fn test_delivery_mode_codes() {
        assert_eq!(DeliveryMode::DoorDoor.code(), 1);
        assert_eq!(DeliveryMode::WarehousePostamat.code(), 7);
        assert_eq!(DeliveryMode::DoorPostamat.to_string(), "door-postamat");
    }
}
