//
//  cdek-client
//  store/rows.rs
//
//  Created by Ngonidzashe Mangudya on 2026/10/16.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! Row types and the mapping from API records.
//!
//! # Coercion Rules
//!
//! * Absent or empty strings become `NULL`
//! * Absent coordinates and codes become `NULL`
//! * Absent flags, limits and weights become `0`
//! * Nested lists and objects are stored as JSON text

use serde_json::Value;

/// A row of `cdek_regions`.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionRow {
    pub region_code: i64,
    pub region: Option<String>,
    pub country_code: Option<String>,
    pub country: Option<String>,
    pub fias_region_guid: Option<String>,
}

impl RegionRow {
    /// Maps a `/location/regions` record. `None` without a `region_code`.
    pub fn from_record(record: &Value) -> Option<Self> {
        Some(Self {
            region_code: int(record, "/region_code")?,
            region: text(record, "/region"),
            country_code: text(record, "/country_code"),
            country: text(record, "/country"),
            fias_region_guid: text(record, "/fias_region_guid"),
        })
    }
}

/// A row of `cdek_cities`.
#[derive(Debug, Clone, PartialEq)]
pub struct CityRow {
    pub code: i64,
    pub city_uuid: Option<String>,
    pub city: Option<String>,
    pub fias_guid: Option<String>,
    pub kladr_code: Option<String>,
    pub country_code: Option<String>,
    pub country: Option<String>,
    pub region: Option<String>,
    pub region_code: Option<i64>,
    pub sub_region: Option<String>,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    pub time_zone: Option<String>,
    pub payment_limit: f64,
}

impl CityRow {
    /// Maps a `/location/cities` record. `None` without a `code`.
    pub fn from_record(record: &Value) -> Option<Self> {
        Some(Self {
            code: int(record, "/code")?,
            city_uuid: text(record, "/city_uuid"),
            city: text(record, "/city"),
            fias_guid: text(record, "/fias_guid"),
            kladr_code: text(record, "/kladr_code"),
            country_code: text(record, "/country_code"),
            country: text(record, "/country"),
            region: text(record, "/region"),
            region_code: int(record, "/region_code"),
            sub_region: text(record, "/sub_region"),
            longitude: float(record, "/longitude"),
            latitude: float(record, "/latitude"),
            time_zone: text(record, "/time_zone"),
            payment_limit: float(record, "/payment_limit").unwrap_or(0.0),
        })
    }
}

/// A row of `cdek_delivery_points`.
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryPointRow {
    pub code: String,
    pub uuid: Option<String>,
    pub name: Option<String>,
    pub point_type: Option<String>,
    pub owner_code: Option<String>,
    pub country_code: Option<String>,
    pub region_code: Option<i64>,
    pub region: Option<String>,
    pub city_code: Option<i64>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub address: Option<String>,
    pub address_full: Option<String>,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    pub address_comment: Option<String>,
    pub nearest_station: Option<String>,
    pub nearest_metro_station: Option<String>,
    pub work_time: Option<String>,
    pub phones: Option<String>,
    pub email: Option<String>,
    pub note: Option<String>,
    pub site: Option<String>,
    pub take_only: i64,
    pub is_handout: i64,
    pub is_reception: i64,
    pub is_dressing_room: i64,
    pub is_ltl: i64,
    pub have_cashless: i64,
    pub have_cash: i64,
    pub have_fast_payment_system: i64,
    pub allowed_cod: i64,
    pub fulfillment: i64,
    pub weight_min: f64,
    pub weight_max: f64,
    pub dimensions: Option<String>,
    pub office_image_list: Option<String>,
    pub work_time_list: Option<String>,
    pub location: Option<String>,
}

impl DeliveryPointRow {
    /// Maps a `/deliverypoints` record. `None` without a `code`.
    pub fn from_record(record: &Value) -> Option<Self> {
        Some(Self {
            code: text(record, "/code")?,
            uuid: text(record, "/uuid"),
            name: text(record, "/name"),
            point_type: text(record, "/type"),
            owner_code: text(record, "/owner_code"),
            country_code: text(record, "/location/country_code"),
            region_code: int(record, "/location/region_code"),
            region: text(record, "/location/region"),
            city_code: int(record, "/location/city_code"),
            city: text(record, "/location/city"),
            postal_code: text(record, "/location/postal_code"),
            address: text(record, "/location/address"),
            address_full: text(record, "/location/address_full"),
            longitude: float(record, "/location/longitude"),
            latitude: float(record, "/location/latitude"),
            address_comment: text(record, "/address_comment"),
            nearest_station: text(record, "/nearest_station"),
            nearest_metro_station: text(record, "/nearest_metro_station"),
            work_time: text(record, "/work_time"),
            phones: json_text(record, "/phones"),
            email: text(record, "/email"),
            note: text(record, "/note"),
            site: text(record, "/site"),
            take_only: flag(record, "/take_only"),
            is_handout: flag(record, "/is_handout"),
            is_reception: flag(record, "/is_reception"),
            is_dressing_room: flag(record, "/is_dressing_room"),
            is_ltl: flag(record, "/is_ltl"),
            have_cashless: flag(record, "/have_cashless"),
            have_cash: flag(record, "/have_cash"),
            have_fast_payment_system: flag(record, "/have_fast_payment_system"),
            allowed_cod: flag(record, "/allowed_cod"),
            fulfillment: flag(record, "/fulfillment"),
            weight_min: float(record, "/weight_min").unwrap_or(0.0),
            weight_max: float(record, "/weight_max").unwrap_or(0.0),
            dimensions: json_text(record, "/dimensions"),
            office_image_list: json_text(record, "/office_image_list"),
            work_time_list: json_text(record, "/work_time_list"),
            location: json_text(record, "/location"),
        })
    }
}

fn text(record: &Value, pointer: &str) -> Option<String> {
    match record.pointer(pointer)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn int(record: &Value, pointer: &str) -> Option<i64> {
    match record.pointer(pointer)? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn float(record: &Value, pointer: &str) -> Option<f64> {
    match record.pointer(pointer)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn flag(record: &Value, pointer: &str) -> i64 {
    match record.pointer(pointer) {
        Some(Value::Bool(true)) => 1,
        Some(Value::Number(n)) if n.as_f64().is_some_and(|v| v != 0.0) => 1,
        _ => 0,
    }
}

fn json_text(record: &Value, pointer: &str) -> Option<String> {
    match record.pointer(pointer)? {
        Value::Null => None,
        Value::Array(items) if items.is_empty() => None,
        Value::Object(map) if map.is_empty() => None,
        Value::String(s) if s.is_empty() => None,
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_city_coercion() {
        let row = CityRow::from_record(&json!({
            "code": 44,
            "city": "Moscow",
            "sub_region": "",
            "region_code": "81",
            "longitude": 37.61,
            "country_code": "RU"
        }))
        .unwrap();

        assert_eq!(row.code, 44);
        assert_eq!(row.city.as_deref(), Some("Moscow"));
        assert_eq!(row.sub_region, None);
        assert_eq!(row.region_code, Some(81));
        assert_eq!(row.longitude, Some(37.61));
        assert_eq!(row.latitude, None);
        assert_eq!(row.payment_limit, 0.0);
    }

    #[test]
    fn test_delivery_point_nested_fields() {
        let row = DeliveryPointRow::from_record(&json!({
            "code": "MSK123",
            "type": "PVZ",
            "location": {"city_code": 44, "city": "Moscow", "latitude": 55.75},
            "phones": [{"number": "+74950000000"}],
            "office_image_list": [],
            "have_cash": true,
            "is_handout": 1,
            "weight_max": 30
        }))
        .unwrap();

        assert_eq!(row.code, "MSK123");
        assert_eq!(row.point_type.as_deref(), Some("PVZ"));
        assert_eq!(row.city_code, Some(44));
        assert_eq!(row.latitude, Some(55.75));
        assert_eq!(row.phones.as_deref(), Some(r#"[{"number":"+74950000000"}]"#));
        assert_eq!(row.office_image_list, None);
        assert_eq!(row.have_cash, 1);
        assert_eq!(row.is_handout, 1);
        assert_eq!(row.take_only, 0);
        assert_eq!(row.weight_max, 30.0);
        assert_eq!(row.weight_min, 0.0);
        assert!(row.location.unwrap().contains("\"city_code\":44"));
    }

    #[test]
    fn test_missing_keys() {
        assert!(RegionRow::from_record(&json!({"region": "x"})).is_none());
        assert!(CityRow::from_record(&json!({"code": "abc"})).is_none());
        assert!(DeliveryPointRow::from_record(&json!({"code": ""})).is_none());
    }
}
