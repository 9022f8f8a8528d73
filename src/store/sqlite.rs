//
//  cdek-client
//  store/sqlite.rs
//
//  Created by Ngonidzashe Mangudya on 2026/10/16.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! SQLite implementation of [`ReferenceStore`].
//!
//! The connection is shared behind a mutex and every statement runs on
//! tokio's blocking pool. A page is written inside one transaction with
//! `INSERT OR REPLACE`, so it lands completely or not at all.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::{params, Connection, Transaction};
use tokio::task;

use super::{
    CityRow, Dataset, DeliveryPointRow, ReferenceStore, RegionRow, RowPage, StoreError,
};
use crate::api::client::LOG_TARGET;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS cdek_regions (
    id               INTEGER PRIMARY KEY AUTOINCREMENT,
    region_code      INTEGER NOT NULL UNIQUE,
    region           TEXT,
    country_code     TEXT,
    country          TEXT,
    fias_region_guid TEXT,
    modified         DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
);

CREATE TRIGGER IF NOT EXISTS cdek_regions_modified
AFTER UPDATE ON cdek_regions FOR EACH ROW
BEGIN
    UPDATE cdek_regions SET modified = CURRENT_TIMESTAMP WHERE id = NEW.id;
END;

CREATE TABLE IF NOT EXISTS cdek_cities (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    code          INTEGER NOT NULL UNIQUE,
    city_uuid     TEXT,
    city          TEXT,
    fias_guid     TEXT,
    kladr_code    TEXT,
    country_code  TEXT,
    country       TEXT,
    region        TEXT,
    region_code   INTEGER,
    sub_region    TEXT,
    longitude     REAL,
    latitude      REAL,
    time_zone     TEXT,
    payment_limit REAL NOT NULL DEFAULT 0,
    modified      DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
);

CREATE TRIGGER IF NOT EXISTS cdek_cities_modified
AFTER UPDATE ON cdek_cities FOR EACH ROW
BEGIN
    UPDATE cdek_cities SET modified = CURRENT_TIMESTAMP WHERE id = NEW.id;
END;

CREATE TABLE IF NOT EXISTS cdek_delivery_points (
    id                       INTEGER PRIMARY KEY AUTOINCREMENT,
    code                     TEXT NOT NULL UNIQUE,
    uuid                     TEXT,
    name                     TEXT,
    type                     TEXT,
    owner_code               TEXT,
    country_code             TEXT,
    region_code              INTEGER,
    region                   TEXT,
    city_code                INTEGER,
    city                     TEXT,
    postal_code              TEXT,
    address                  TEXT,
    address_full             TEXT,
    longitude                REAL,
    latitude                 REAL,
    address_comment          TEXT,
    nearest_station          TEXT,
    nearest_metro_station    TEXT,
    work_time                TEXT,
    phones                   TEXT,
    email                    TEXT,
    note                     TEXT,
    site                     TEXT,
    take_only                INTEGER NOT NULL DEFAULT 0,
    is_handout               INTEGER NOT NULL DEFAULT 0,
    is_reception             INTEGER NOT NULL DEFAULT 0,
    is_dressing_room         INTEGER NOT NULL DEFAULT 0,
    is_ltl                   INTEGER NOT NULL DEFAULT 0,
    have_cashless            INTEGER NOT NULL DEFAULT 0,
    have_cash                INTEGER NOT NULL DEFAULT 0,
    have_fast_payment_system INTEGER NOT NULL DEFAULT 0,
    allowed_cod              INTEGER NOT NULL DEFAULT 0,
    fulfillment              INTEGER NOT NULL DEFAULT 0,
    weight_min               REAL NOT NULL DEFAULT 0,
    weight_max               REAL NOT NULL DEFAULT 0,
    dimensions               TEXT,
    office_image_list        TEXT,
    work_time_list           TEXT,
    location                 TEXT,
    modified                 DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
);

CREATE INDEX IF NOT EXISTS cdek_delivery_points_city ON cdek_delivery_points (city_code);

CREATE TRIGGER IF NOT EXISTS cdek_delivery_points_modified
AFTER UPDATE ON cdek_delivery_points FOR EACH ROW
BEGIN
    UPDATE cdek_delivery_points SET modified = CURRENT_TIMESTAMP WHERE id = NEW.id;
END;
"#;

const INSERT_REGION: &str = "INSERT OR REPLACE INTO cdek_regions \
    (region_code, region, country_code, country, fias_region_guid) \
    VALUES (?1, ?2, ?3, ?4, ?5)";

const INSERT_CITY: &str = "INSERT OR REPLACE INTO cdek_cities \
    (code, city_uuid, city, fias_guid, kladr_code, country_code, country, region, \
     region_code, sub_region, longitude, latitude, time_zone, payment_limit) \
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)";

const INSERT_DELIVERY_POINT: &str = "INSERT OR REPLACE INTO cdek_delivery_points \
    (code, uuid, name, type, owner_code, country_code, region_code, region, city_code, city, \
     postal_code, address, address_full, longitude, latitude, address_comment, nearest_station, \
     nearest_metro_station, work_time, phones, email, note, site, take_only, is_handout, \
     is_reception, is_dressing_room, is_ltl, have_cashless, have_cash, have_fast_payment_system, \
     allowed_cod, fulfillment, weight_min, weight_max, dimensions, office_image_list, \
     work_time_list, location) \
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, \
     ?19, ?20, ?21, ?22, ?23, ?24, ?25, ?26, ?27, ?28, ?29, ?30, ?31, ?32, ?33, ?34, ?35, ?36, \
     ?37, ?38, ?39)";

/// Reference store backed by a SQLite database file.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
    path: Option<PathBuf>,
}

impl SqliteStore {
    /// Opens (or creates) the database at `path` and applies the schema.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        conn.execute_batch(SCHEMA)?;
        tracing::debug!(target: LOG_TARGET, "Opened reference store at {}", path.display());

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            path: Some(path.to_path_buf()),
        })
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            path: None,
        })
    }

    /// The database file, if not in memory.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    async fn with_connection<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> Result<T, StoreError> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        task::spawn_blocking(move || {
            let mut guard = conn.lock().unwrap_or_else(|e| e.into_inner());
            f(&mut *guard)
        })
        .await
        .map_err(|e| StoreError::Task(e.to_string()))?
    }
}

#[async_trait]
impl ReferenceStore for SqliteStore {
    async fn truncate(&self, dataset: Dataset) -> Result<(), StoreError> {
        self.with_connection(move |conn| {
            conn.execute(&format!("DELETE FROM {}", dataset.table()), [])?;
            Ok(())
        })
        .await
    }

    async fn insert_page(&self, page: RowPage) -> Result<usize, StoreError> {
        self.with_connection(move |conn| {
            let tx = conn.transaction()?;
            let written = match &page {
                RowPage::Regions(rows) => insert_regions(&tx, rows)?,
                RowPage::Cities(rows) => insert_cities(&tx, rows)?,
                RowPage::DeliveryPoints(rows) => insert_delivery_points(&tx, rows)?,
            };
            tx.commit()?;
            Ok(written)
        })
        .await
    }

    async fn count(&self, dataset: Dataset) -> Result<u64, StoreError> {
        self.with_connection(move |conn| {
            let count: i64 = conn.query_row(
                &format!("SELECT COUNT(*) FROM {}", dataset.table()),
                [],
                |row| row.get(0),
            )?;
            Ok(u64::try_from(count).unwrap_or(0))
        })
        .await
    }
}

fn insert_regions(tx: &Transaction<'_>, rows: &[RegionRow]) -> Result<usize, StoreError> {
    let mut stmt = tx.prepare_cached(INSERT_REGION)?;
    for row in rows {
        stmt.execute(params![
            row.region_code,
            row.region,
            row.country_code,
            row.country,
            row.fias_region_guid,
        ])?;
    }
    Ok(rows.len())
}

fn insert_cities(tx: &Transaction<'_>, rows: &[CityRow]) -> Result<usize, StoreError> {
    let mut stmt = tx.prepare_cached(INSERT_CITY)?;
    for row in rows {
        stmt.execute(params![
            row.code,
            row.city_uuid,
            row.city,
            row.fias_guid,
            row.kladr_code,
            row.country_code,
            row.country,
            row.region,
            row.region_code,
            row.sub_region,
            row.longitude,
            row.latitude,
            row.time_zone,
            row.payment_limit,
        ])?;
    }
    Ok(rows.len())
}

fn insert_delivery_points(
    tx: &Transaction<'_>,
    rows: &[DeliveryPointRow],
) -> Result<usize, StoreError> {
    let mut stmt = tx.prepare_cached(INSERT_DELIVERY_POINT)?;
    for row in rows {
        stmt.execute(params![
            row.code,
            row.uuid,
            row.name,
            row.point_type,
            row.owner_code,
            row.country_code,
            row.region_code,
            row.region,
            row.city_code,
            row.city,
            row.postal_code,
            row.address,
            row.address_full,
            row.longitude,
            row.latitude,
            row.address_comment,
            row.nearest_station,
            row.nearest_metro_station,
            row.work_time,
            row.phones,
            row.email,
            row.note,
            row.site,
            row.take_only,
            row.is_handout,
            row.is_reception,
            row.is_dressing_room,
            row.is_ltl,
            row.have_cashless,
            row.have_cash,
            row.have_fast_payment_system,
            row.allowed_cod,
            row.fulfillment,
            row.weight_min,
            row.weight_max,
            row.dimensions,
            row.office_image_list,
            row.work_time_list,
            row.location,
        ])?;
    }
    Ok(rows.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn region(code: i64, name: &str) -> RegionRow {
        RegionRow::from_record(&json!({"region_code": code, "region": name})).unwrap()
    }

    #[tokio::test]
    async fn test_insert_count_truncate() {
        let store = SqliteStore::open_in_memory().unwrap();
        let written = store
            .insert_page(RowPage::Regions(vec![region(1, "A"), region(2, "B")]))
            .await
            .unwrap();

        assert_eq!(written, 2);
        assert_eq!(store.count(Dataset::Regions).await.unwrap(), 2);
        assert_eq!(store.count(Dataset::Cities).await.unwrap(), 0);

        store.truncate(Dataset::Regions).await.unwrap();
        assert_eq!(store.count(Dataset::Regions).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_duplicate_key_replaces() {
        let store = SqliteStore::open_in_memory().unwrap();
        store
            .insert_page(RowPage::Regions(vec![region(7, "Old"), region(7, "New")]))
            .await
            .unwrap();

        assert_eq!(store.count(Dataset::Regions).await.unwrap(), 1);
        let conn = store.conn.lock().unwrap();
        let name: String = conn
            .query_row("SELECT region FROM cdek_regions WHERE region_code = 7", [], |r| r.get(0))
            .unwrap();
        assert_eq!(name, "New");
    }

    #[tokio::test]
    async fn test_modified_defaults_to_now() {
        let store = SqliteStore::open_in_memory().unwrap();
        store
            .insert_page(RowPage::DeliveryPoints(vec![DeliveryPointRow::from_record(
                &json!({"code": "MSK1", "location": {"city_code": 44}}),
            )
            .unwrap()]))
            .await
            .unwrap();

        let conn = store.conn.lock().unwrap();
        let modified: Option<String> = conn
            .query_row("SELECT modified FROM cdek_delivery_points WHERE code = 'MSK1'", [], |r| r.get(0))
            .unwrap();
        assert!(modified.is_some());
    }

    #[tokio::test]
    async fn test_open_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("cdek.sqlite");
        let store = SqliteStore::open(&path).unwrap();

        assert!(path.exists());
        assert_eq!(store.path(), Some(path.as_path()));

        // Schema application is idempotent
        drop(store);
        SqliteStore::open(&path).unwrap();
    }
}
