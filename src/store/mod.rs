//
//  cdek-client
//  store/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/10/16.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! # Reference Store
//!
//! Local tables mirroring the provider's reference data.
//!
//! | Dataset | Table | Natural key |
//! |---------|-------|-------------|
//! | Regions | `cdek_regions` | `region_code` |
//! | Cities | `cdek_cities` | `code` |
//! | Delivery points | `cdek_delivery_points` | `code` |
//!
//! Every table carries a `modified` timestamp that defaults to the insert
//! time and is refreshed on update.
//!
//! The sync job only needs three operations, captured by [`ReferenceStore`].
//! [`SqliteStore`] is the bundled implementation.

mod rows;
mod sqlite;

pub use rows::*;
pub use sqlite::*;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// One of the mirrored datasets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dataset {
    Regions,
    Cities,
    DeliveryPoints,
}

impl Dataset {
    /// Datasets in sync order.
    pub const ALL: [Dataset; 3] = [Dataset::Regions, Dataset::Cities, Dataset::DeliveryPoints];

    /// Table holding the dataset.
    pub fn table(&self) -> &'static str {
        match self {
            Dataset::Regions => "cdek_regions",
            Dataset::Cities => "cdek_cities",
            Dataset::DeliveryPoints => "cdek_delivery_points",
        }
    }
}

impl std::fmt::Display for Dataset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Dataset::Regions => write!(f, "regions"),
            Dataset::Cities => write!(f, "cities"),
            Dataset::DeliveryPoints => write!(f, "delivery points"),
        }
    }
}

/// Errors from a reference store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Failed to prepare database location: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database task failed: {0}")]
    Task(String),
}

/// Mapped rows of one API page, all from the same dataset.
#[derive(Debug, Clone, PartialEq)]
pub enum RowPage {
    Regions(Vec<RegionRow>),
    Cities(Vec<CityRow>),
    DeliveryPoints(Vec<DeliveryPointRow>),
}

impl RowPage {
    /// Maps API records to rows.
    ///
    /// Records lacking their natural key are dropped.
    pub fn from_records(dataset: Dataset, records: &[Value]) -> Self {
        match dataset {
            Dataset::Regions => {
                RowPage::Regions(records.iter().filter_map(RegionRow::from_record).collect())
            }
            Dataset::Cities => {
                RowPage::Cities(records.iter().filter_map(CityRow::from_record).collect())
            }
            Dataset::DeliveryPoints => RowPage::DeliveryPoints(
                records
                    .iter()
                    .filter_map(DeliveryPointRow::from_record)
                    .collect(),
            ),
        }
    }

    pub fn dataset(&self) -> Dataset {
        match self {
            RowPage::Regions(_) => Dataset::Regions,
            RowPage::Cities(_) => Dataset::Cities,
            RowPage::DeliveryPoints(_) => Dataset::DeliveryPoints,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            RowPage::Regions(rows) => rows.len(),
            RowPage::Cities(rows) => rows.len(),
            RowPage::DeliveryPoints(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Storage the sync job writes to.
#[async_trait]
pub trait ReferenceStore: Send + Sync {
    /// Removes every row of a dataset.
    async fn truncate(&self, dataset: Dataset) -> Result<(), StoreError>;

    /// Inserts a page atomically, returning the number of rows written.
    async fn insert_page(&self, page: RowPage) -> Result<usize, StoreError>;

    /// Number of rows currently held for a dataset.
    async fn count(&self, dataset: Dataset) -> Result<u64, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rows_without_key_are_dropped() {
        let page = RowPage::from_records(
            Dataset::Regions,
            &[
                json!({"region_code": 50, "region": "Moscow Oblast"}),
                json!({"region": "No code"}),
            ],
        );
        assert_eq!(page.dataset(), Dataset::Regions);
        assert_eq!(page.len(), 1);
    }

    #[test]
    fn test_dataset_tables() {
        let tables: Vec<_> = Dataset::ALL.iter().map(Dataset::table).collect();
        assert_eq!(tables, ["cdek_regions", "cdek_cities", "cdek_delivery_points"]);
        assert_eq!(Dataset::DeliveryPoints.to_string(), "delivery points");
    }
}
