//
//  cdek-client
//  sync/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/10/16.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! # Reference Data Sync
//!
//! Mirrors regions, cities and delivery points into a [`ReferenceStore`].
//!
//! ## Run Order
//!
//! Datasets run in the order regions, cities, delivery points. For each
//! enabled dataset the job truncates the table, then requests pages
//! `0, 1, 2, ...` and inserts each page as it arrives. A page with fewer
//! records than the page size is the last one.
//!
//! ## Country Filter
//!
//! `countries` is an allow-list of ISO codes. An empty list, or one containing
//! `--`, disables filtering. Regions and cities are requested once with the
//! whole list; delivery points are requested country by country.
//!
//! ## Failures
//!
//! | Dataset | On failure |
//! |---------|------------|
//! | Regions | Recorded; later datasets are skipped |
//! | Cities | Recorded; delivery points are skipped |
//! | Delivery points | Recorded; that country stops, other countries continue |
//!
//! Rows inserted before a failure stay in the table. The
//! [`SyncReport`] tells the caller whether the run succeeded.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use cdek_client::api::CdekClient;
//! use cdek_client::auth::Credentials;
//! use cdek_client::facade::Cdek;
//! use cdek_client::store::SqliteStore;
//! use cdek_client::sync::{SyncJob, SyncOptions};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let cdek = Cdek::new(CdekClient::new(Credentials::sandbox())?);
//! let store = Arc::new(SqliteStore::open("cdek.sqlite")?);
//! let report = SyncJob::new(cdek, store).run(&SyncOptions::default()).await;
//! if !report.is_success() {
//!     std::process::exit(1);
//! }
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::api::client::LOG_TARGET;
use crate::api::common::{page_records, ApiResult, PageRequest};
use crate::entities::{DEFAULT_CITIES_PAGE_SIZE, DEFAULT_REGIONS_PAGE_SIZE};
use crate::facade::Cdek;
use crate::store::{Dataset, ReferenceStore, RowPage};

/// Default page size for delivery points.
pub const DEFAULT_DELIVERY_POINTS_PAGE_SIZE: u32 = 1000;

/// Country-list entry meaning "all countries".
pub const ALL_COUNTRIES: &str = "--";

/// What to sync and how.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOptions {
    pub update_regions: bool,
    pub update_cities: bool,
    pub update_delivery_points: bool,
    /// Overrides every dataset's default page size
    pub page_size: Option<u32>,
    /// Country allow-list
    pub countries: Vec<String>,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            update_regions: true,
            update_cities: true,
            update_delivery_points: true,
            page_size: None,
            countries: vec![ALL_COUNTRIES.to_string()],
        }
    }
}

impl SyncOptions {
    pub fn is_enabled(&self, dataset: Dataset) -> bool {
        match dataset {
            Dataset::Regions => self.update_regions,
            Dataset::Cities => self.update_cities,
            Dataset::DeliveryPoints => self.update_delivery_points,
        }
    }

    /// Page size used for a dataset.
    pub fn page_size_for(&self, dataset: Dataset) -> u32 {
        match self.page_size.filter(|size| *size > 0) {
            Some(size) => size,
            None => match dataset {
                Dataset::Regions => DEFAULT_REGIONS_PAGE_SIZE,
                Dataset::Cities => DEFAULT_CITIES_PAGE_SIZE,
                Dataset::DeliveryPoints => DEFAULT_DELIVERY_POINTS_PAGE_SIZE,
            },
        }
    }

    /// Normalised country codes, or `None` when no filter applies.
    pub fn country_filter(&self) -> Option<Vec<String>> {
        let codes: Vec<String> = self
            .countries
            .iter()
            .map(|c| c.trim().to_uppercase())
            .filter(|c| !c.is_empty())
            .collect();

        if codes.is_empty() || codes.iter().any(|c| c == ALL_COUNTRIES) {
            None
        } else {
            Some(codes)
        }
    }
}

/// Result of one dataset within a run.
#[derive(Debug, Clone, Serialize)]
pub struct DatasetOutcome {
    #[serde(serialize_with = "serialize_dataset")]
    pub dataset: Dataset,
    /// Pages fetched and stored
    pub pages: u32,
    /// Rows written
    pub rows: u64,
    /// Failure messages, one per failed loop
    pub errors: Vec<String>,
    /// Not attempted because an earlier dataset failed
    pub skipped: bool,
}

impl DatasetOutcome {
    fn new(dataset: Dataset) -> Self {
        Self {
            dataset,
            pages: 0,
            rows: 0,
            errors: Vec::new(),
            skipped: false,
        }
    }

    fn skipped(dataset: Dataset) -> Self {
        Self {
            skipped: true,
            ..Self::new(dataset)
        }
    }

    pub fn is_failed(&self) -> bool {
        !self.errors.is_empty()
    }
}

fn serialize_dataset<S: serde::Serializer>(dataset: &Dataset, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&dataset.to_string())
}

/// Summary of a sync run.
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub outcomes: Vec<DatasetOutcome>,
}

impl SyncReport {
    /// Whether every attempted dataset finished and none was skipped.
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(|o| !o.is_failed() && !o.skipped)
    }

    pub fn outcome(&self, dataset: Dataset) -> Option<&DatasetOutcome> {
        self.outcomes.iter().find(|o| o.dataset == dataset)
    }
}

/// Progress notification emitted after each stored page.
#[derive(Debug, Clone)]
pub struct PageProgress {
    pub dataset: Dataset,
    pub country: Option<String>,
    pub page: u32,
    pub rows: usize,
}

type ProgressFn = Arc<dyn Fn(&PageProgress) + Send + Sync>;

/// Truncate-and-reload sync of the reference tables.
pub struct SyncJob {
    cdek: Cdek,
    store: Arc<dyn ReferenceStore>,
    progress: Option<ProgressFn>,
}

impl SyncJob {
    pub fn new(cdek: Cdek, store: Arc<dyn ReferenceStore>) -> Self {
        Self {
            cdek,
            store,
            progress: None,
        }
    }

    /// Calls `progress` after every stored page.
    pub fn with_progress(mut self, progress: impl Fn(&PageProgress) + Send + Sync + 'static) -> Self {
        self.progress = Some(Arc::new(progress));
        self
    }

    /// Runs the enabled datasets in order.
    pub async fn run(&self, options: &SyncOptions) -> SyncReport {
        let started_at = Utc::now();
        let mut outcomes = Vec::new();
        let mut halted = false;

        for dataset in Dataset::ALL {
            if !options.is_enabled(dataset) {
                continue;
            }
            if halted {
                tracing::warn!(target: LOG_TARGET, "Skipping {} after an earlier failure", dataset);
                outcomes.push(DatasetOutcome::skipped(dataset));
                continue;
            }

            let outcome = self.sync_dataset(dataset, options).await;
            if outcome.is_failed() && dataset != Dataset::DeliveryPoints {
                halted = true;
            }
            outcomes.push(outcome);
        }

        let report = SyncReport {
            started_at,
            finished_at: Utc::now(),
            outcomes,
        };
        tracing::info!(target: LOG_TARGET, success = report.is_success(), "Sync finished");
        report
    }

    async fn sync_dataset(&self, dataset: Dataset, options: &SyncOptions) -> DatasetOutcome {
        let mut outcome = DatasetOutcome::new(dataset);
        let size = options.page_size_for(dataset);

        if let Err(e) = self.store.truncate(dataset).await {
            tracing::error!(target: LOG_TARGET, "Failed to truncate {}: {}", dataset.table(), e);
            outcome.errors.push(e.to_string());
            return outcome;
        }

        let filter = options.country_filter();
        match dataset {
            Dataset::Regions | Dataset::Cities => {
                let mut base = Map::new();
                if let Some(codes) = filter {
                    base.insert("country_codes".to_string(), json!(codes));
                }
                let result = self.paginate(dataset, None, base, size, &mut outcome).await;
                if let Err(message) = result {
                    tracing::error!(target: LOG_TARGET, dataset = %dataset, "{}", message);
                    outcome.errors.push(message);
                }
            }
            Dataset::DeliveryPoints => {
                let countries: Vec<Option<String>> = match filter {
                    Some(codes) => codes.into_iter().map(Some).collect(),
                    None => vec![None],
                };
                for country in countries {
                    let mut base = Map::new();
                    if let Some(code) = &country {
                        base.insert("country_code".to_string(), json!(code));
                    }
                    let result = self
                        .paginate(dataset, country.as_deref(), base, size, &mut outcome)
                        .await;
                    if let Err(message) = result {
                        let message = match &country {
                            Some(code) => format!("{code}: {message}"),
                            None => message,
                        };
                        tracing::error!(target: LOG_TARGET, dataset = %dataset, "{}", message);
                        outcome.errors.push(message);
                    }
                }
            }
        }

        tracing::info!(
            target: LOG_TARGET,
            dataset = %dataset,
            pages = outcome.pages,
            rows = outcome.rows,
            failed = outcome.is_failed(),
            "Dataset sync complete"
        );
        outcome
    }

    async fn paginate(
        &self,
        dataset: Dataset,
        country: Option<&str>,
        base: Map<String, Value>,
        size: u32,
        outcome: &mut DatasetOutcome,
    ) -> Result<(), String> {
        let mut page = PageRequest::first(size);

        loop {
            let mut params = base.clone();
            page.apply(&mut params);

            let body = self
                .fetch(dataset, &Value::Object(params))
                .await
                .map_err(|e| format!("page {}: {}", page.page, e.error_message()))?;

            let records = page_records(&body);
            let received = records.len();
            let rows = RowPage::from_records(dataset, records);
            let written = self
                .store
                .insert_page(rows)
                .await
                .map_err(|e| format!("page {}: {}", page.page, e))?;

            outcome.pages += 1;
            outcome.rows += written as u64;
            tracing::debug!(
                target: LOG_TARGET,
                dataset = %dataset,
                page = page.page,
                received,
                written,
                "Stored page"
            );

            if let Some(progress) = &self.progress {
                progress(&PageProgress {
                    dataset,
                    country: country.map(str::to_string),
                    page: page.page,
                    rows: written,
                });
            }

            if page.is_last(received) {
                return Ok(());
            }
            page = page.next();
        }
    }

    async fn fetch(&self, dataset: Dataset, params: &Value) -> ApiResult {
        match dataset {
            Dataset::Regions => self.cdek.locations().regions(params).await,
            Dataset::Cities => self.cdek.locations().cities(params).await,
            Dataset::DeliveryPoints => self.cdek.delivery_points().list_uncached(params).await,
        }
    }
}
