//
//  cdek-client
//  cli/sync.rs
//
//  Created by Ngonidzashe Mangudya on 2026/10/16.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! `cdek sync`: mirrors regions, cities and pickup points into SQLite.
//!
//! Settings come from the `[sync]` table of the config file; flags override
//! them for one run.
//!
//! ```bash
//! # Everything, all countries
//! cdek sync
//!
//! # Pickup points of Russia and Kazakhstan only, into a custom file
//! cdek sync --skip-regions --skip-cities --country RU,KZ --database ./pvz.sqlite
//! ```
//!
//! The command exits non-zero when any dataset failed or was skipped.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;

use crate::api::client::LOG_TARGET;
use crate::output::{format_status, OutputWriter, TableBuilder};
use crate::store::{ReferenceStore, SqliteStore};
use crate::sync::{SyncJob, SyncOptions, SyncReport};

use super::{GlobalOptions, Session};

#[derive(Args, Debug)]
pub struct SyncCommand {
    /// Records per request
    #[arg(long)]
    pub page_size: Option<u32>,

    /// Only these countries (ISO codes, repeat or comma-separate; -- for all)
    #[arg(long, value_delimiter = ',', action = clap::ArgAction::Append)]
    pub country: Vec<String>,

    /// Leave the regions table alone
    #[arg(long)]
    pub skip_regions: bool,

    /// Leave the cities table alone
    #[arg(long)]
    pub skip_cities: bool,

    /// Leave the pickup points table alone
    #[arg(long)]
    pub skip_delivery_points: bool,

    /// SQLite database file
    #[arg(long)]
    pub database: Option<PathBuf>,
}

impl SyncCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        let session = Session::open(global)?;
        let writer = OutputWriter::from_flag(global.json);

        let options = self.options(session.config.sync.to_options());
        let path = match &self.database {
            Some(path) => path.clone(),
            None => session.config.database_path()?,
        };
        tracing::debug!(target: LOG_TARGET, path = %path.display(), "Opening reference database");
        let store = Arc::new(SqliteStore::open(&path)?);

        let spinner = if global.json {
            ProgressBar::hidden()
        } else {
            let spinner = ProgressBar::new_spinner();
            spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?);
            spinner.enable_steady_tick(Duration::from_millis(120));
            spinner
        };

        let ticker = spinner.clone();
        let job = SyncJob::new(session.cdek.clone(), store.clone()).with_progress(move |p| {
            let scope = p.country.as_deref().map(|c| format!(" {}", c)).unwrap_or_default();
            ticker.set_message(format!("{}{}: page {} ({} rows)", p.dataset, scope, p.page, p.rows));
        });

        let report = job.run(&options).await;
        spinner.finish_and_clear();

        if global.json {
            writer.write_value(&json!({
                "database": path.display().to_string(),
                "success": report.is_success(),
                "report": report,
            }))?;
        } else {
            print_summary(&writer, &report, store.as_ref()).await?;
            writer.write_info(&format!("Database: {}", path.display()));
        }

        if !report.is_success() {
            bail!("Sync did not complete");
        }
        Ok(())
    }

    fn options(&self, mut options: SyncOptions) -> SyncOptions {
        if let Some(size) = self.page_size {
            options.page_size = Some(size);
        }
        if !self.country.is_empty() {
            options.countries = self.country.clone();
        }
        if self.skip_regions {
            options.update_regions = false;
        }
        if self.skip_cities {
            options.update_cities = false;
        }
        if self.skip_delivery_points {
            options.update_delivery_points = false;
        }
        options
    }
}

async fn print_summary(
    writer: &OutputWriter,
    report: &SyncReport,
    store: &dyn ReferenceStore,
) -> Result<()> {
    if report.outcomes.is_empty() {
        writer.write_warning("Nothing to sync: every dataset is disabled");
        return Ok(());
    }

    let color = writer.color_enabled();
    let mut rows = Vec::new();
    for outcome in &report.outcomes {
        let stored = store.count(outcome.dataset).await?;
        let status = if outcome.skipped {
            "skipped"
        } else if outcome.is_failed() {
            "failed"
        } else {
            "done"
        };
        rows.push(vec![
            outcome.dataset.to_string(),
            outcome.pages.to_string(),
            outcome.rows.to_string(),
            stored.to_string(),
            format_status(status, color),
        ]);
    }

    TableBuilder::new()
        .color(color)
        .headers(["DATASET", "PAGES", "WRITTEN", "IN TABLE", "STATUS"])
        .rows(rows)
        .print();

    for outcome in &report.outcomes {
        for error in &outcome.errors {
            writer.write_error(&format!("{}: {}", outcome.dataset, error));
        }
    }

    let elapsed = report.finished_at - report.started_at;
    writer.write_info(&format!("Finished in {}s", elapsed.num_seconds()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Dataset;

    fn command() -> SyncCommand {
        SyncCommand {
            page_size: None,
            country: Vec::new(),
            skip_regions: false,
            skip_cities: false,
            skip_delivery_points: false,
            database: None,
        }
    }

    #[test]
    fn test_flags_override_config() {
        let cmd = SyncCommand {
            page_size: Some(100),
            country: vec!["KZ".into()],
            skip_cities: true,
            ..command()
        };
        let options = cmd.options(SyncOptions::default());
        assert_eq!(options.page_size, Some(100));
        assert_eq!(options.countries, vec!["KZ".to_string()]);
        assert!(options.is_enabled(Dataset::Regions));
        assert!(!options.is_enabled(Dataset::Cities));
    }

    #[test]
    fn test_no_flags_keep_config() {
        let configured = SyncOptions {
            page_size: Some(250),
            countries: vec!["RU".into()],
            update_regions: false,
            ..SyncOptions::default()
        };
        let options = command().options(configured.clone());
        assert_eq!(options.page_size, Some(250));
        assert_eq!(options.countries, vec!["RU".to_string()]);
        assert!(!options.is_enabled(Dataset::Regions));
    }
}
