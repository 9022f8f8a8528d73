//
//  cdek-client
//  cli/tariffs.rs
//
//  Created by Ngonidzashe Mangudya on 2026/10/16.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! `cdek tariffs`: prints the built-in tariff catalogs. Works offline.

use anyhow::{bail, Result};
use clap::{Args, ValueEnum};

use crate::output::{OutputWriter, TableRow};
use crate::tariffs::{all_tariffs, find_tariff, Tariff, TariffCatalog};

use super::GlobalOptions;

#[derive(Args, Debug)]
pub struct TariffsCommand {
    /// Show a single tariff
    #[arg(long)]
    pub code: Option<u32>,

    /// Only tariffs of this catalog
    #[arg(long, value_enum, conflicts_with = "code")]
    pub catalog: Option<CatalogArg>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CatalogArg {
    OnlineStore,
    Delivery,
}

impl From<CatalogArg> for TariffCatalog {
    fn from(arg: CatalogArg) -> Self {
        match arg {
            CatalogArg::OnlineStore => TariffCatalog::OnlineStore,
            CatalogArg::Delivery => TariffCatalog::Delivery,
        }
    }
}

impl TableRow for Tariff {
    fn headers() -> &'static [&'static str] {
        &["CODE", "NAME", "MODE", "CATALOG"]
    }

    fn row(&self, _color: bool) -> Vec<String> {
        vec![
            self.code.to_string(),
            self.name.to_string(),
            self.mode.to_string(),
            self.catalog.to_string(),
        ]
    }
}

impl TariffsCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        let writer = OutputWriter::from_flag(global.json);
        let tariffs = self.select()?;
        writer.write_list(&tariffs)
    }

    fn select(&self) -> Result<Vec<Tariff>> {
        if let Some(code) = self.code {
            return match find_tariff(code) {
                Some(tariff) => Ok(vec![*tariff]),
                None => bail!("Unknown tariff code {}", code),
            };
        }

        let catalog = self.catalog.map(TariffCatalog::from);
        Ok(all_tariffs()
            .filter(|t| catalog.map_or(true, |c| t.catalog == c))
            .copied()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_by_code() {
        let cmd = TariffsCommand {
            code: Some(136),
            catalog: None,
        };
        let selected = cmd.select().unwrap();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].code, 136);
    }

    #[test]
    fn test_unknown_code() {
        let cmd = TariffsCommand {
            code: Some(99999),
            catalog: None,
        };
        assert!(cmd.select().is_err());
    }

    #[test]
    fn test_select_by_catalog() {
        let cmd = TariffsCommand {
            code: None,
            catalog: Some(CatalogArg::Delivery),
        };
        let selected = cmd.select().unwrap();
        assert!(!selected.is_empty());
        assert!(selected.iter().all(|t| t.catalog == TariffCatalog::Delivery));
    }

    #[test]
    fn test_row_matches_headers() {
        let tariff = find_tariff(136).unwrap();
        assert_eq!(tariff.row(false).len(), Tariff::headers().len());
    }
}
