//
//  cdek-client
//  cli/offices.rs
//
//  Created by Ngonidzashe Mangudya on 2026/10/16.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! `cdek offices`: the "list offices" action.
//!
//! ```bash
//! cdek offices --city-code 44
//! cdek offices --postal-code 630099 --type POSTAMAT --json
//! cdek offices --data '{"country_code": "KZ", "is_handout": true}'
//! ```

use anyhow::{bail, Result};
use clap::Args;
use serde_json::{json, Map, Value};

use crate::actions::{envelope, Action};
use crate::output::{cell, truncate, OutputWriter, TableBuilder};

use super::{GlobalOptions, Session};

#[derive(Args, Debug)]
pub struct OfficesCommand {
    /// City code from the location directory
    #[arg(long)]
    pub city_code: Option<u64>,

    /// Postal code
    #[arg(long)]
    pub postal_code: Option<String>,

    /// ISO country code
    #[arg(long)]
    pub country_code: Option<String>,

    /// Region code from the location directory
    #[arg(long)]
    pub region_code: Option<u64>,

    /// Point type: PVZ, POSTAMAT or ALL
    #[arg(long = "type", value_name = "TYPE")]
    pub point_type: Option<String>,

    /// Only points that hand parcels out
    #[arg(long)]
    pub handout: bool,

    /// Extra filters as a JSON object
    #[arg(long)]
    pub data: Option<String>,

    /// Maximum rows in the table
    #[arg(long, short = 'L', default_value = "50")]
    pub limit: usize,
}

impl OfficesCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        let payload = self.payload()?;
        let session = Session::open(global)?;
        let writer = OutputWriter::from_flag(global.json);

        let result = Action::Offices.execute(&session.cdek, &payload).await;

        if global.json {
            return writer.write_value(&envelope(result));
        }

        let points = match result {
            Ok(points) => points,
            Err(e) => bail!("{} (code {})", e.error_message(), e.error_code()),
        };

        let points = points.as_array().cloned().unwrap_or_default();
        if points.is_empty() {
            writer.write_info("No pickup points found");
            return Ok(());
        }

        let rows = points.iter().take(self.limit).map(|p| {
            vec![
                cell(p.get("code")),
                cell(p.get("type")),
                truncate(&cell(p.get("name")), 30),
                cell(p.pointer("/location/city")),
                truncate(&cell(p.pointer("/location/address")), 40),
                truncate(&cell(p.get("work_time")), 30),
            ]
        });

        TableBuilder::new()
            .color(writer.color_enabled())
            .headers(["CODE", "TYPE", "NAME", "CITY", "ADDRESS", "HOURS"])
            .rows(rows)
            .print();

        if points.len() > self.limit {
            writer.write_info(&format!(
                "Showing {} of {} points (use --limit or --json for more)",
                self.limit,
                points.len()
            ));
        }
        Ok(())
    }

    fn payload(&self) -> Result<Value> {
        let mut payload: Map<String, Value> = match &self.data {
            Some(raw) => match serde_json::from_str(raw)? {
                Value::Object(map) => map,
                _ => bail!("--data must be a JSON object"),
            },
            None => Map::new(),
        };

        let flags = [
            ("city_code", self.city_code.map(|c| json!(c))),
            ("postal_code", self.postal_code.as_ref().map(|c| json!(c))),
            ("country_code", self.country_code.as_ref().map(|c| json!(c.to_uppercase()))),
            ("region_code", self.region_code.map(|c| json!(c))),
            ("type", self.point_type.as_ref().map(|t| json!(t.to_uppercase()))),
            ("is_handout", self.handout.then(|| json!(true))),
        ];
        for (key, value) in flags {
            if let Some(value) = value {
                payload.insert(key.to_string(), value);
            }
        }

        Ok(Value::Object(payload))
    }
}
