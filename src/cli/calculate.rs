//
//  cdek-client
//  cli/calculate.rs
//
//  Created by Ngonidzashe Mangudya on 2026/10/16.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! `cdek calculate`: the "calculate tariff" action.
//!
//! ```bash
//! # Every tariff between Moscow (44) and Novosibirsk (270) for a 2 kg parcel
//! cdek calculate --from 44 --to 270 --weight 2000
//!
//! # A single tariff with dimensions
//! cdek calculate --from 44 --to 270 --weight 2000 --tariff 136 --size 30x20x10
//!
//! # Full request body
//! cdek calculate --data '{"from_location": {"code": 44}, ...}'
//! ```

use anyhow::{bail, Result};
use clap::Args;
use serde_json::{json, Value};

use crate::actions::{envelope, Action};
use crate::output::{cell, print_field, print_header, OutputWriter, TableBuilder};
use crate::tariffs::find_tariff;

use super::{GlobalOptions, Session};

#[derive(Args, Debug)]
pub struct CalculateCommand {
    /// Full request body as JSON (other flags are ignored)
    #[arg(long, conflicts_with_all = ["from", "to", "weight"])]
    pub data: Option<String>,

    /// Origin city code
    #[arg(long, required_unless_present = "data")]
    pub from: Option<u64>,

    /// Destination city code
    #[arg(long, required_unless_present = "data")]
    pub to: Option<u64>,

    /// Parcel weight in grams
    #[arg(long, required_unless_present = "data")]
    pub weight: Option<u64>,

    /// Dimensions in centimetres, LxWxH
    #[arg(long, value_parser = parse_size)]
    pub size: Option<(u64, u64, u64)>,

    /// Price only this tariff code
    #[arg(long)]
    pub tariff: Option<u32>,
}

fn parse_size(raw: &str) -> Result<(u64, u64, u64), String> {
    let parts: Vec<&str> = raw.split(['x', 'X', '*']).collect();
    let [l, w, h] = parts.as_slice() else {
        return Err("expected LxWxH, e.g. 30x20x10".to_string());
    };
    let parse = |v: &str| v.trim().parse::<u64>().map_err(|e| format!("{v}: {e}"));
    Ok((parse(*l)?, parse(*w)?, parse(*h)?))
}

impl CalculateCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        let payload = self.payload()?;
        let session = Session::open(global)?;
        let writer = OutputWriter::from_flag(global.json);

        let result = Action::Calculate.execute(&session.cdek, &payload).await;

        if global.json {
            return writer.write_value(&envelope(result));
        }

        let body = match result {
            Ok(body) => body,
            Err(e) => bail!("{} (code {})", e.error_message(), e.error_code()),
        };

        match body.get("tariff_codes").and_then(Value::as_array) {
            Some(tariffs) if tariffs.is_empty() => writer.write_info("No tariffs available for this route"),
            Some(tariffs) => {
                let rows = tariffs.iter().map(|t| {
                    vec![
                        cell(t.get("tariff_code")),
                        cell(t.get("tariff_name")),
                        cell(t.get("delivery_sum")),
                        period(t),
                    ]
                });
                TableBuilder::new()
                    .color(writer.color_enabled())
                    .headers(["CODE", "TARIFF", "PRICE", "DAYS"])
                    .rows(rows)
                    .print();
            }
            None => {
                let color = writer.color_enabled();
                let name = payload
                    .get("tariff_code")
                    .and_then(Value::as_u64)
                    .and_then(|c| u32::try_from(c).ok())
                    .and_then(find_tariff)
                    .map(|t| t.name.to_string())
                    .unwrap_or_else(|| cell(payload.get("tariff_code")));
                print_header(&format!("Tariff {}", name));
                print_field("Delivery", &cell(body.get("delivery_sum")), color);
                print_field("Total", &cell(body.get("total_sum")), color);
                print_field("Currency", &cell(body.get("currency")), color);
                print_field("Days", &period(&body), color);
            }
        }
        Ok(())
    }

    fn payload(&self) -> Result<Value> {
        if let Some(raw) = &self.data {
            let payload: Value = serde_json::from_str(raw)?;
            if !payload.is_object() {
                bail!("--data must be a JSON object");
            }
            return Ok(payload);
        }

        let mut package = json!({ "weight": self.weight });
        if let Some((length, width, height)) = self.size {
            package["length"] = json!(length);
            package["width"] = json!(width);
            package["height"] = json!(height);
        }

        let mut payload = json!({
            "from_location": { "code": self.from },
            "to_location": { "code": self.to },
            "packages": [package],
        });
        if let Some(code) = self.tariff {
            payload["tariff_code"] = json!(code);
        }
        Ok(payload)
    }
}

fn period(tariff: &Value) -> String {
    match (
        tariff.get("period_min").and_then(Value::as_u64),
        tariff.get("period_max").and_then(Value::as_u64),
    ) {
        (Some(min), Some(max)) if min == max => min.to_string(),
        (Some(min), Some(max)) => format!("{}-{}", min, max),
        (Some(days), None) | (None, Some(days)) => days.to_string(),
        (None, None) => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Wrapper {
        #[command(flatten)]
        calculate: CalculateCommand,
    }

    #[test]
    fn test_payload_from_flags() {
        let parsed = Wrapper::parse_from([
            "calculate", "--from", "44", "--to", "270", "--weight", "2000", "--size", "30x20x10",
            "--tariff", "136",
        ]);
        let payload = parsed.calculate.payload().unwrap();
        assert_eq!(payload["from_location"]["code"], json!(44));
        assert_eq!(payload["packages"][0], json!({"weight": 2000, "length": 30, "width": 20, "height": 10}));
        assert_eq!(payload["tariff_code"], json!(136));
    }

    #[test]
    fn test_flags_required_without_data() {
        assert!(Wrapper::try_parse_from(["calculate", "--from", "44"]).is_err());
        assert!(Wrapper::try_parse_from(["calculate", "--data", "{}"]).is_ok());
    }

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("30x20x10").unwrap(), (30, 20, 10));
        assert!(parse_size("30x20").is_err());
        assert!(parse_size("ax1x1").is_err());
    }

    #[test]
    fn test_period() {
        assert_eq!(period(&json!({"period_min": 2, "period_max": 4})), "2-4");
        assert_eq!(period(&json!({"period_min": 3, "period_max": 3})), "3");
        assert_eq!(period(&json!({})), "-");
    }
}
