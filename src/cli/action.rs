//
//  cdek-client
//  cli/action.rs
//
//  Created by Ngonidzashe Mangudya on 2026/10/16.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! `cdek action`: runs a named host action and prints its envelope.
//!
//! ```bash
//! cdek action offices --data '{"city_code": 44}'
//! cdek action calculate --data @request.json
//! ```

use std::fs;

use anyhow::{bail, Context, Result};
use clap::Args;
use serde_json::Value;

use crate::actions::run_action;
use crate::output::OutputWriter;

use super::{GlobalOptions, Session};

#[derive(Args, Debug)]
pub struct ActionCommand {
    /// Action name: offices or calculate
    pub name: String,

    /// Action parameters as JSON, or @file to read them from a file
    #[arg(long, short = 'd', default_value = "{}")]
    pub data: String,
}

impl ActionCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        let params = parse_data(&self.data)?;
        let session = Session::open(global)?;

        let response = run_action(&session.cdek, &self.name, &params).await;
        OutputWriter::from_flag(true).write_value(&response)?;

        if response.get("success").and_then(Value::as_bool) != Some(true) {
            bail!("Action '{}' failed", self.name);
        }
        Ok(())
    }
}

/// Parses `--data`, reading `@path` from disk.
pub(crate) fn parse_data(raw: &str) -> Result<Value> {
    let text = match raw.strip_prefix('@') {
        Some(path) => fs::read_to_string(path).with_context(|| format!("Failed to read {}", path))?,
        None => raw.to_string(),
    };
    let value: Value = serde_json::from_str(&text).context("--data is not valid JSON")?;
    if !value.is_object() {
        bail!("--data must be a JSON object");
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn test_parse_inline() {
        assert_eq!(parse_data(r#"{"a": 1}"#).unwrap(), json!({"a": 1}));
        assert!(parse_data("[]").is_err());
        assert!(parse_data("nope").is_err());
    }

    #[test]
    fn test_parse_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"city_code": 44}}"#).unwrap();
        let raw = format!("@{}", file.path().display());
        assert_eq!(parse_data(&raw).unwrap(), json!({"city_code": 44}));
    }
}
