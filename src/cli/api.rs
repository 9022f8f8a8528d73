//
//  cdek-client
//  cli/api.rs
//
//  Created by Ngonidzashe Mangudya on 2026/10/16.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! # Direct API Access
//!
//! Sends an authenticated request to any endpoint of the API, like
//! `gh api` does for GitHub. The token is obtained and cached the same way
//! the other commands do it.
//!
//! ```bash
//! # GET with query parameters
//! cdek api /location/cities -F country_codes=RU -F size=5
//!
//! # POST a body built from fields (dots nest objects)
//! cdek api /calculator/tarifflist -X POST \
//!     -F from_location.code=44 -F to_location.code=270 \
//!     -F 'packages=[{"weight": 500}]'
//!
//! # POST a body from a file (or - for stdin), or inline
//! cdek api /orders -X POST --input order.json
//! cdek api /webhooks -X POST --data '{"url": "https://example.com/hook", "type": "ORDER_STATUS"}'
//!
//! # Walk every page of a list endpoint
//! cdek api /location/regions -F country_codes=KZ --paginate --page-size 100
//! ```
//!
//! Empty parameters are dropped before sending, so `-F city=` removes a key
//! that came from `--input`.

use std::fs;

use anyhow::{bail, Result};
use clap::Args;
use reqwest::Method;
use serde_json::{Map, Value};

use crate::api::client::LOG_TARGET;
use crate::api::common::{page_records, PageRequest};
use crate::api::ApiError;
use crate::output::OutputWriter;

use super::action::parse_data;
use super::{GlobalOptions, Session};

#[derive(Args, Debug)]
pub struct ApiCommand {
    /// Endpoint path relative to the API root, e.g. /orders
    pub endpoint: String,

    /// HTTP method
    #[arg(long, short = 'X', default_value = "GET")]
    pub method: String,

    /// Parameter as key=value; values are parsed as JSON when possible
    #[arg(long, short = 'F', action = clap::ArgAction::Append)]
    pub field: Vec<String>,

    /// Parameter as key=value, always sent as a string
    #[arg(long, action = clap::ArgAction::Append)]
    pub raw_field: Vec<String>,

    /// Parameter object as inline JSON, or @file
    #[arg(long, short = 'd', conflicts_with = "input")]
    pub data: Option<String>,

    /// Read the parameter object from a file (- for stdin)
    #[arg(long, short = 'f')]
    pub input: Option<String>,

    /// Request page after page until a short page arrives (GET only)
    #[arg(long)]
    pub paginate: bool,

    /// Page size used with --paginate
    #[arg(long, default_value = "500")]
    pub page_size: u32,
}

impl ApiCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        let method = self.parse_method()?;
        let params = self.build_params()?;
        let path = normalize_path(&self.endpoint);

        if self.paginate && method != Method::GET {
            bail!("--paginate only works with GET requests");
        }

        let session = Session::open(global)?;
        let writer = OutputWriter::from_flag(true);

        let body = if self.paginate {
            self.fetch_all(&session, &path, params).await
        } else {
            let params = Value::Object(params);
            session.client().send(&path, Some(&params), method).await
        };

        match body {
            Ok(body) => writer.write_value(&body),
            Err(e) => fail(e),
        }
    }

    async fn fetch_all(
        &self,
        session: &Session,
        path: &str,
        params: Map<String, Value>,
    ) -> Result<Value, ApiError> {
        let mut records = Vec::new();
        let mut page = PageRequest::first(self.page_size.max(1));

        loop {
            let mut query = params.clone();
            page.apply(&mut query);
            let body = session
                .client()
                .send(path, Some(&Value::Object(query)), Method::GET)
                .await?;

            // A non-list answer ends pagination and is returned as is
            if !body.is_array() {
                return Ok(if records.is_empty() { body } else { Value::Array(records) });
            }

            let received = page_records(&body);
            tracing::debug!(
                target: LOG_TARGET,
                page = page.page,
                received = received.len(),
                "Fetched page"
            );
            records.extend_from_slice(received);

            if page.is_last(received.len()) {
                return Ok(Value::Array(records));
            }
            page = page.next();
        }
    }

    fn parse_method(&self) -> Result<Method> {
        match self.method.to_uppercase().as_str() {
            "GET" => Ok(Method::GET),
            "POST" => Ok(Method::POST),
            "PUT" => Ok(Method::PUT),
            "PATCH" => Ok(Method::PATCH),
            "DELETE" => Ok(Method::DELETE),
            _ => bail!("Unsupported HTTP method: {}", self.method),
        }
    }

    fn build_params(&self) -> Result<Map<String, Value>> {
        let mut params = match (&self.data, &self.input) {
            (Some(raw), _) => match parse_data(raw)? {
                Value::Object(map) => map,
                _ => bail!("--data must hold a JSON object"),
            },
            (None, Some(input)) => {
                let content = if input == "-" {
                    let mut buffer = String::new();
                    std::io::Read::read_to_string(&mut std::io::stdin(), &mut buffer)?;
                    buffer
                } else {
                    fs::read_to_string(input)?
                };
                match serde_json::from_str(&content)? {
                    Value::Object(map) => map,
                    _ => bail!("--input must hold a JSON object"),
                }
            }
            (None, None) => Map::new(),
        };

        for field in &self.field {
            let (key, raw) = split_field(field)?;
            set_nested_value(&mut params, key, parse_value(raw));
        }

        for field in &self.raw_field {
            let (key, raw) = split_field(field)?;
            set_nested_value(&mut params, key, Value::String(raw.to_string()));
        }

        Ok(params)
    }
}

fn fail(e: ApiError) -> Result<()> {
    bail!("{} (code {})", e.error_message(), e.error_code())
}

fn normalize_path(endpoint: &str) -> String {
    let trimmed = endpoint.trim();
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

fn split_field(field: &str) -> Result<(&str, &str)> {
    match field.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key, value)),
        _ => bail!("Invalid field format: {}. Expected key=value", field),
    }
}

fn parse_value(raw: &str) -> Value {
    match raw {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        "null" => Value::Null,
        _ => {
            if let Ok(n) = raw.parse::<i64>() {
                Value::from(n)
            } else if let Some(n) = raw.parse::<f64>().ok().and_then(serde_json::Number::from_f64) {
                Value::Number(n)
            } else if raw.starts_with('[') || raw.starts_with('{') {
                serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
            } else {
                Value::String(raw.to_string())
            }
        }
    }
}

fn set_nested_value(obj: &mut Map<String, Value>, key: &str, value: Value) {
    match key.split_once('.') {
        None => {
            obj.insert(key.to_string(), value);
        }
        Some((first, rest)) => {
            let entry = obj
                .entry(first.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            if let Value::Object(nested) = entry {
                set_nested_value(nested, rest, value);
            }
        }
    }
}
