//
//  cdek-client
//  api/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/10/16.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! # API Client Layer
//!
//! HTTP plumbing for the CDEK REST API v2.
//!
//! ## Environments
//!
//! - **Production**: `https://api.cdek.ru/v2`
//! - **Sandbox**: `https://api.edu.cdek.ru/v2` (selected by `Credentials::test_mode`)
//!
//! ## Architecture
//!
//! - [`client`]: Token-aware transport ([`CdekClient`])
//! - [`common`]: Error types, provider error extractors, pagination helpers
//! - [`params`]: Parameter cleaning and query-string flattening
//! - [`sink`]: Receivers for remote errors
//!
//! ## Error Handling
//!
//! Every call returns [`ApiResult`]. Failures are [`ApiError`] values and can
//! be turned into the plain `{error_code, error_message}` record with
//! [`ApiError::to_record`]:
//!
//! - `Validation`: a required field was missing, nothing was sent (`"500"`)
//! - `Client`: HTTP 4xx, message taken from the provider's body
//! - `Server`: HTTP 5xx, generic message, body logged
//! - `Transport`: no HTTP response at all

/// Token-aware HTTP transport.
pub mod client;

/// Types shared by the transport and the entity handlers.
pub mod common;

/// Request parameter normalisation.
pub mod params;

/// Error sinks for mirroring remote errors to a host UI.
pub mod sink;

pub use client::CdekClient;
pub use common::{ApiError, ApiResult, ErrorRecord};
pub use sink::{ErrorSink, QueueSink, StderrSink};
