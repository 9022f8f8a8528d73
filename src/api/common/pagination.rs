//
//  cdek-client
//  api/common/pagination.rs
//
//  Created by Ngonidzashe Mangudya on 2026/10/16.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! Pagination Types for CDEK List Endpoints
//!
//! The location and delivery-point endpoints use offset pagination driven by
//! two query parameters: `page` (0-indexed) and `size`. The API does not
//! report a total or a "last page" flag, so the only signal that the last
//! page has been reached is a page holding fewer records than were asked for.
//!
//! # Example
//!
//! ```rust
//! use cdek_client::api::common::PageRequest;
//!
//! let mut page = PageRequest::first(500);
//! assert_eq!(page.page, 0);
//!
//! assert!(!page.is_last(500));
//! page = page.next();
//! assert_eq!(page.page, 1);
//! assert!(page.is_last(120));
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One page of an offset-paginated request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Page number, starting at 0.
    pub page: u32,

    /// Maximum number of records per page.
    pub size: u32,
}

impl PageRequest {
    /// The first page for the given page size.
    pub fn first(size: u32) -> Self {
        Self { page: 0, size }
    }

    /// The page after this one.
    pub fn next(self) -> Self {
        Self {
            page: self.page + 1,
            size: self.size,
        }
    }

    /// Whether a page holding `received` records is the last one.
    pub fn is_last(&self, received: usize) -> bool {
        received < self.size as usize
    }

    /// Writes `page` and `size` into a parameter object.
    pub fn apply(&self, params: &mut Map<String, Value>) {
        params.insert("page".to_string(), Value::from(self.page));
        params.insert("size".to_string(), Value::from(self.size));
    }
}

/// Returns the records of a list response.
///
/// List endpoints answer with a bare JSON array; anything else is treated as
/// an empty page.
pub fn page_records(body: &Value) -> &[Value] {
    body.as_array().map(Vec::as_slice).unwrap_or(&[])
}
