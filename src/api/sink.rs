//
//  cdek-client
//  api/sink.rs
//
//  Created by Ngonidzashe Mangudya on 2026/10/16.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! Error sinks
//!
//! Every remote error is logged under the `cdek` tracing target. A host that
//! also wants to show those errors to its users (a web UI message queue, a
//! terminal) installs an [`ErrorSink`] on the client.

use std::sync::Mutex;

use console::style;

use super::common::ApiError;

/// Receives every remote error the client reports.
pub trait ErrorSink: Send + Sync {
    /// Called once per failed request.
    fn report(&self, error: &ApiError);
}

/// Prints errors to stderr.
#[derive(Debug, Default)]
pub struct StderrSink;

impl ErrorSink for StderrSink {
    fn report(&self, error: &ApiError) {
        eprintln!(
            "{} {} (code {})",
            style("cdek:").red().bold(),
            error.error_message(),
            error.error_code()
        );
    }
}

/// Collects errors in memory, for hosts that render them later.
#[derive(Debug, Default)]
pub struct QueueSink {
    messages: Mutex<Vec<String>>,
}

impl QueueSink {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes and returns every queued message.
    pub fn drain(&self) -> Vec<String> {
        let mut messages = self.messages.lock().unwrap_or_else(|e| e.into_inner());
        std::mem::take(&mut *messages)
    }
}

impl ErrorSink for QueueSink {
    fn report(&self, error: &ApiError) {
        let mut messages = self.messages.lock().unwrap_or_else(|e| e.into_inner());
        messages.push(error.to_string());
    }
}
