//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::ops::Range;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::source::{PageSource, SourceError, Vehicle};

/// Vehicles `CAR-{n:03}` for every `n` in the range.
pub fn vehicles(range: Range<usize>) -> Vec<Vehicle> {
    range
        .map(|n| {
            Vehicle::new(
                format!("CAR-{n:03}"),
                format!("Inspection Vehicle {n}"),
                "Toyota Hilux",
                format!("ABC-{n:04}"),
            )
        })
        .collect()
}

/// A page source that serves canned pages and records every call.
///
/// Page `k` (offset / limit) is `pages[k]`, or empty past the end, whatever
/// the search term.
pub struct RecordingSource {
    pages: Vec<Vec<Vehicle>>,
    error: Option<SourceError>,
    latency: Duration,
    calls: Mutex<Vec<(String, usize, usize)>>,
}

impl RecordingSource {
    pub fn with_pages(pages: Vec<Vec<Vehicle>>) -> Self {
        Self {
            pages,
            error: None,
            latency: Duration::ZERO,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: SourceError) -> Self {
        Self {
            error: Some(error),
            ..Self::with_pages(Vec::new())
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// `(search_term, offset, limit)` for every fetch so far.
    pub fn calls(&self) -> Vec<(String, usize, usize)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }
}

#[async_trait]
impl PageSource for RecordingSource {
    fn name(&self) -> &str {
        "recording"
    }

    async fn fetch_page(
        &self,
        search_term: &str,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<Vehicle>, SourceError> {
        self.calls
            .lock()
            .unwrap()
            .push((search_term.to_string(), offset, limit));
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        if let Some(error) = &self.error {
            return Err(error.clone());
        }
        Ok(self.pages.get(offset / limit).cloned().unwrap_or_default())
    }
}
