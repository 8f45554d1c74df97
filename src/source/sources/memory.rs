//! In-memory page source.
//!
//! Serves the dashboard's mock inspection fleet with the same matching and
//! ordering rules as the REST table: OR-style case-insensitive substring match
//! over every display column, newest `created_at` first.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use log::debug;

use crate::source::{PageSource, SourceError, Vehicle};

const MODELS: [&str; 5] = [
    "Toyota Hilux",
    "Ford Ranger",
    "Chevrolet S10",
    "Mitsubishi L200",
    "Nissan Frontier",
];

/// A stored row: the vehicle plus its creation timestamp (the sort key).
#[derive(Debug, Clone)]
struct Row {
    vehicle: Vehicle,
    created_at: DateTime<Utc>,
}

pub struct MemoryPageSource {
    rows: Vec<Row>,
    latency: Duration,
}

impl MemoryPageSource {
    /// Builds a source from `(vehicle, created_at)` pairs.
    pub fn new(rows: Vec<(Vehicle, DateTime<Utc>)>) -> Self {
        let mut rows: Vec<Row> = rows
            .into_iter()
            .map(|(vehicle, created_at)| Row {
                vehicle,
                created_at,
            })
            .collect();
        // Stable sort keeps insertion order among equal timestamps.
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Self {
            rows,
            latency: Duration::ZERO,
        }
    }

    /// The mock inspection fleet, `count` vehicles, created one day apart.
    pub fn sample_fleet(count: usize) -> Self {
        let base = Utc
            .with_ymd_and_hms(2023, 1, 1, 8, 0, 0)
            .single()
            .unwrap_or_default();
        let rows = (1..=count)
            .map(|n| {
                let vehicle = Vehicle::new(
                    format!("CAR-{n:03}"),
                    format!("Inspection Vehicle {n}"),
                    MODELS[(n - 1) % MODELS.len()],
                    format!(
                        "{}{}{}-{:04}",
                        (b'A' + (n % 26) as u8) as char,
                        (b'B' + (n % 25) as u8) as char,
                        (b'C' + (n % 24) as u8) as char,
                        1000 + n * 37 % 9000
                    ),
                );
                (vehicle, base + chrono::Duration::days(n as i64))
            })
            .collect();
        Self::new(rows)
    }

    /// Delays every fetch, so the loading states can actually be seen.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[async_trait]
impl PageSource for MemoryPageSource {
    fn name(&self) -> &str {
        "memory"
    }

    async fn fetch_page(
        &self,
        search_term: &str,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<Vehicle>, SourceError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let term = search_term.trim();
        let page: Vec<Vehicle> = self
            .rows
            .iter()
            .filter(|row| term.is_empty() || row.vehicle.matches(term))
            .skip(offset)
            .take(limit)
            .map(|row| row.vehicle.clone())
            .collect();

        debug!(
            "Memory page: term={:?}, offset={}, limit={} -> {} rows",
            term,
            offset,
            limit,
            page.len()
        );
        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(page: &[Vehicle]) -> Vec<&str> {
        page.iter().map(|v| v.id_unico.as_str()).collect()
    }

    #[test]
    fn test_sample_fleet_size() {
        let source = MemoryPageSource::sample_fleet(23);
        assert_eq!(source.len(), 23);
        assert!(!source.is_empty());
        assert!(MemoryPageSource::sample_fleet(0).is_empty());
    }

    #[tokio::test]
    async fn test_newest_first() {
        let source = MemoryPageSource::sample_fleet(4);
        let page = source.fetch_page("", 0, 10).await.unwrap();
        assert_eq!(ids(&page), vec!["CAR-004", "CAR-003", "CAR-002", "CAR-001"]);
    }

    #[tokio::test]
    async fn test_offset_and_limit_window() {
        let source = MemoryPageSource::sample_fleet(12);
        let first = source.fetch_page("", 0, 5).await.unwrap();
        let second = source.fetch_page("", 5, 5).await.unwrap();
        let third = source.fetch_page("", 10, 5).await.unwrap();
        assert_eq!(first.len(), 5);
        assert_eq!(second.len(), 5);
        assert_eq!(third.len(), 2);
        assert_eq!(first[0].id_unico, "CAR-012");
        assert_eq!(second[0].id_unico, "CAR-007");
        assert_eq!(ids(&third), vec!["CAR-002", "CAR-001"]);
    }

    #[tokio::test]
    async fn test_search_matches_any_column() {
        let source = MemoryPageSource::sample_fleet(10);
        let page = source.fetch_page("ranger", 0, 10).await.unwrap();
        assert!(!page.is_empty());
        assert!(page.iter().all(|v| v.model == "Ford Ranger"));

        let by_id = source.fetch_page("car-007", 0, 10).await.unwrap();
        assert_eq!(ids(&by_id), vec!["CAR-007"]);
    }

    #[tokio::test]
    async fn test_search_term_is_trimmed() {
        let source = MemoryPageSource::sample_fleet(10);
        let page = source.fetch_page("  car-003 ", 0, 10).await.unwrap();
        assert_eq!(ids(&page), vec!["CAR-003"]);
    }

    #[tokio::test]
    async fn test_offset_past_end_is_empty() {
        let source = MemoryPageSource::sample_fleet(3);
        let page = source.fetch_page("", 10, 5).await.unwrap();
        assert!(page.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_latency_delays_fetch() {
        let source = MemoryPageSource::sample_fleet(3).with_latency(Duration::from_millis(400));
        let started = tokio::time::Instant::now();
        source.fetch_page("", 0, 5).await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(400));
    }
}
