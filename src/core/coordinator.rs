//! # Query Coordinator
//!
//! Mediates every search and paging request for one mounted selector.
//! It does no I/O: operations hand back a [`PageRequest`] when a fetch should
//! go out, and results come back in through [`QueryCoordinator::apply_page`] /
//! [`QueryCoordinator::apply_failure`].
//!
//! ```text
//!   open() ─────────────┐
//!   debounce_elapsed() ─┼─► reset ─► PageRequest(page 0, gen N+1)
//!   retry() ────────────┘
//!   load_next_page() ──────────────► PageRequest(page k, gen N)   [single-flight]
//!
//!   apply_page / apply_failure: dropped unless (generation, page_index)
//!   still matches the request that is actually in flight
//! ```
//!
//! The debounce itself is a ticket: `set_search_term` bumps it, and only the
//! timer carrying the latest ticket is allowed to reset. The timer task lives
//! in the driver, one per coordinator.

use std::time::Duration;

use log::{debug, info, warn};

use crate::core::state::SearchState;
use crate::source::{PageRequest, SourceError, Vehicle};

pub const DEFAULT_PAGE_SIZE: usize = 5;
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoordinatorConfig {
    /// Items requested per fetch. Always > 0.
    pub page_size: usize,
    /// Quiet period before a search term change resets the list.
    pub debounce: Duration,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            debounce: DEFAULT_DEBOUNCE,
        }
    }
}

/// What happened to a fetch result handed back to the coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageOutcome {
    /// Items were appended to the current generation.
    Applied { appended: usize },
    /// The fetch failed; paging stopped for this generation.
    Failed,
    /// The result belonged to a superseded request and was ignored.
    Stale,
}

pub struct QueryCoordinator {
    config: CoordinatorConfig,
    state: SearchState,
    pending_term: String,
    debounce_ticket: u64,
    is_open: bool,
}

impl QueryCoordinator {
    pub fn new(config: CoordinatorConfig) -> Self {
        Self {
            config: CoordinatorConfig {
                page_size: config.page_size.max(1),
                ..config
            },
            state: SearchState::default(),
            pending_term: String::new(),
            debounce_ticket: 0,
            is_open: false,
        }
    }

    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    /// The raw text in the search field, committed or not.
    pub fn pending_term(&self) -> &str {
        &self.pending_term
    }

    /// Opens the selector. Fetches the unfiltered first page when nothing is
    /// loaded yet.
    ///
    /// A term typed just before the last close, whose debounce fired while
    /// closed, is committed here instead.
    pub fn open(&mut self) -> Option<PageRequest> {
        let was_open = self.is_open;
        self.is_open = true;
        let term = self.pending_term.trim();
        if !was_open && term != self.state.search_term {
            let term = term.to_string();
            // Void the timer that may still be running for this term.
            self.debounce_ticket += 1;
            return Some(self.reset_and_fetch(term));
        }
        if !self.state.loaded_items.is_empty() || self.state.is_loading {
            return None;
        }
        self.pending_term.clear();
        // The pending term is already committed here, so an empty list restarts unfiltered.
        self.debounce_ticket += 1;
        Some(self.reset_and_fetch(String::new()))
    }

    pub fn close(&mut self) {
        self.is_open = false;
    }

    /// Records a new search term and returns the debounce ticket the timer
    /// must present to [`Self::debounce_elapsed`]. Earlier tickets are void.
    pub fn set_search_term(&mut self, term: &str) -> u64 {
        self.pending_term = term.to_string();
        self.debounce_ticket += 1;
        debug!(
            "Search term changed to {:?} (ticket {})",
            term, self.debounce_ticket
        );
        self.debounce_ticket
    }

    /// Called when a debounce timer fires. Resets and fetches page 0 for the
    /// pending term, unless a newer keystroke has superseded this ticket or the
    /// selector has been closed in the meantime.
    pub fn debounce_elapsed(&mut self, ticket: u64) -> Option<PageRequest> {
        if ticket != self.debounce_ticket {
            debug!(
                "Debounce ticket {} superseded by {}",
                ticket, self.debounce_ticket
            );
            return None;
        }
        if !self.is_open {
            return None;
        }
        let term = self.pending_term.trim().to_string();
        Some(self.reset_and_fetch(term))
    }

    /// Requests the next page of the current generation. No-op while a fetch is
    /// in flight or once the end of the data has been reached.
    pub fn load_next_page(&mut self) -> Option<PageRequest> {
        if self.state.is_loading || !self.state.has_more {
            return None;
        }
        Some(self.begin_fetch())
    }

    /// Starts over for the current term after a failure stopped paging.
    ///
    /// This is a full reset, so `has_more` only comes back through a new
    /// generation.
    pub fn retry(&mut self) -> Option<PageRequest> {
        if self.state.last_error.is_none() || self.state.is_loading {
            return None;
        }
        let term = self.state.search_term.clone();
        info!("Retrying search {:?} after failure", term);
        Some(self.reset_and_fetch(term))
    }

    /// Applies a successful fetch.
    pub fn apply_page(&mut self, request: &PageRequest, items: Vec<Vehicle>) -> PageOutcome {
        if self.is_stale(request) {
            debug!(
                "Discarding stale page {} of generation {} (current generation {})",
                request.page_index, request.generation, self.state.generation
            );
            return PageOutcome::Stale;
        }

        if items.len() > self.config.page_size {
            let error = SourceError::Parse(format!(
                "page holds {} items, limit is {}",
                items.len(),
                self.config.page_size
            ));
            return self.fail(&error);
        }

        let appended = items.len();
        self.state.is_loading = false;
        self.state.page_index += 1;
        self.state.has_more = appended == self.config.page_size;
        self.state.loaded_items.extend(items);

        debug!(
            "Applied page {} of generation {}: {} items, {} loaded, has_more={}",
            request.page_index,
            request.generation,
            appended,
            self.state.loaded_items.len(),
            self.state.has_more
        );
        PageOutcome::Applied { appended }
    }

    /// Applies a failed fetch: paging stops, loaded items stay.
    pub fn apply_failure(&mut self, request: &PageRequest, error: &SourceError) -> PageOutcome {
        if self.is_stale(request) {
            debug!(
                "Discarding stale failure for generation {}: {}",
                request.generation, error
            );
            return PageOutcome::Stale;
        }
        self.fail(error)
    }

    /// Looks up a vehicle in the loaded window only; never fetches.
    pub fn selected_item(&self, id: &str) -> Option<&Vehicle> {
        self.state.loaded_items.iter().find(|v| v.id_unico == id)
    }

    fn fail(&mut self, error: &SourceError) -> PageOutcome {
        warn!(
            "Error fetching vehicles (term {:?}, page {}): {}",
            self.state.search_term, self.state.page_index, error
        );
        self.state.is_loading = false;
        self.state.has_more = false;
        self.state.last_error = Some(error.to_string());
        PageOutcome::Failed
    }

    fn is_stale(&self, request: &PageRequest) -> bool {
        request.generation != self.state.generation
            || request.page_index != self.state.page_index
            || !self.state.is_loading
    }

    fn reset_and_fetch(&mut self, term: String) -> PageRequest {
        let generation = self.state.generation + 1;
        info!("Resetting search to {:?} (generation {})", term, generation);
        self.state = SearchState::new(generation, term);
        self.begin_fetch()
    }

    fn begin_fetch(&mut self) -> PageRequest {
        self.state.is_loading = true;
        let request = PageRequest {
            generation: self.state.generation,
            page_index: self.state.page_index,
            search_term: self.state.search_term.clone(),
            offset: self.state.page_index * self.config.page_size,
            limit: self.config.page_size,
        };
        debug!(
            "Issuing fetch: generation={}, page={}, offset={}, limit={}",
            request.generation, request.page_index, request.offset, request.limit
        );
        request
    }
}
