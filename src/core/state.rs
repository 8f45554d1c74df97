//! # Search State
//!
//! One search "generation": everything the selector has loaded for the
//! current search term since the last reset.
//!
//! ```text
//! SearchState
//! ├── generation: u64          // bumped on every reset
//! ├── search_term: String      // trimmed term this generation was issued for
//! ├── page_index: usize        // completed page fetches since the reset
//! ├── loaded_items: Vec        // fetch order, no dedup
//! ├── has_more: bool           // false after a short page or a failure
//! ├── is_loading: bool         // single-flight guard for the fetch
//! └── last_error: Option       // message of the failure that stopped paging
//! ```
//!
//! A reset never mutates this struct in place; the coordinator swaps in a
//! fresh one with the next generation number.

use crate::source::Vehicle;

#[derive(Debug, Clone, PartialEq)]
pub struct SearchState {
    pub generation: u64,
    pub search_term: String,
    pub page_index: usize,
    pub loaded_items: Vec<Vehicle>,
    pub has_more: bool,
    pub is_loading: bool,
    pub last_error: Option<String>,
}

impl SearchState {
    pub fn new(generation: u64, search_term: String) -> Self {
        Self {
            generation,
            search_term,
            page_index: 0,
            loaded_items: Vec::new(),
            has_more: true,
            is_loading: false,
            last_error: None,
        }
    }

    /// True when nothing is loaded and nothing is on its way.
    pub fn shows_empty_state(&self) -> bool {
        self.loaded_items.is_empty() && !self.is_loading
    }

    /// Whether the trailing loading/sentinel row should be rendered.
    pub fn shows_sentinel(&self) -> bool {
        self.has_more
    }
}

impl Default for SearchState {
    fn default() -> Self {
        Self::new(0, String::new())
    }
}
