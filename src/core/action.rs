//! # Actions
//!
//! Everything that can happen to a selector becomes an `Action`.
//! User types in the search box? That's `Action::SearchChanged(text)`.
//! A page comes back? That's `Action::PageLoaded { request, items }`.
//!
//! `update()` feeds the action to the coordinator and returns the `Effect`
//! the outside world has to carry out. No side effects here; the driver
//! spawns fetches and timers.
//!
//! ```text
//! Coordinator + Action  →  update()  →  Effect
//! ```

use std::time::Duration;

use crate::core::coordinator::QueryCoordinator;
use crate::source::{PageRequest, SourceError, Vehicle};

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Open,
    Close,
    SearchChanged(String),
    DebounceElapsed(u64),
    LoadNextPage,
    Retry,
    PageLoaded {
        request: PageRequest,
        items: Vec<Vehicle>,
    },
    PageFailed {
        request: PageRequest,
        error: SourceError,
    },
    /// A row was chosen. `current` is the host's controlled value.
    Select {
        id: String,
        current: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    Fetch(PageRequest),
    ScheduleDebounce { ticket: u64, delay: Duration },
    /// New controlled value for the host. Empty string clears the selection.
    ValueChanged(String),
}

impl Effect {
    /// True for the page-0 fetch that starts a new generation.
    #[cfg(test)]
    pub fn is_reset(&self) -> bool {
        matches!(self, Effect::Fetch(request) if request.page_index == 0)
    }
}

/// Picking the row that is already selected clears the selection.
pub fn next_value(current: Option<&str>, chosen: &str) -> String {
    if current == Some(chosen) {
        String::new()
    } else {
        chosen.to_string()
    }
}

pub fn update(coordinator: &mut QueryCoordinator, action: Action) -> Effect {
    let fetch = |request: Option<PageRequest>| request.map_or(Effect::None, Effect::Fetch);

    match action {
        Action::Open => fetch(coordinator.open()),
        Action::Close => {
            coordinator.close();
            Effect::None
        }
        Action::SearchChanged(term) => {
            let ticket = coordinator.set_search_term(&term);
            Effect::ScheduleDebounce {
                ticket,
                delay: coordinator.config().debounce,
            }
        }
        Action::DebounceElapsed(ticket) => fetch(coordinator.debounce_elapsed(ticket)),
        Action::LoadNextPage => fetch(coordinator.load_next_page()),
        Action::Retry => fetch(coordinator.retry()),
        Action::PageLoaded { request, items } => {
            coordinator.apply_page(&request, items);
            Effect::None
        }
        Action::PageFailed { request, error } => {
            coordinator.apply_failure(&request, &error);
            Effect::None
        }
        Action::Select { id, current } => {
            coordinator.close();
            Effect::ValueChanged(next_value(current.as_deref(), &id))
        }
    }
}
