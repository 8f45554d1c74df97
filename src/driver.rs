//! # Effect Driver
//!
//! Carries out the `Effect`s the core asks for, on tokio, and reports back
//! through an `Action` channel:
//!
//! - `Effect::Fetch` spawns one page fetch bounded by the fetch timeout.
//!   Starting a fetch aborts whatever fetch is still running, since the
//!   coordinator only issues a second one after a reset.
//! - `Effect::ScheduleDebounce` (re)arms this driver's debounce timer. The
//!   previous timer is aborted, so only the last keystroke's timer fires.
//!
//! Aborting is only an optimisation. A result that slips through is still
//! dropped by the coordinator's generation check.
//!
//! [`Selector`] bundles one coordinator with its own driver and channel; every
//! mounted selector gets its own, so timers never leak between instances.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tokio::task::AbortHandle;

use crate::core::action::{Action, Effect, update};
use crate::core::coordinator::{CoordinatorConfig, QueryCoordinator};
use crate::source::{PageRequest, PageSource, SourceError};

pub struct SelectorDriver {
    source: Arc<dyn PageSource>,
    tx: UnboundedSender<Action>,
    fetch_timeout: Duration,
    debounce_timer: Option<AbortHandle>,
    in_flight: Option<AbortHandle>,
}

impl SelectorDriver {
    pub fn new(
        source: Arc<dyn PageSource>,
        tx: UnboundedSender<Action>,
        fetch_timeout: Duration,
    ) -> Self {
        Self {
            source,
            tx,
            fetch_timeout,
            debounce_timer: None,
            in_flight: None,
        }
    }

    pub fn execute(&mut self, effect: &Effect) {
        match effect {
            Effect::Fetch(request) => self.spawn_fetch(request.clone()),
            Effect::ScheduleDebounce { ticket, delay } => self.schedule_debounce(*ticket, *delay),
            Effect::ValueChanged(_) | Effect::None => {}
        }
    }

    fn schedule_debounce(&mut self, ticket: u64, delay: Duration) {
        if let Some(timer) = self.debounce_timer.take() {
            timer.abort();
        }
        let tx = self.tx.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if tx.send(Action::DebounceElapsed(ticket)).is_err() {
                warn!("Failed to deliver debounce ticket {}: receiver dropped", ticket);
            }
        });
        self.debounce_timer = Some(handle.abort_handle());
    }

    fn spawn_fetch(&mut self, request: PageRequest) {
        if let Some(previous) = self.in_flight.take() {
            previous.abort();
        }

        info!(
            "Spawning {} fetch: generation={}, page={}",
            self.source.name(),
            request.generation,
            request.page_index
        );

        let source = self.source.clone();
        let tx = self.tx.clone();
        let timeout = self.fetch_timeout;
        let handle = tokio::spawn(async move {
            let result = tokio::time::timeout(
                timeout,
                source.fetch_page(&request.search_term, request.offset, request.limit),
            )
            .await;

            let action = match result {
                Ok(Ok(items)) => {
                    debug!(
                        "Fetch resolved: generation={}, page={}, {} items",
                        request.generation,
                        request.page_index,
                        items.len()
                    );
                    Action::PageLoaded { request, items }
                }
                Ok(Err(error)) => Action::PageFailed { request, error },
                Err(_) => {
                    warn!(
                        "Fetch timed out after {}s (generation={}, page={})",
                        timeout.as_secs(),
                        request.generation,
                        request.page_index
                    );
                    Action::PageFailed {
                        request,
                        error: SourceError::Timeout {
                            secs: timeout.as_secs(),
                        },
                    }
                }
            };

            if tx.send(action).is_err() {
                warn!("Failed to deliver fetch result: receiver dropped");
            }
        });
        self.in_flight = Some(handle.abort_handle());
    }
}

impl Drop for SelectorDriver {
    fn drop(&mut self) {
        for handle in [self.debounce_timer.take(), self.in_flight.take()]
            .into_iter()
            .flatten()
        {
            handle.abort();
        }
    }
}

/// One mounted selector: coordinator, driver and the channel between them.
pub struct Selector {
    coordinator: QueryCoordinator,
    driver: SelectorDriver,
    rx: UnboundedReceiver<Action>,
}

impl Selector {
    pub fn new(
        source: Arc<dyn PageSource>,
        config: CoordinatorConfig,
        fetch_timeout: Duration,
    ) -> Self {
        let (tx, rx) = unbounded_channel();
        Self {
            coordinator: QueryCoordinator::new(config),
            driver: SelectorDriver::new(source, tx, fetch_timeout),
            rx,
        }
    }

    pub fn coordinator(&self) -> &QueryCoordinator {
        &self.coordinator
    }

    /// Runs an action through the coordinator and executes the resulting effect.
    pub fn dispatch(&mut self, action: Action) -> Effect {
        let effect = update(&mut self.coordinator, action);
        self.driver.execute(&effect);
        effect
    }

    /// Applies every background action that has already arrived.
    /// Returns how many were processed.
    pub fn drain(&mut self) -> usize {
        let mut processed = 0;
        while let Ok(action) = self.rx.try_recv() {
            self.dispatch(action);
            processed += 1;
        }
        processed
    }

    /// Waits for the next background action and applies it.
    pub async fn process_next(&mut self) -> Option<Effect> {
        let action = self.rx.recv().await?;
        Some(self.dispatch(action))
    }
}
