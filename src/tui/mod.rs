//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI, and
//! routes keyboard events to the vehicle picker, which turns them into
//! `core::Action` values for its selector.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Redraw Strategy
//!
//! - **Picker open**: polls every ~80ms so finished fetches and fired
//!   debounce timers show up promptly, and the sentinel is re-checked after
//!   every frame.
//! - **Picker closed**: sleeps up to 500ms, only redraws on events or
//!   terminal resize.

mod component;
mod components;
mod event;
mod ui;

use log::{info, warn};
use std::io::stdout;
use std::sync::Arc;
use std::time::Duration;

use crossterm::cursor::{Hide, Show};
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;

use crate::core::config::ResolvedConfig;
use crate::driver::Selector;
use crate::source::{MemoryPageSource, PageSource, RestPageSource, SourceError, Vehicle};
use crate::tui::component::EventHandler;
use crate::tui::components::{PickerEvent, VehiclePickerState};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    /// The controlled value: id of the chosen vehicle.
    pub value: Option<String>,
    pub placeholder: String,
    pub status_message: String,
    pub source_name: String,
    // Created on first open, kept for the rest of the session
    pub picker: Option<VehiclePickerState>,
}

impl TuiState {
    pub fn new(source_name: String, placeholder: String) -> Self {
        Self {
            value: None,
            placeholder,
            status_message: String::new(),
            source_name,
            picker: None,
        }
    }

    /// The chosen vehicle, if it is among the rows the picker has loaded.
    pub fn selected_vehicle(&self) -> Option<&Vehicle> {
        let value = self.value.as_deref()?;
        self.picker.as_ref()?.coordinator().selected_item(value)
    }

    fn apply_picker_event(&mut self, event: PickerEvent) {
        match event {
            PickerEvent::ValueChanged(value) if value.is_empty() => {
                info!("Selection cleared");
                self.value = None;
                self.status_message = "Selection cleared".to_string();
            }
            PickerEvent::ValueChanged(value) => {
                info!("Selected vehicle {}", value);
                self.status_message = format!("Selected {}", value);
                self.value = Some(value);
            }
            PickerEvent::Dismiss => {}
        }
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(stdout(), EnableMouseCapture, Hide)?;
        info!("Terminal modes enabled (mouse, hidden cursor)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), DisableMouseCapture, Show);
    }
}

/// Build the page source named by the resolved config.
pub fn build_source(config: &ResolvedConfig) -> Result<Arc<dyn PageSource>, SourceError> {
    match config.source.as_str() {
        "rest" => {
            let base_url = config.rest_base_url.clone().ok_or_else(|| {
                SourceError::Config(
                    "rest source needs a base URL ([rest] base_url or FLEETPICK_BASE_URL)"
                        .to_string(),
                )
            })?;
            Ok(Arc::new(RestPageSource::new(
                base_url,
                config.rest_api_key.clone(),
                config.rest_table.clone(),
            )))
        }
        "memory" => {
            let source =
                MemoryPageSource::sample_fleet(config.fleet_size).with_latency(config.memory_latency);
            if source.is_empty() {
                warn!("Memory source has no vehicles (fleet_size = 0)");
            } else {
                info!("Memory source with {} vehicles", source.len());
            }
            Ok(Arc::new(source))
        }
        other => Err(SourceError::Config(format!("unknown source '{}'", other))),
    }
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let source = build_source(&config).map_err(std::io::Error::other)?;
    let mut tui = TuiState::new(source.name().to_string(), config.placeholder.clone());

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    let mut needs_redraw = true; // Force first frame

    loop {
        let picker_open = tui.picker.as_ref().is_some_and(|p| p.is_open());

        if let Some(picker) = tui.picker.as_mut() {
            picker.value = tui.value.clone();
            if picker.sync() {
                needs_redraw = true;
            }
        }

        if needs_redraw {
            terminal.draw(|f| ui::draw_ui(f, &mut tui))?;
            needs_redraw = false;

            // The sentinel check needs the viewport of the frame just drawn
            if let Some(picker) = tui.picker.as_mut()
                && picker.is_open()
                && picker.observe_viewport()
            {
                needs_redraw = true;
            }
        }

        let timeout = if picker_open {
            Duration::from_millis(80)
        } else {
            Duration::from_millis(500)
        };
        let first_event = poll_event_timeout(timeout);

        // Process first event + drain ALL pending events before next draw
        let mut should_quit = false;
        if first_event.is_some() {
            needs_redraw = true;
        }
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            if matches!(event, TuiEvent::Resize) {
                continue;
            }

            if matches!(event, TuiEvent::ForceQuit) {
                should_quit = true;
                break;
            }

            // When the picker is open, route all events to it
            if let Some(picker) = tui.picker.as_mut()
                && picker.is_open()
            {
                picker.value = tui.value.clone();
                if let Some(picker_event) = picker.handle_event(&event) {
                    tui.apply_picker_event(picker_event);
                }
                continue;
            }

            match event {
                TuiEvent::Submit => {
                    let picker = tui.picker.get_or_insert_with(|| {
                        info!("Creating vehicle picker (source: {})", source.name());
                        let selector = Selector::new(
                            source.clone(),
                            config.coordinator_config(),
                            config.fetch_timeout,
                        );
                        VehiclePickerState::new(selector, config.visibility_threshold)
                    });
                    picker.value = tui.value.clone();
                    picker.open();
                }
                TuiEvent::Escape | TuiEvent::InputChar('q') => {
                    should_quit = true;
                    break;
                }
                _ => {}
            }
        }

        if should_quit {
            break;
        }
    }

    if let Some(picker) = tui.picker.as_ref()
        && let Some(err) = picker.coordinator().state().last_error.as_ref()
    {
        warn!("Exiting with last fetch error: {}", err);
    }

    ratatui::restore();
    Ok(())
}
