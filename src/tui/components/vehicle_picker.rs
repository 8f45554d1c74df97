//! # Vehicle Picker Component
//!
//! Overlay for choosing an inspection vehicle from a server-side search that
//! loads more rows as the list is scrolled. Opened from the vehicle field with
//! Enter, dismissed with Esc.
//!
//! Follows the persistent state + transient wrapper pattern:
//! - `VehiclePickerState` lives in `TuiState` for the rest of the session once
//!   the picker is first opened, so reopening keeps what was loaded
//! - `VehiclePicker` is created each frame with borrowed state
//!
//! The state owns a [`Selector`]; this component only turns keys into
//! coordinator actions and draws whatever the coordinator holds. After each
//! draw, [`VehiclePickerState::observe_viewport`] checks whether the trailing
//! sentinel row came into view and asks for the next page if so.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Padding, Paragraph};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::core::action::{Action, Effect};
use crate::core::coordinator::QueryCoordinator;
use crate::driver::Selector;
use crate::source::Vehicle;
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::visibility::{VisibilityTrigger, visible_fraction};
use crate::tui::event::TuiEvent;

const SEARCH_PLACEHOLDER: &str = "Search cars...";
const EMPTY_MESSAGE: &str = "No cars found.";
const LOADING_MESSAGE: &str = "Loading...";
const LOADING_MORE: &str = "Loading more...";
const SCROLL_FOR_MORE: &str = "Scroll for more";
const LOAD_FAILED: &str = "Failed to load. Ctrl+R to retry";

/// Persistent state for the vehicle picker overlay.
pub struct VehiclePickerState {
    selector: Selector,
    /// Text in the search field.
    pub query: String,
    /// The host's controlled value, synced in before events are handled.
    pub value: Option<String>,
    pub selected: usize,
    pub list_state: ListState,
    trigger: VisibilityTrigger,
    seen_generation: u64,
    /// `(offset, height)` of the list as last drawn, `None` when no list was drawn.
    viewport: Option<(usize, usize)>,
}

/// Events emitted by the vehicle picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerEvent {
    /// New controlled value; empty clears the selection.
    ValueChanged(String),
    Dismiss,
}

impl VehiclePickerState {
    pub fn new(selector: Selector, visibility_threshold: f32) -> Self {
        Self {
            selector,
            query: String::new(),
            value: None,
            selected: 0,
            list_state: ListState::default(),
            trigger: VisibilityTrigger::new(visibility_threshold),
            seen_generation: 0,
            viewport: None,
        }
    }

    pub fn coordinator(&self) -> &QueryCoordinator {
        self.selector.coordinator()
    }

    pub fn is_open(&self) -> bool {
        self.coordinator().is_open()
    }

    pub fn open(&mut self) {
        self.selector.dispatch(Action::Open);
        self.sync_generation();
    }

    /// Applies finished fetches and fired timers. Returns true if anything arrived.
    pub fn sync(&mut self) -> bool {
        let processed = self.selector.drain();
        self.sync_generation();
        processed > 0
    }

    /// Checks the sentinel against the last drawn viewport and requests the
    /// next page when it just became visible. Returns true if a fetch went out.
    pub fn observe_viewport(&mut self) -> bool {
        let Some((offset, height)) = self.viewport else {
            return false;
        };
        let state = self.coordinator().state();
        if !state.shows_sentinel() || state.loaded_items.is_empty() {
            return false;
        }
        let sentinel_row = state.loaded_items.len();
        let fraction = visible_fraction(sentinel_row, 1, offset, height);
        if !self.trigger.observe(sentinel_row, fraction) {
            return false;
        }
        log::debug!("Sentinel row {} became visible", sentinel_row);
        matches!(self.selector.dispatch(Action::LoadNextPage), Effect::Fetch(_))
    }

    /// Rows in the list: vehicles plus the trailing sentinel or error row.
    fn row_count(&self) -> usize {
        let state = self.coordinator().state();
        let trailing = state.has_more || state.last_error.is_some();
        state.loaded_items.len() + usize::from(trailing)
    }

    fn sync_generation(&mut self) {
        let generation = self.coordinator().state().generation;
        if generation != self.seen_generation {
            self.seen_generation = generation;
            self.query = self.coordinator().pending_term().to_string();
            self.selected = 0;
            self.list_state = ListState::default();
            self.trigger.reset();
            self.viewport = None;
        }
        self.move_selection(0);
    }

    fn move_selection(&mut self, delta: isize) {
        let rows = self.row_count();
        if rows == 0 {
            self.selected = 0;
            self.list_state.select(None);
            return;
        }
        self.selected = self.selected.saturating_add_signed(delta).min(rows - 1);
        self.list_state.select(Some(self.selected));
    }

    fn page_step(&self) -> isize {
        self.viewport
            .map(|(_, height)| height.max(1) as isize)
            .unwrap_or(5)
    }

    fn search_changed(&mut self) {
        self.selector
            .dispatch(Action::SearchChanged(self.query.clone()));
    }

    #[cfg(test)]
    pub(crate) async fn wait_for_background(&mut self) {
        self.selector.process_next().await;
        self.sync_generation();
    }
}

impl EventHandler for VehiclePickerState {
    type Event = PickerEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<PickerEvent> {
        match event {
            TuiEvent::Escape => {
                self.selector.dispatch(Action::Close);
                Some(PickerEvent::Dismiss)
            }
            TuiEvent::Submit => {
                let id = self
                    .coordinator()
                    .state()
                    .loaded_items
                    .get(self.selected)?
                    .id_unico
                    .clone();
                match self.selector.dispatch(Action::Select {
                    id,
                    current: self.value.clone(),
                }) {
                    Effect::ValueChanged(value) => Some(PickerEvent::ValueChanged(value)),
                    _ => None,
                }
            }
            TuiEvent::InputChar(c) => {
                self.query.push(*c);
                self.search_changed();
                None
            }
            TuiEvent::Backspace => {
                if self.query.pop().is_some() {
                    self.search_changed();
                }
                None
            }
            TuiEvent::CursorUp | TuiEvent::ScrollUp => {
                self.move_selection(-1);
                None
            }
            TuiEvent::CursorDown | TuiEvent::ScrollDown => {
                self.move_selection(1);
                None
            }
            TuiEvent::PageUp => {
                self.move_selection(-self.page_step());
                None
            }
            TuiEvent::PageDown => {
                self.move_selection(self.page_step());
                None
            }
            TuiEvent::Retry => {
                self.selector.dispatch(Action::Retry);
                self.sync_generation();
                None
            }
            _ => None,
        }
    }
}

/// Transient render wrapper for the vehicle picker overlay.
pub struct VehiclePicker<'a> {
    state: &'a mut VehiclePickerState,
}

impl<'a> VehiclePicker<'a> {
    pub fn new(state: &'a mut VehiclePickerState) -> Self {
        Self { state }
    }

    fn vehicle_row(&self, index: usize, vehicle: &Vehicle, width: usize) -> ListItem<'static> {
        let is_current = self.state.value.as_deref() == Some(vehicle.id_unico.as_str());
        let check = if is_current { "✓ " } else { "  " };
        let plate = vehicle.secondary_label();
        let label_width = width
            .saturating_sub(check.width())
            .saturating_sub(plate.width() + 2);
        let label = truncate_str(&vehicle.label(), label_width);
        let padded = format!(
            "{}{}",
            label,
            " ".repeat(label_width.saturating_sub(label.width()))
        );

        let style = if index == self.state.selected {
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED)
        } else if is_current {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::Gray)
        };
        let plate_style = if index == self.state.selected {
            style
        } else {
            Style::default().fg(Color::DarkGray)
        };

        ListItem::new(Line::from(vec![
            Span::styled(check, style),
            Span::styled(padded, style),
            Span::styled("  ", style),
            Span::styled(plate.to_string(), plate_style),
        ]))
    }

    fn trailing_row(&self) -> Option<ListItem<'static>> {
        let state = self.state.coordinator().state();
        let (text, color) = if state.has_more {
            let text = if state.is_loading {
                LOADING_MORE
            } else {
                SCROLL_FOR_MORE
            };
            (text, Color::DarkGray)
        } else if state.last_error.is_some() {
            (LOAD_FAILED, Color::Red)
        } else {
            return None;
        };
        let mut style = Style::default().fg(color);
        if self.state.selected == state.loaded_items.len() {
            style = style.add_modifier(Modifier::REVERSED);
        }
        Some(ListItem::new(Line::from(text).centered()).style(style))
    }
}

impl Component for VehiclePicker<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let overlay = centered_rect(60, 70, area);

        // Clear underlying content
        frame.render_widget(Clear, overlay);

        let has_error = self.state.coordinator().state().last_error.is_some();
        let help_text = if has_error {
            " Enter Select  Ctrl+R Retry  Esc Close "
        } else {
            " ↑↓ Move  Enter Select  Esc Close "
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Vehicles ")
            .title_alignment(Alignment::Left)
            .title_bottom(Line::from(help_text).centered())
            .padding(Padding::horizontal(1));
        let inner = block.inner(overlay);
        frame.render_widget(block, overlay);

        let [search_area, list_area] =
            Layout::vertical([Constraint::Length(3), Constraint::Min(0)]).areas(inner);

        let search_line = if self.state.query.is_empty() {
            Line::from(Span::styled(
                SEARCH_PLACEHOLDER,
                Style::default().fg(Color::DarkGray),
            ))
        } else {
            Line::from(vec![
                Span::raw(self.state.query.clone()),
                Span::styled("▏", Style::default().fg(Color::Cyan)),
            ])
        };
        let search = Paragraph::new(search_line).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
        frame.render_widget(search, search_area);

        let state = self.state.coordinator().state();
        if state.loaded_items.is_empty() {
            let (message, color) = match (&state.last_error, state.is_loading) {
                (_, true) => (LOADING_MESSAGE, Color::DarkGray),
                (Some(_), false) => (LOAD_FAILED, Color::Red),
                (None, false) => (EMPTY_MESSAGE, Color::DarkGray),
            };
            self.state.viewport = None;
            let empty = Paragraph::new(message)
                .style(Style::default().fg(color))
                .alignment(Alignment::Center);
            frame.render_widget(empty, list_area);
            return;
        }

        let width = list_area.width as usize;
        let mut items: Vec<ListItem> = state
            .loaded_items
            .iter()
            .enumerate()
            .map(|(i, vehicle)| self.vehicle_row(i, vehicle, width))
            .collect();
        items.extend(self.trailing_row());

        let list = List::new(items);
        frame.render_stateful_widget(list, list_area, &mut self.state.list_state);
        self.state.viewport = Some((
            self.state.list_state.offset(),
            list_area.height as usize,
        ));
    }
}

/// Truncate a string to fit within `max_width` columns, adding "..." if needed.
fn truncate_str(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    if max_width <= 3 {
        return ".".repeat(max_width);
    }
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > max_width - 3 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push_str("...");
    out
}

/// Compute a centered rect using percentage of the outer rect.
pub fn centered_rect(percent_x: u16, percent_y: u16, outer: Rect) -> Rect {
    let [_, center_v, _] = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .areas(outer);
    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .areas(center_v);
    center
}
