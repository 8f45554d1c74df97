use ratatui::Frame;
use ratatui::layout::Rect;

/// A reusable UI component.
///
/// Components receive data via props (struct fields), may borrow persistent
/// state (the picker wrapper holds `&mut VehiclePickerState`), and render to a
/// `Frame` within a given `Rect`.
///
/// `render` takes `&mut self` so a component can record presentation facts
/// while drawing, e.g. the picker remembers the list viewport it just drew so
/// the sentinel can be checked afterwards.
pub trait Component {
    /// Render the component into the given area.
    fn render(&mut self, frame: &mut Frame, area: Rect);
}

/// A component that handles terminal events.
pub trait EventHandler {
    /// The type of high-level event this component emits.
    type Event;

    /// Handle a low-level `TuiEvent` and optionally return a high-level event.
    fn handle_event(&mut self, event: &super::event::TuiEvent) -> Option<Self::Event>;
}
