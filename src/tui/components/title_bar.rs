//! # TitleBar Component
//!
//! Top status bar: which page source the selector is talking to, plus the
//! latest status message (selection changes, fetch errors).
//!
//! Stateless; all data arrives as props stored in the struct so it fits the
//! fixed `Component::render` signature.

use crate::tui::component::Component;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::Span;

/// Top status bar component.
pub struct TitleBar {
    /// Page source name (e.g. "memory", "rest")
    pub source_name: String,
    /// Status message (e.g. "Selected CAR-003")
    pub status_message: String,
    /// Whether the open picker is waiting on a page
    pub is_loading: bool,
}

impl TitleBar {
    pub fn new(source_name: String, status_message: String, is_loading: bool) -> Self {
        Self {
            source_name,
            status_message,
            is_loading,
        }
    }
}

impl Component for TitleBar {
    /// Renders a single line; the loading marker comes last so the source and
    /// status stay visible on narrow terminals.
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let mut title_text = format!("Fleetpick (source: {})", self.source_name);
        if !self.status_message.is_empty() {
            title_text.push_str(" | ");
            title_text.push_str(&self.status_message);
        }
        if self.is_loading {
            title_text.push_str(" | Loading...");
        }

        frame.render_widget(Span::raw(title_text), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn render_text(title_bar: &mut TitleBar) -> String {
        let backend = TestBackend::new(80, 1);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| {
                title_bar.render(f, f.area());
            })
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>()
    }

    #[test]
    fn test_title_bar_with_status_and_loading() {
        let mut title_bar = TitleBar::new("rest".to_string(), "Selected CAR-003".to_string(), true);
        let text = render_text(&mut title_bar);
        assert!(text.contains("Fleetpick (source: rest)"));
        assert!(text.contains("Selected CAR-003"));
        assert!(text.contains("Loading..."));
    }

    #[test]
    fn test_title_bar_default_no_status() {
        let mut title_bar = TitleBar::new("memory".to_string(), String::new(), false);
        let text = render_text(&mut title_bar);
        assert!(text.contains("Fleetpick (source: memory)"));
        assert!(!text.contains('|'));
    }
}
