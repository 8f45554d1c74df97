//! # Vehicle Field Component
//!
//! The closed state of the selector: a one-line box showing the chosen
//! vehicle, or the placeholder when nothing is chosen or the chosen id is not
//! in the loaded window. Enter opens the picker overlay.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::tui::component::Component;

pub struct VehicleField {
    /// Display label of the selected vehicle, if it can be resolved.
    pub label: Option<String>,
    pub placeholder: String,
    /// Draws the border highlighted while the picker is open.
    pub expanded: bool,
}

impl VehicleField {
    pub fn new(label: Option<String>, placeholder: String, expanded: bool) -> Self {
        Self {
            label,
            placeholder,
            expanded,
        }
    }
}

impl Component for VehicleField {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let border = if self.expanded {
            Color::Cyan
        } else {
            Color::DarkGray
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title(" Vehicle ");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [text_area, chevron_area] =
            Layout::horizontal([Constraint::Min(0), Constraint::Length(2)]).areas(inner);

        let text = match &self.label {
            Some(label) => Span::raw(label.clone()),
            None => Span::styled(self.placeholder.clone(), Style::default().fg(Color::DarkGray)),
        };
        frame.render_widget(Paragraph::new(Line::from(text)), text_area);
        frame.render_widget(
            Paragraph::new(Span::styled("▾", Style::default().fg(Color::DarkGray))),
            chevron_area,
        );
    }
}
