use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::source::Vehicle;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{TitleBar, VehicleField, VehiclePicker};

pub fn draw_ui(frame: &mut Frame, tui: &mut TuiState) {
    use Constraint::{Length, Min};
    let layout = Layout::vertical([Length(1), Length(3), Min(0)]);
    let [title_area, field_area, details_area] = layout.areas(frame.area());

    let is_open = tui.picker.as_ref().is_some_and(|p| p.is_open());
    let is_loading = tui
        .picker
        .as_ref()
        .is_some_and(|p| p.is_open() && p.coordinator().state().is_loading);

    TitleBar::new(
        tui.source_name.clone(),
        tui.status_message.clone(),
        is_loading,
    )
    .render(frame, title_area);

    let selected = tui.selected_vehicle().cloned();
    VehicleField::new(
        selected.as_ref().map(Vehicle::label),
        tui.placeholder.clone(),
        is_open,
    )
    .render(frame, field_area);

    draw_details(frame, details_area, selected.as_ref());

    if let Some(picker) = tui.picker.as_mut()
        && picker.is_open()
    {
        VehiclePicker::new(picker).render(frame, frame.area());
    }
}

fn draw_details(frame: &mut Frame, area: Rect, vehicle: Option<&Vehicle>) {
    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Details ");

    let lines = match vehicle {
        Some(v) => {
            let key = Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::BOLD);
            vec![
                Line::from(vec![Span::styled("ID             ", key), Span::raw(v.id_unico.clone())]),
                Line::from(vec![Span::styled("Name           ", key), Span::raw(v.name.clone())]),
                Line::from(vec![Span::styled("Model          ", key), Span::raw(v.model.clone())]),
                Line::from(vec![
                    Span::styled("License plate  ", key),
                    Span::raw(v.license_plate.clone()),
                ]),
            ]
        }
        None => vec![Line::from(Span::styled(
            "Enter to choose an inspection vehicle, q to quit.",
            Style::default().fg(Color::DarkGray),
        ))],
    };

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
