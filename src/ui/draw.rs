use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::{App, Panel};
use crate::ui::overlay::{draw_form, draw_help_overlay, draw_message_box};
use crate::ui::panels::{draw_actions, draw_activity};
use crate::ui::style::{COLOR_BUSY, COLOR_MUTED};

pub fn draw(frame: &mut Frame, app: &App) {
    let size = frame.area();

    // Body | status bar
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(size);

    // Body: actions (left) | activity (right)
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(34), Constraint::Min(20)])
        .split(vertical[0]);

    draw_actions(frame, app, horizontal[0], app.focused_panel == Panel::Actions);
    draw_activity(frame, app, horizontal[1], app.focused_panel == Panel::Activity);
    draw_status_bar(frame, app, vertical[1]);

    if let Some(form) = &app.form {
        draw_form(frame, form, size);
    }
    if let Some(message) = &app.message {
        draw_message_box(frame, message, app.message_scroll, size);
    }
    if app.show_help {
        draw_help_overlay(frame, size);
    }
}

fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let line = if app.status.is_empty() {
        Line::from(Span::styled(
            "Enter: run  1-9: jump  Tab: switch panel  ?: help  q: quit",
            Style::default().fg(COLOR_MUTED),
        ))
    } else {
        let color = if app.busy.is_some() { COLOR_BUSY } else { COLOR_MUTED };
        Line::from(Span::styled(
            app.status.as_str(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ))
    };
    frame.render_widget(Paragraph::new(line), area);
}
