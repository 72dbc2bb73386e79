use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::app::Form;
use crate::ops::Outcome;
use crate::ui::style::{COLOR_ACCENT, COLOR_MUTED, outcome_color};

/// Draw the input dialog for the open form, centered on the screen.
pub fn draw_form(frame: &mut Frame, form: &Form, area: Rect) {
    // Label + input + spacer per field, hint line, borders.
    let height = (form.fields.len() as u16) * 3 + 3;
    let popup = centered_rect(70, height, area);

    frame.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(COLOR_ACCENT))
        .title(format!(" {} ", form.title()));

    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let mut lines = Vec::new();
    for (i, field) in form.fields.iter().enumerate() {
        let focused = i == form.focused;
        let label_style = if focused {
            Style::default()
                .fg(COLOR_ACCENT)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        lines.push(Line::from(Span::styled(field.spec.label, label_style)));

        let value = if field.value.is_empty() && !focused {
            Span::styled(field.spec.placeholder, Style::default().fg(COLOR_MUTED))
        } else if focused {
            Span::raw(format!("{}▏", field.value))
        } else {
            Span::raw(field.value.as_str())
        };
        lines.push(Line::from(vec![Span::raw("> "), value]));
        lines.push(Line::raw(""));
    }

    frame.render_widget(Paragraph::new(lines), inner);

    let hint_area = Rect {
        x: inner.x,
        y: inner.y + inner.height.saturating_sub(1),
        width: inner.width,
        height: 1,
    };
    frame.render_widget(
        Paragraph::new(dismiss_line("Enter: submit  Tab: next field  Ctrl+U: clear  Esc: cancel"))
            .alignment(Alignment::Center),
        hint_area,
    );
}

/// Where the message box goes and its body text, hard-wrapped to the body width.
pub struct MessageLayout {
    pub popup: Rect,
    pub body: Rect,
    pub lines: Vec<String>,
}

impl MessageLayout {
    /// Furthest the body can scroll while still filling the box.
    pub fn max_scroll(&self) -> usize {
        self.lines.len().saturating_sub(self.body.height as usize)
    }
}

pub fn message_layout(message: &Outcome, area: Rect) -> MessageLayout {
    let width = area.width.saturating_sub(8).max(40).min(area.width);
    let lines = wrap_chars(&message.message, width.saturating_sub(2).max(1) as usize);

    // Body, two borders and the hint line.
    let wanted = lines.len().max(1).saturating_add(3);
    let height = u16::try_from(wanted).unwrap_or(u16::MAX).min(area.height);
    let popup = centered_rect(width, height, area);

    let inner = Block::default().borders(Borders::ALL).inner(popup);
    let body = Rect {
        height: inner.height.saturating_sub(1),
        ..inner
    };
    MessageLayout { popup, body, lines }
}

/// Draw the result of an action: green for info, red for errors.
pub fn draw_message_box(frame: &mut Frame, message: &Outcome, scroll: usize, area: Rect) {
    let layout = message_layout(message, area);
    let color = outcome_color(message.kind);

    frame.render_widget(Clear, layout.popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .title(Span::styled(
            format!(" {} ", message.title),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ));

    let inner = block.inner(layout.popup);
    frame.render_widget(block, layout.popup);

    let scroll = scroll.min(layout.max_scroll());
    let body: Vec<Line> = layout
        .lines
        .iter()
        .skip(scroll)
        .take(layout.body.height as usize)
        .map(|l| Line::raw(l.as_str()))
        .collect();
    let shown = body.len();
    frame.render_widget(Paragraph::new(body), layout.body);

    let hint = if layout.max_scroll() > 0 {
        format!(
            "{}-{} of {}  j/k PgUp/PgDn: scroll  Enter: close",
            scroll + 1,
            scroll + shown,
            layout.lines.len()
        )
    } else {
        "Press Enter to close".to_string()
    };
    let hint_area = Rect {
        x: inner.x,
        y: inner.y + inner.height.saturating_sub(1),
        width: inner.width,
        height: 1,
    };
    frame.render_widget(
        Paragraph::new(dismiss_line(&hint)).alignment(Alignment::Center),
        hint_area,
    );
}

/// Split `text` into rows of at most `width` characters. Empty lines are kept.
fn wrap_chars(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut rows = Vec::new();
    for line in text.lines() {
        let chars: Vec<char> = line.chars().collect();
        if chars.is_empty() {
            rows.push(String::new());
            continue;
        }
        rows.extend(chars.chunks(width).map(|c| c.iter().collect::<String>()));
    }
    if rows.is_empty() {
        rows.push(String::new());
    }
    rows
}

/// Draw the help overlay centered on the screen.
pub fn draw_help_overlay(frame: &mut Frame, area: Rect) {
    let popup = centered_rect(62, 16, area);

    frame.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Keybindings ");

    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(inner);

    let nav_lines = keybinding_lines(&[
        ("Navigation", None),
        ("j / ↓", Some("Move down")),
        ("k / ↑", Some("Move up")),
        ("Home / <", Some("Jump to first")),
        ("End / >", Some("Jump to last")),
        ("PgUp/PgDn", Some("Scroll activity")),
        ("Tab / h / l", Some("Switch panel")),
    ]);

    let action_lines = keybinding_lines(&[
        ("Actions", None),
        ("Enter", Some("Run selected action")),
        ("1-9", Some("Run action by number")),
        ("Esc", Some("Cancel running action")),
        ("c", Some("Clear activity")),
        ("q", Some("Quit")),
        ("?", Some("Toggle this help")),
    ]);

    let nav_area = Rect {
        height: columns[0].height.saturating_sub(1),
        ..columns[0]
    };
    frame.render_widget(Paragraph::new(nav_lines), nav_area);

    let act_area = Rect {
        height: columns[1].height.saturating_sub(1),
        ..columns[1]
    };
    frame.render_widget(Paragraph::new(action_lines), act_area);

    let dismiss_area = Rect {
        x: inner.x,
        y: inner.y + inner.height.saturating_sub(1),
        width: inner.width,
        height: 1,
    };
    frame.render_widget(
        Paragraph::new(dismiss_line("Press any key to close")).alignment(Alignment::Center),
        dismiss_area,
    );
}

fn dismiss_line(text: &str) -> Line<'_> {
    Line::from(Span::styled(
        text,
        Style::default()
            .fg(COLOR_MUTED)
            .add_modifier(Modifier::ITALIC),
    ))
}

fn keybinding_lines(items: &[(&str, Option<&str>)]) -> Vec<Line<'static>> {
    items
        .iter()
        .map(|(key, action)| match action {
            None => Line::from(Span::styled(
                key.to_string(),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )),
            Some(desc) => Line::from(vec![
                Span::styled(
                    format!("  {key:<14}"),
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(desc.to_string(), Style::default().fg(Color::White)),
            ]),
        })
        .collect()
}

/// Return a centered `Rect` of the given fixed size within `area`.
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    Rect {
        x: area.x + (area.width.saturating_sub(w)) / 2,
        y: area.y + (area.height.saturating_sub(h)) / 2,
        width: w,
        height: h,
    }
}
