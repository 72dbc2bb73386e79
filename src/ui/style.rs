use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders};

use crate::ops::OutcomeKind;

// ── Colour constants ──────────────────────────────────────────────────
pub const COLOR_INFO: Color = Color::Green;
pub const COLOR_ERROR: Color = Color::Red;
pub const COLOR_BUSY: Color = Color::Yellow;
pub const COLOR_MUTED: Color = Color::DarkGray;
pub const COLOR_SELECTED_BG: Color = Color::DarkGray;
pub const COLOR_ACCENT: Color = Color::Cyan;

// ── Icon constants ────────────────────────────────────────────────────
pub const ICON_BUSY: &str = "◉";
pub const ICON_INPUT: &str = "…";

// ── Helpers ───────────────────────────────────────────────────────────

pub fn outcome_color(kind: OutcomeKind) -> Color {
    match kind {
        OutcomeKind::Info => COLOR_INFO,
        OutcomeKind::Error => COLOR_ERROR,
    }
}

pub fn make_block(title: &str, focused: bool) -> Block<'_> {
    let style = if focused {
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(COLOR_MUTED)
    };

    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(style)
}

/// Colour for an activity line: command echoes, stderr-ish errors, verdicts.
pub fn activity_style(line: &str) -> Style {
    if line.starts_with("$ ") {
        Style::default().fg(COLOR_ACCENT)
    } else if line.starts_with("── ") {
        Style::default().add_modifier(Modifier::BOLD)
    } else if line.ends_with(": failed") || line.starts_with("Error") || line.starts_with("ERROR") {
        Style::default().fg(COLOR_ERROR)
    } else if line.ends_with(": done") {
        Style::default().fg(COLOR_INFO)
    } else {
        Style::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn activity_lines_are_classified() {
        assert_eq!(activity_style("$ docker ps").fg, Some(COLOR_ACCENT));
        assert_eq!(activity_style("Pull Docker Image: failed").fg, Some(COLOR_ERROR));
        assert_eq!(activity_style("Pull Docker Image: done").fg, Some(COLOR_INFO));
        assert_eq!(activity_style("latest: Pulling from library/alpine").fg, None);
    }
}
