use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};

use crate::app::App;
use crate::ui::style::{COLOR_MUTED, activity_style, make_block};

pub fn draw_activity(frame: &mut Frame, app: &App, area: Rect, focused: bool) {
    let title = if app.activity_scroll > 0 {
        format!("Activity (↑{})", app.activity_scroll)
    } else {
        "Activity".to_string()
    };
    let block = make_block(&title, focused);

    if app.activity.is_empty() {
        let hint = Paragraph::new(Line::from(Span::styled(
            "Pick an action and press Enter. Output shows up here.",
            Style::default().fg(COLOR_MUTED),
        )))
        .block(block);
        frame.render_widget(hint, area);
        return;
    }

    let height = area.height.saturating_sub(2) as usize;
    let (start, end) = visible_range(app.activity.len(), height, app.activity_scroll);

    let lines: Vec<Line> = app.activity[start..end]
        .iter()
        .map(|l| Line::from(Span::styled(l.as_str(), activity_style(l))))
        .collect();

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

/// Window of `height` lines ending `scroll` lines above the tail.
fn visible_range(len: usize, height: usize, scroll: usize) -> (usize, usize) {
    let end = len.saturating_sub(scroll);
    let start = end.saturating_sub(height);
    (start, end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tail_is_visible_by_default() {
        assert_eq!(visible_range(100, 10, 0), (90, 100));
    }

    #[test]
    fn scrolling_moves_window_up() {
        assert_eq!(visible_range(100, 10, 5), (85, 95));
        assert_eq!(visible_range(5, 10, 0), (0, 5));
        assert_eq!(visible_range(5, 10, 9), (0, 0));
    }
}
