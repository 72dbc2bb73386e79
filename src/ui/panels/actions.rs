use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{List, ListItem, ListState};

use crate::app::App;
use crate::ops::Action;
use crate::ui::style::{COLOR_BUSY, COLOR_MUTED, COLOR_SELECTED_BG, ICON_BUSY, ICON_INPUT, make_block};

pub fn draw_actions(frame: &mut Frame, app: &App, area: Rect, focused: bool) {
    let block = make_block("Actions", focused);

    let items: Vec<ListItem> = Action::ALL
        .iter()
        .enumerate()
        .map(|(i, action)| {
            let mut spans = vec![
                Span::styled(format!("{} ", i + 1), Style::default().fg(COLOR_MUTED)),
                Span::raw(action.label()),
            ];

            if !action.fields().is_empty() {
                spans.push(Span::styled(ICON_INPUT, Style::default().fg(COLOR_MUTED)));
            }
            if app.busy == Some(*action) {
                spans.push(Span::styled(
                    format!(" {ICON_BUSY}"),
                    Style::default().fg(COLOR_BUSY),
                ));
            }

            ListItem::new(Line::from(spans))
        })
        .collect();

    let mut state = ListState::default();
    state.select(Some(app.action_index));

    let highlight = if focused {
        Style::default()
            .bg(COLOR_SELECTED_BG)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };

    let list = List::new(items).block(block).highlight_style(highlight);
    frame.render_stateful_widget(list, area, &mut state);
}
