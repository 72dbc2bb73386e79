mod draw;
mod overlay;
mod panels;
mod style;

pub use draw::draw;

use ratatui::layout::Rect;

use crate::ops::Outcome;

/// Largest scroll offset for `message` on a screen of `area`.
pub fn max_message_scroll(message: &Outcome, area: Rect) -> usize {
    overlay::message_layout(message, area).max_scroll()
}
