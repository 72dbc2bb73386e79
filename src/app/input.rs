use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::ops::Action;

use super::state::{App, Panel};

const PAGE: usize = 10;

/// Apply one key press. Overlays take keys first: message box, help, then the form.
pub fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind == KeyEventKind::Release {
        return;
    }

    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.running = false;
        return;
    }

    if app.message.is_some() {
        match key.code {
            KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ') => app.dismiss_message(),
            KeyCode::Down | KeyCode::Char('j') => app.scroll_message_down(1),
            KeyCode::Up | KeyCode::Char('k') => app.scroll_message_up(1),
            KeyCode::PageDown => app.scroll_message_down(PAGE),
            KeyCode::PageUp => app.scroll_message_up(PAGE),
            KeyCode::Home | KeyCode::Char('<') => app.message_scroll = 0,
            KeyCode::End | KeyCode::Char('>') => app.scroll_message_down(usize::MAX / 2),
            _ => {}
        }
        return;
    }

    if app.show_help {
        app.show_help = false;
        return;
    }

    if app.form.is_some() {
        handle_form_key(app, key);
        return;
    }

    // Global keys.
    match key.code {
        KeyCode::Char('q') => {
            app.running = false;
            return;
        }
        KeyCode::Char('?') => {
            app.show_help = true;
            return;
        }
        KeyCode::Esc if app.busy.is_some() => {
            app.cancel_running();
            return;
        }
        KeyCode::Tab | KeyCode::BackTab => {
            app.focused_panel = app.focused_panel.toggle();
            return;
        }
        KeyCode::Right | KeyCode::Char('l') => {
            app.focused_panel = Panel::Activity;
            return;
        }
        KeyCode::Left | KeyCode::Char('h') => {
            app.focused_panel = Panel::Actions;
            return;
        }
        KeyCode::Char(c @ '1'..='9') => {
            if let Some(action) = Action::ALL.get((c as usize) - ('1' as usize)) {
                app.focused_panel = Panel::Actions;
                app.open_action(*action);
            }
            return;
        }
        _ => {}
    }

    match app.focused_panel {
        Panel::Actions => match key.code {
            KeyCode::Down | KeyCode::Char('j') => app.select_next(),
            KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
            KeyCode::Home | KeyCode::Char('<') => app.action_index = 0,
            KeyCode::End | KeyCode::Char('>') => app.action_index = Action::ALL.len() - 1,
            KeyCode::Enter => {
                let action = app.selected_action();
                app.open_action(action);
            }
            _ => {}
        },
        Panel::Activity => match key.code {
            KeyCode::Up | KeyCode::Char('k') => app.scroll_activity_up(1),
            KeyCode::Down | KeyCode::Char('j') => app.scroll_activity_down(1),
            KeyCode::PageUp => app.scroll_activity_up(PAGE),
            KeyCode::PageDown => app.scroll_activity_down(PAGE),
            KeyCode::Home | KeyCode::Char('<') => app.scroll_activity_up(usize::MAX / 2),
            KeyCode::End | KeyCode::Char('>') | KeyCode::Char('G') => app.activity_scroll = 0,
            KeyCode::Char('c') => {
                app.activity.clear();
                app.activity_scroll = 0;
            }
            _ => {}
        },
    }
}

fn handle_form_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.form = None;
            return;
        }
        KeyCode::Enter if app.form.as_ref().is_some_and(|f| f.on_last_field()) => {
            app.submit_form();
            return;
        }
        _ => {}
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let Some(form) = app.form.as_mut() else {
        return;
    };

    match key.code {
        KeyCode::Tab | KeyCode::Down | KeyCode::Enter => form.next(),
        KeyCode::BackTab | KeyCode::Up => form.prev(),
        KeyCode::Backspace => form.backspace(),
        KeyCode::Char('u') if ctrl => form.clear_field(),
        KeyCode::Char(c) if !ctrl => form.input(c),
        _ => {}
    }
}
