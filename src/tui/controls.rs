//! Keyboard input handling for the TUI.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::runtime::App;

/// Maps a key event to an application action.
///
/// Guards on [`KeyEventKind::Press`] to avoid double-fire on some terminals.
pub fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }
    match key.code {
        KeyCode::Char('q') => app.quit = true,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit = true,
        KeyCode::Esc => {
            if app.popup.is_some() {
                app.close_popup();
            } else {
                app.quit = true;
            }
        }
        KeyCode::Right => app.step_forward(),
        KeyCode::Left => app.step_back(),
        KeyCode::Home => app.jump_start(),
        KeyCode::End => app.jump_end(),
        KeyCode::Down | KeyCode::Tab => app.select_next(),
        KeyCode::Up => app.select_prev(),
        KeyCode::Enter => app.open_chart(),
        _ => {}
    }
}
