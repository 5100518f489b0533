//! Keyboard event handling.

use crate::app::{App, AppState, Focus, InputMode};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Handle a key event. Returns true if the app should quit.
pub fn handle_key(app: &mut App, key: KeyEvent) -> bool {
    match app.input_mode {
        InputMode::Normal => handle_normal_key(app, key),
        InputMode::NewFolder | InputMode::AddFile => handle_prompt_key(app, key),
        InputMode::ConfirmDelete => handle_confirm_key(app, key),
    }
}

fn handle_normal_key(app: &mut App, key: KeyEvent) -> bool {
    // Ctrl+C to quit
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.state = AppState::Quit;
        return true;
    }

    match key.code {
        KeyCode::Char('q') => {
            app.state = AppState::Quit;
            return true;
        }
        KeyCode::Tab => app.toggle_focus(),
        KeyCode::Char('j') | KeyCode::Down => app.move_down(),
        KeyCode::Char('k') | KeyCode::Up => app.move_up(),
        KeyCode::Enter => match app.focus {
            Focus::Explorer => app.open_selected(),
            Focus::Queue => app.upload_selected(),
        },
        KeyCode::Char('s') => app.sign_in(),
        KeyCode::Char('S') => app.sign_out(),
        KeyCode::Char('a') => app.begin_add_file(),
        KeyCode::Char('U') => app.upload_all(),
        KeyCode::Char('u') => app.upload_selected(),
        KeyCode::Char('x') => app.remove_selected(),
        KeyCode::Char('C') => app.clear_queue(),
        _ if app.workbench.is_authenticated() => handle_drive_key(app, key),
        _ => {}
    }
    false
}

/// Keys that act on the drive listing, only bound while signed in.
fn handle_drive_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('r') => app.refresh(),
        KeyCode::Char('n') => app.begin_new_folder(),
        KeyCode::Char('d') | KeyCode::Delete => {
            if app.focus == Focus::Explorer {
                app.request_delete();
            }
        }
        KeyCode::Char('h') | KeyCode::Backspace | KeyCode::Left => app.open_parent(),
        KeyCode::Char('l') | KeyCode::Right => {
            if app.focus == Focus::Explorer {
                app.open_selected();
            }
        }
        KeyCode::Char('g') => app.open_root(),
        KeyCode::Char(c @ '1'..='9') => {
            if let Some(digit) = c.to_digit(10) {
                app.open_breadcrumb(digit as usize - 1);
            }
        }
        _ => {}
    }
}

fn handle_prompt_key(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Esc => app.close_dialog(),
        KeyCode::Enter => match app.input_mode {
            InputMode::NewFolder => app.submit_new_folder(),
            InputMode::AddFile => app.submit_add_file(),
            _ => {}
        },
        KeyCode::Char(c) => app.input.push(c),
        KeyCode::Backspace => {
            app.input.pop();
        }
        _ => {}
    }
    false
}

fn handle_confirm_key(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('y') | KeyCode::Enter => app.confirm_delete(),
        KeyCode::Char('n') | KeyCode::Esc => app.close_dialog(),
        _ => {}
    }
    false
}
