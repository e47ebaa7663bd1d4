use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};

use crate::app::{App, Screen};
use crate::tui::AppEvent;

pub fn handle_event(app: &mut App, event: AppEvent) -> Result<()> {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
        AppEvent::Paste(text) => handle_paste(app, &text),
        AppEvent::Resize(_, _) => {}
        AppEvent::Tick => app.tick_animation(),
    }
    Ok(())
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Global keys that work in any state
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    match key.code {
        KeyCode::Esc => app.should_quit = true,

        // Chat scrolling stays available while a request is in flight
        KeyCode::PageUp if app.screen() == Screen::Chat => app.scroll_up(app.page_size()),
        KeyCode::PageDown if app.screen() == Screen::Chat => app.scroll_down(app.page_size()),
        KeyCode::Up if app.screen() == Screen::Chat => app.scroll_up(1),
        KeyCode::Down if app.screen() == Screen::Chat => app.scroll_down(1),

        // Input is disabled while pending
        _ if !app.input_enabled() => {}

        KeyCode::Enter => app.submit(),
        KeyCode::Backspace => app.delete_before_cursor(),
        KeyCode::Delete => app.delete_at_cursor(),
        KeyCode::Left => app.move_cursor_left(),
        KeyCode::Right => app.move_cursor_right(),
        KeyCode::Home => app.move_cursor_home(),
        KeyCode::End => app.move_cursor_end(),
        KeyCode::Char(c) => app.insert_char(c),
        _ => {}
    }
}

/// A file dropped on the upload screen starts the upload straight away.
/// On the chat screen a paste is just text.
fn handle_paste(app: &mut App, text: &str) {
    if !app.input_enabled() {
        return;
    }

    match app.screen() {
        Screen::Upload => {
            let path = text.lines().next().unwrap_or_default();
            app.input = path.trim().to_string();
            app.move_cursor_end();
            app.submit();
        }
        Screen::Chat => {
            for c in text.chars().filter(|c| !c.is_control()) {
                app.insert_char(c);
            }
        }
    }
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    if app.screen() != Screen::Chat {
        return;
    }

    match mouse.kind {
        MouseEventKind::ScrollDown => app.scroll_down(3),
        MouseEventKind::ScrollUp => app.scroll_up(3),
        _ => {}
    }
}
