//! Keyboard handling.
//!
//! Slider input is two-tier: arrow keys move the local preview only, and a
//! discrete Enter commits it as a remote command. This bounds network
//! chatter independent of how fast the operator leans on a key.

use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent};

use crate::app::{App, View, LEVEL_STEP};

/// Poll for terminal events with a timeout.
pub fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Handle a key event.
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    // Any key closes the help overlay
    if app.show_help {
        app.show_help = false;
        return;
    }

    match key.code {
        KeyCode::Char('q') => app.quit(),

        // View switching
        KeyCode::Tab | KeyCode::BackTab => app.next_view(),
        KeyCode::Char('1') => app.set_view(View::Vitals),
        KeyCode::Char('2') => app.set_view(View::Recovery),

        // Selection
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),

        // Slider preview (Recovery view only); local until committed
        KeyCode::Left | KeyCode::Char('h') => {
            if app.current_view == View::Recovery {
                app.adjust_preview(-LEVEL_STEP);
            }
        }
        KeyCode::Right | KeyCode::Char('l') => {
            if app.current_view == View::Recovery {
                app.adjust_preview(LEVEL_STEP);
            }
        }
        KeyCode::Enter => {
            if app.current_view == View::Recovery {
                app.commit_preview();
            }
        }
        KeyCode::Esc => app.cancel_preview(),

        // Recovery simulation control
        KeyCode::Char('s') => {
            if app.current_view == View::Recovery {
                app.start_recovery();
            }
        }
        KeyCode::Char('x') => {
            if app.current_view == View::Recovery {
                app.stop_recovery();
            }
        }

        // Manual refresh
        KeyCode::Char('r') => app.request_refresh(),

        KeyCode::Char('?') => app.toggle_help(),

        _ => {}
    }
}
