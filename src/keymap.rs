use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::session::{Event, KeyCommand};

/// Turn a terminal key press into a session event.
///
/// Releases and repeats are dropped, as are keys the session has no use for.
pub fn translate(key: KeyEvent) -> Option<Event> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let cmd = match key.code {
        KeyCode::Enter => return Some(Event::Submit),
        KeyCode::Esc => KeyCommand::Quit,
        KeyCode::Char('c') if ctrl => KeyCommand::ForceQuit,
        KeyCode::Char('r') if ctrl => KeyCommand::SoftReset,
        KeyCode::Char('l') if ctrl => KeyCommand::HardReset,
        KeyCode::Char('s') if ctrl => KeyCommand::Persist,
        KeyCode::Char(_) if ctrl || key.modifiers.contains(KeyModifiers::ALT) => return None,
        KeyCode::Char(c) => KeyCommand::Char(c),
        KeyCode::Backspace => KeyCommand::Backspace,
        _ => return None,
    };
    Some(Event::Key(cmd))
}
