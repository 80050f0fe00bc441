use core_events::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::event::{
    KeyCode as CKeyCode, KeyEvent as CKeyEvent, KeyEventKind as CKeyEventKind,
    KeyModifiers as CKeyModifiers,
};

/// Map a crossterm key event into the editor key model.
///
/// Returns `None` for releases and for key codes the editor never binds (media keys, bare
/// modifiers, function keys).
pub(crate) fn map_key_event(event: &CKeyEvent) -> Option<KeyEvent> {
    if !matches!(event.kind, CKeyEventKind::Press | CKeyEventKind::Repeat) {
        return None;
    }
    let code = map_key_code(&event.code)?;
    let mods = map_mods(event.modifiers);
    Some(KeyEvent::new(code, mods).normalized())
}

/// Convert a crossterm key code into a logical key code.
pub(crate) fn map_key_code(code: &CKeyCode) -> Option<KeyCode> {
    let code = match code {
        CKeyCode::Char(c) => KeyCode::Char(*c),
        CKeyCode::Enter => KeyCode::Enter,
        CKeyCode::Esc => KeyCode::Esc,
        CKeyCode::Backspace => KeyCode::Backspace,
        CKeyCode::Tab | CKeyCode::BackTab => KeyCode::Tab,
        CKeyCode::Up => KeyCode::Up,
        CKeyCode::Down => KeyCode::Down,
        CKeyCode::Left => KeyCode::Left,
        CKeyCode::Right => KeyCode::Right,
        CKeyCode::Home => KeyCode::Home,
        CKeyCode::End => KeyCode::End,
        CKeyCode::PageUp => KeyCode::PageUp,
        CKeyCode::PageDown => KeyCode::PageDown,
        CKeyCode::Delete => KeyCode::Delete,
        CKeyCode::F(_)
        | CKeyCode::Insert
        | CKeyCode::Null
        | CKeyCode::CapsLock
        | CKeyCode::ScrollLock
        | CKeyCode::NumLock
        | CKeyCode::PrintScreen
        | CKeyCode::Pause
        | CKeyCode::Menu
        | CKeyCode::KeypadBegin
        | CKeyCode::Media(_)
        | CKeyCode::Modifier(_) => return None,
    };
    Some(code)
}

/// Convert crossterm modifier flags; META and SUPER fold into ALT.
pub(crate) fn map_mods(mods: CKeyModifiers) -> KeyModifiers {
    let mut out = KeyModifiers::empty();
    if mods.contains(CKeyModifiers::CONTROL) {
        out |= KeyModifiers::CTRL;
    }
    if mods.intersects(CKeyModifiers::ALT | CKeyModifiers::META | CKeyModifiers::SUPER) {
        out |= KeyModifiers::ALT;
    }
    if mods.contains(CKeyModifiers::SHIFT) {
        out |= KeyModifiers::SHIFT;
    }
    out
}
