#![cfg(feature = "tui")]
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

// Global hotkeys. Ctrl-combos and function keys only, so plain typing into the
// form, the email overlay and the chat input is never stolen.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hotkey {
    None,
    Quit,
    SwitchTab(usize), // 0-based index
    ToggleHelp,
    Refresh,
    ToggleEdit,
    LogAction,
    SendEmail,
    Suggest,
}

pub fn resolve(ev: KeyEvent) -> Hotkey {
    let m = ev.modifiers;
    match (m, ev.code) {
        (KeyModifiers::CONTROL, KeyCode::Char('c')) | (KeyModifiers::CONTROL, KeyCode::Char('q')) => Hotkey::Quit,
        (KeyModifiers::NONE, KeyCode::F(1)) | (KeyModifiers::CONTROL, KeyCode::Char('1')) => Hotkey::SwitchTab(0),
        (KeyModifiers::NONE, KeyCode::F(2)) | (KeyModifiers::CONTROL, KeyCode::Char('2')) => Hotkey::SwitchTab(1),
        // Some terminals don't send Ctrl with digits; Alt works everywhere
        (KeyModifiers::ALT, KeyCode::Char('1')) => Hotkey::SwitchTab(0),
        (KeyModifiers::ALT, KeyCode::Char('2')) => Hotkey::SwitchTab(1),
        (KeyModifiers::CONTROL, KeyCode::Char('h')) => Hotkey::ToggleHelp,
        (KeyModifiers::CONTROL, KeyCode::Char('r')) => Hotkey::Refresh,
        (KeyModifiers::CONTROL, KeyCode::Char('e')) => Hotkey::ToggleEdit,
        (KeyModifiers::CONTROL, KeyCode::Char('l')) => Hotkey::LogAction,
        (KeyModifiers::CONTROL, KeyCode::Char('s')) => Hotkey::SendEmail,
        (KeyModifiers::CONTROL, KeyCode::Char(' ')) => Hotkey::Suggest,
        _ => Hotkey::None,
    }
}
