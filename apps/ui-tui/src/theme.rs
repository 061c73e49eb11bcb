#![cfg(feature = "tui")]
use ratatui::style::{Color, Modifier, Style};

// Palette
pub fn bg() -> Color { Color::Rgb(10, 10, 10) }
pub fn fg() -> Color { Color::Rgb(220, 220, 220) }
pub fn accent() -> Color { Color::Rgb(255, 179, 0) }
pub fn muted() -> Color { Color::Rgb(150, 150, 150) }

// Common styles
pub fn header_block() -> Style { Style::default().bg(bg()) }
pub fn header_border() -> Style { Style::default().fg(accent()) }
pub fn tab_active() -> Style { Style::default().fg(accent()).add_modifier(Modifier::BOLD) }
pub fn tab_inactive() -> Style { Style::default().fg(muted()) }
pub fn body() -> Style { Style::default().bg(bg()).fg(fg()) }
pub fn status() -> Style { Style::default().fg(muted()) }
pub fn border(focused: bool) -> Style { if focused { header_border() } else { Style::default().fg(muted()) } }

// Case form
pub fn field_label() -> Style { Style::default().fg(muted()) }
pub fn field_focus() -> Style { Style::default().fg(accent()).add_modifier(Modifier::BOLD) }
pub fn field_editing() -> Style { Style::default().fg(Color::Black).bg(accent()) }
pub fn row_selected() -> Style { Style::default().fg(accent()).add_modifier(Modifier::REVERSED) }
pub fn suggestion() -> Style { Style::default().fg(muted()).add_modifier(Modifier::ITALIC) }

// Panels (overlays, notifications) use a slightly lighter bg for contrast
pub fn panel_bg() -> Color { Color::Rgb(22, 22, 22) }
pub fn panel() -> Style { Style::default().bg(panel_bg()).fg(fg()) }
