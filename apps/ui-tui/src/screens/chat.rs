#![cfg(feature = "tui")]
use ratatui::{prelude::*, widgets::*};
use crate::app::App;
use crate::theme;

pub fn draw(f: &mut Frame, area: Rect, app: &App) {
    // Chat feed (input is global at bottom)
    let title = match app.selected.as_ref() {
        Some(c) => format!("Assistant • case {}", c.id),
        None => "Assistant • no case selected".to_string(),
    };
    let mut lines: Vec<Line<'_>> = Vec::new();
    for m in &app.chat_messages {
        let who = if m.role == "assistant" { "AI" } else { "You" };
        let style = if m.role == "assistant" { Style::default().fg(Color::Cyan) } else { Style::default().fg(Color::Green) };
        lines.push(Line::from(format!("{}:", who)).style(style));
        for l in m.content.lines() { lines.push(Line::from(format!("  {}", l))); }
        lines.push(Line::from(""));
    }
    if app.chat_busy {
        lines.push(Line::from("AI is thinking…").style(theme::suggestion()));
    }
    let block = Block::default().borders(Borders::ALL).title(title).border_style(theme::header_border());
    // Show bottom of the feed with optional scrollback
    let max_visible = area.height.saturating_sub(2) as usize;
    let total = lines.len();
    let max_scroll = total.saturating_sub(max_visible);
    let offset = app.chat_scroll.min(max_scroll);
    let start = total.saturating_sub(max_visible + offset);
    let p = Paragraph::new(lines.into_iter().skip(start).collect::<Vec<_>>())
        .block(block)
        .wrap(Wrap { trim: true });
    f.render_widget(p, area);
}
