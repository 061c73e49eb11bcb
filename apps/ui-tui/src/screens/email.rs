#![cfg(feature = "tui")]
use ratatui::{prelude::*, widgets::*};
use casebook_types::Email;
use crate::app::{App, EmailFocus};
use crate::theme;

pub fn draw(f: &mut Frame, area: Rect, draft: &Email, app: &App) {
    let label = |name: &'static str, focus: EmailFocus| {
        let style = if app.email_focus == focus { theme::field_focus() } else { theme::field_label() };
        Span::styled(format!("{:<9}", name), style)
    };
    let mut lines: Vec<Line> = vec![
        Line::from(vec![label("To", EmailFocus::Receiver), Span::raw(draft.receiver.as_str())]),
        Line::from(vec![label("Subject", EmailFocus::Subject), Span::raw(draft.subject.as_str())]),
        Line::from(label("Body", EmailFocus::Body)),
    ];
    let mut body: Vec<Line> = draft.body.split('\n').map(|l| Line::from(l.to_string())).collect();
    if let Some(s) = &app.suggestion {
        // Ghost text continues the last body line.
        if let Some(last) = body.last_mut() {
            last.spans.push(Span::styled(s.clone(), theme::suggestion()));
        }
    }
    lines.extend(body);
    lines.push(Line::from(""));
    lines.push(Line::from("Ctrl-S send • Esc cancel • Ctrl-Space suggest • Tab accept").style(theme::status()));

    let block = Block::default()
        .borders(Borders::ALL)
        .title("Compose email")
        .border_type(BorderType::Rounded)
        .border_style(theme::header_border())
        .style(theme::panel());
    f.render_widget(Clear, area);
    f.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: false }), area);
}
