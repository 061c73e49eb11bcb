#![cfg(feature = "tui")]
use ratatui::{prelude::*, widgets::*};
use casebook_types::Choice;
use crate::app::{truncate, App, DetailFocus, Pane};
use crate::theme;
use crate::widgets::{FieldId, FieldKind};

// Row offsets inside the detail block, shared by drawing and hit-testing.
const FIELDS_TOP: u16 = 1;
const ACTIONS_HEADER: u16 = FIELDS_TOP + FieldId::ALL.len() as u16 + 1;
const ACTIONS_TOP: u16 = ACTIONS_HEADER + 1;
const LABEL_W: usize = 10;

/// Splits the body into the case list and the detail panel.
pub fn regions(area: Rect) -> (Rect, Rect) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(34), Constraint::Percentage(66)])
        .split(area);
    (cols[0], cols[1])
}

pub fn row_at(list: Rect, y: u16, rows: usize) -> Option<usize> {
    if y <= list.y || y + 1 >= list.y + list.height {
        return None;
    }
    let i = (y - list.y - 1) as usize;
    (i < rows).then_some(i)
}

/// What sits on screen row `y` of the detail panel.
pub fn target_at(detail: Rect, y: u16, actions: usize) -> Option<DetailFocus> {
    if y <= detail.y || y + 1 >= detail.y + detail.height {
        return None;
    }
    let line = y - detail.y - 1;
    if line >= FIELDS_TOP && ((line - FIELDS_TOP) as usize) < FieldId::ALL.len() {
        return Some(DetailFocus::Field(FieldId::ALL[(line - FIELDS_TOP) as usize]));
    }
    if line < ACTIONS_TOP {
        return None;
    }
    let k = (line - ACTIONS_TOP) as usize;
    match k {
        k if k < actions => Some(DetailFocus::Action(k)),
        k if k == actions => Some(DetailFocus::DraftType),
        k if k == actions + 1 => Some(DetailFocus::DraftDetails),
        _ => None,
    }
}

pub fn draw(f: &mut Frame, area: Rect, app: &App) {
    let (list, detail) = regions(area);
    draw_list(f, list, app);
    draw_detail(f, detail, app);
}

fn draw_list(f: &mut Frame, area: Rect, app: &App) {
    let width = area.width.saturating_sub(4) as usize;
    let items: Vec<ListItem> = app
        .rows
        .iter()
        .enumerate()
        .map(|(i, r)| {
            let marker = if r.selected { "●" } else { " " };
            let text = truncate(&format!("{} {}  {}", marker, r.id, r.reason), width);
            let style = if app.pane == Pane::List && i == app.list_sel {
                theme::row_selected()
            } else if r.selected {
                theme::field_focus()
            } else {
                Style::default()
            };
            ListItem::new(text).style(style)
        })
        .collect();
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("Cases ({})", app.rows.len()))
        .border_style(theme::border(app.pane == Pane::List));
    f.render_widget(List::new(items).block(block), area);
}

fn draw_detail(f: &mut Frame, area: Rect, app: &App) {
    let focused = app.pane == Pane::Detail;
    let block = Block::default()
        .borders(Borders::ALL)
        .title(if app.detail.editing { "Details • editing (Esc: Done)" } else { "Details" })
        .border_style(theme::border(focused));
    let Some(case) = app.selected.as_ref() else {
        f.render_widget(Paragraph::new("Select a case from the list").style(theme::status()).block(block), area);
        return;
    };
    let width = area.width.saturating_sub(2 + LABEL_W as u16 + 1) as usize;
    let is_focus = |t: DetailFocus| focused && app.detail_focus == t;

    let mut lines: Vec<Line> = vec![Line::from(format!("Case {}", case.id)).style(theme::tab_active())];
    for field in FieldId::ALL {
        let here = is_focus(DetailFocus::Field(field));
        let mut value = field.display(case, &app.directory);
        if app.detail.editing && here {
            value = match field.kind() {
                FieldKind::Select => format!("‹ {} ›", value),
                FieldKind::Text => format!("{}▏", value),
            };
        }
        let value_style = if app.detail.editing && here {
            theme::field_editing()
        } else if here {
            theme::field_focus()
        } else {
            Style::default()
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{:<w$}", field.label(), w = LABEL_W), theme::field_label()),
            Span::styled(truncate(&value, width), value_style),
        ]));
    }
    lines.push(Line::from(""));
    let header = if case.actions.is_empty() { "Actions (none)".to_string() } else { format!("Actions ({})", case.actions.len()) };
    lines.push(Line::from(header).style(theme::field_label()));
    for (i, a) in case.actions.iter().enumerate() {
        let style = if is_focus(DetailFocus::Action(i)) { theme::field_focus() } else { Style::default() };
        lines.push(Line::from(truncate(&format!("  {:<8}{}", a.kind.as_str(), a.details), width + LABEL_W)).style(style));
    }
    let draft = &app.detail.action_draft;
    let type_style = if is_focus(DetailFocus::DraftType) { theme::field_focus() } else { theme::field_label() };
    let details_style = if is_focus(DetailFocus::DraftDetails) { theme::field_editing() } else { Style::default() };
    lines.push(Line::from(vec![
        Span::styled(format!("{:<w$}", "+ Type", w = LABEL_W), theme::field_label()),
        Span::styled(format!("‹ {} ›", draft.kind.as_str()), type_style),
    ]));
    lines.push(Line::from(vec![
        Span::styled(format!("{:<w$}", "  Details", w = LABEL_W), theme::field_label()),
        Span::styled(truncate(&draft.details, width), details_style),
    ]));
    f.render_widget(Paragraph::new(lines).block(block), area);
}
