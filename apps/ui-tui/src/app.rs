#![cfg(feature = "tui")]
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use ratatui::layout::Position;
use ratatui::{prelude::*, widgets::*};
use std::cell::Cell;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use unicode_width::UnicodeWidthChar;

use casebook_types::{
    Action, ActionType, Case, CaseRow, ChatMessage, ChatReply, Choice, DetailView, DirectoryView, DraftChange, Email,
    CHAT_GREETING,
};

use crate::keymap::{self, Hotkey};
use crate::net;
use crate::screens;
use crate::theme;
use crate::widgets::{cycle_option, ClickGate, FieldId, FieldKind, Gesture};

const POLL_EVERY: Duration = Duration::from_millis(700);

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Screen { Cases, Chat }

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Pane { List, Detail }

/// Focus target inside the detail panel, top to bottom.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum DetailFocus { Field(FieldId), Action(usize), DraftType, DraftDetails }

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum EmailFocus { Receiver, Subject, Body }

pub struct App {
    pub active: Screen,
    pub status: String,
    pub core_version: Option<String>,
    pub pane: Pane,
    pub rows: Vec<CaseRow>,
    pub list_sel: usize,
    pub directory: DirectoryView,
    pub selected: Option<Case>,
    pub detail: DetailView,
    pub detail_focus: DetailFocus,
    pub gates: HashMap<FieldId, ClickGate>,
    pub email_focus: EmailFocus,
    pub suggestion: Option<String>,
    // Chat
    pub chat_messages: Vec<ChatMessage>,
    pub chat_input: String,
    pub chat_scroll: usize,
    pub chat_busy: bool,
    pub show_help: bool,
    /// Body rect of the last frame, for mouse hit-testing.
    pub body_area: Cell<Rect>,
    last_poll: Option<Instant>,
    toasts: Vec<Toast>,
}

impl Default for App {
    fn default() -> Self {
        Self {
            active: Screen::Cases,
            status: "Disconnected".into(),
            core_version: None,
            pane: Pane::List,
            rows: vec![],
            list_sel: 0,
            directory: DirectoryView::default(),
            selected: None,
            detail: DetailView::default(),
            detail_focus: DetailFocus::Field(FieldId::ALL[0]),
            gates: HashMap::new(),
            email_focus: EmailFocus::Receiver,
            suggestion: None,
            chat_messages: vec![ChatMessage { role: "assistant".into(), content: CHAT_GREETING.into() }],
            chat_input: String::new(),
            chat_scroll: 0,
            chat_busy: false,
            show_help: false,
            body_area: Cell::new(Rect::default()),
            last_poll: None,
            toasts: vec![],
        }
    }
}

impl App {
    pub fn editing(&self) -> bool { self.detail.editing }

    pub fn email_open(&self) -> bool { self.detail.email.is_some() }

    /// Detail focus targets in display order.
    pub fn detail_targets(&self) -> Vec<DetailFocus> {
        let mut out: Vec<DetailFocus> = FieldId::ALL.iter().map(|f| DetailFocus::Field(*f)).collect();
        let n = self.selected.as_ref().map(|c| c.actions.len()).unwrap_or(0);
        out.extend((0..n).map(DetailFocus::Action));
        out.push(DetailFocus::DraftType);
        out.push(DetailFocus::DraftDetails);
        out
    }

    fn move_detail_focus(&mut self, step: isize) {
        let targets = self.detail_targets();
        let at = targets.iter().position(|t| *t == self.detail_focus).unwrap_or(0) as isize;
        let next = (at + step).clamp(0, targets.len() as isize - 1);
        self.detail_focus = targets[next as usize];
    }

    fn clear_gates(&mut self) {
        for g in self.gates.values_mut() {
            g.clear();
        }
    }
}

enum ChatEvent {
    Reply(ChatReply),
    Error(String),
}

#[derive(Copy, Clone)]
enum ToastKind { Info, Success, Warn, Error }
struct Toast { msg: String, kind: ToastKind, at: Instant }

fn ensure_logs_dir() {
    let _ = std::fs::create_dir_all("storage/logs");
}

fn log_line(level: &str, msg: &str) {
    ensure_logs_dir();
    let path = std::path::Path::new("storage/logs/ui-tui.log");
    if let Ok(mut f) = std::fs::OpenOptions::new().create(true).append(true).open(path) {
        use std::io::Write as _;
        let ts = match std::time::SystemTime::now().duration_since(std::time::UNIX_EPOCH) { Ok(d) => d.as_secs(), Err(_) => 0 };
        let _ = writeln!(f, "[{}][{}] {}", ts, level, msg.replace('\n', " "));
    }
}

fn push_toast(app: &mut App, msg: impl Into<String>, kind: ToastKind) {
    let m = msg.into();
    app.toasts.push(Toast { msg: m.clone(), kind, at: Instant::now() });
    match kind { ToastKind::Error => log_line("ERROR", &m), ToastKind::Warn => log_line("WARN", &m), ToastKind::Success | ToastKind::Info => log_line("INFO", &m) }
    if app.toasts.len() > 50 { app.toasts.drain(0..app.toasts.len() - 50); }
}

fn report_err(app: &mut App, what: &str, e: anyhow::Error) {
    app.status = format!("{} failed", what);
    push_toast(app, format!("{}: {}", what, e), ToastKind::Error);
}

pub async fn run() -> anyhow::Result<()> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    crossterm::execute!(stdout, crossterm::terminal::EnterAlternateScreen, crossterm::event::EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::default();
    app.status = format!("ui-tui v{}", env!("CARGO_PKG_VERSION"));
    match net::health().await {
        Ok(ver) => {
            push_toast(&mut app, format!("Connected (core v{})", ver), ToastKind::Success);
            app.core_version = Some(ver);
            app.status = "Connected".into();
        }
        Err(e) => push_toast(&mut app, format!("case-core unreachable: {}", e), ToastKind::Error),
    }
    if let Ok(dir) = net::directory().await { app.directory = dir; }
    sync(&mut app).await;

    // Background chat replies
    let (evt_tx, mut evt_rx) = tokio::sync::mpsc::unbounded_channel::<ChatEvent>();

    let res: anyhow::Result<()> = loop {
        terminal.draw(|f| ui(f, &app))?;

        while let Ok(ev) = evt_rx.try_recv() {
            app.chat_busy = false;
            match ev {
                ChatEvent::Reply(reply) => {
                    app.chat_messages.push(ChatMessage { role: "assistant".into(), content: reply.reply });
                    if !reply.operations.is_empty() {
                        push_toast(&mut app, format!("Assistant applied: {}", reply.operations.join(", ")), ToastKind::Info);
                        sync(&mut app).await;
                    }
                }
                ChatEvent::Error(msg) => push_toast(&mut app, msg, ToastKind::Error),
            }
        }

        // Fire single-press side actions whose double-press window has passed.
        let now = Instant::now();
        let fired: Vec<FieldId> = app.gates.iter_mut().filter_map(|(f, g)| g.poll(now).then_some(*f)).collect();
        for field in fired {
            if field == FieldId::Email && !app.editing() {
                open_email(&mut app).await;
            }
        }

        // The assistant may change cases at any time; keep the view current.
        if app.last_poll.map(|t| now.duration_since(t) > POLL_EVERY).unwrap_or(true) {
            sync(&mut app).await;
            app.last_poll = Some(now);
        }

        if event::poll(Duration::from_millis(40))? {
            match event::read()? {
                Event::Key(k) if k.kind == KeyEventKind::Press => {
                    match keymap::resolve(k) {
                        Hotkey::Quit => break Ok(()),
                        Hotkey::SwitchTab(i) => {
                            app.active = if i == 0 { Screen::Cases } else { Screen::Chat };
                            continue;
                        }
                        Hotkey::ToggleHelp => { app.show_help = !app.show_help; continue; }
                        Hotkey::Refresh => {
                            if let Ok(dir) = net::directory().await { app.directory = dir; }
                            sync(&mut app).await;
                            push_toast(&mut app, "Refreshed", ToastKind::Success);
                            continue;
                        }
                        _ => {}
                    }
                    if app.show_help {
                        if k.code == KeyCode::Esc { app.show_help = false; }
                        continue;
                    }
                    match app.active {
                        Screen::Cases => on_cases_key(&mut app, k).await,
                        Screen::Chat => on_chat_key(&mut app, k, &evt_tx),
                    }
                }
                Event::Mouse(m) => match m.kind {
                    MouseEventKind::Down(MouseButton::Left) if app.active == Screen::Cases && !app.email_open() => {
                        on_cases_click(&mut app, m.column, m.row).await;
                    }
                    MouseEventKind::ScrollUp if app.active == Screen::Chat => { app.chat_scroll = app.chat_scroll.saturating_add(3); }
                    MouseEventKind::ScrollDown if app.active == Screen::Chat => { app.chat_scroll = app.chat_scroll.saturating_sub(3); }
                    _ => {}
                },
                _ => {}
            }
        }
    };

    disable_raw_mode()?;
    crossterm::execute!(terminal.backend_mut(), crossterm::event::DisableMouseCapture, crossterm::terminal::LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    res
}

/// Pulls rows, the selected case and the detail panel from the core.
async fn sync(app: &mut App) {
    match net::list_cases().await {
        Ok(rows) => {
            if let Some(i) = rows.iter().position(|r| r.selected) {
                app.list_sel = i;
            }
            app.list_sel = app.list_sel.min(rows.len().saturating_sub(1));
            app.rows = rows;
        }
        Err(e) => {
            if app.status != "Disconnected" {
                push_toast(app, format!("lost case-core: {}", e), ToastKind::Warn);
            }
            app.status = "Disconnected".into();
            return;
        }
    }
    let prev_id = app.selected.as_ref().map(|c| c.id.clone());
    if let Ok(sel) = net::selected().await { app.selected = sel; }
    if let Ok(detail) = net::detail().await {
        let was_open = app.email_open();
        app.detail = detail;
        if !was_open && app.email_open() {
            // Opened by the assistant's draftEmail.
            app.email_focus = EmailFocus::Body;
            app.suggestion = None;
        }
    }
    if prev_id != app.selected.as_ref().map(|c| c.id.clone()) {
        app.gates.clear();
        app.detail_focus = DetailFocus::Field(FieldId::ALL[0]);
    }
    if !app.detail_targets().contains(&app.detail_focus) {
        app.detail_focus = DetailFocus::DraftType;
    }
}

fn apply_case(app: &mut App, case: Case) {
    if let Some(row) = app.rows.iter_mut().find(|r| r.id == case.id) {
        row.reason = case.reason.clone();
    }
    if app.selected.as_ref().map(|c| c.id == case.id).unwrap_or(false) {
        app.selected = Some(case);
    }
}

async fn select_row(app: &mut App, index: usize) {
    let Some(id) = app.rows.get(index).map(|r| r.id.clone()) else { return };
    app.list_sel = index;
    match net::select(Some(&id)).await {
        Ok(case) => {
            app.status = match &case { Some(c) => format!("Case {}", c.id), None => "No case selected".into() };
            sync(app).await;
        }
        Err(e) => report_err(app, "select", e),
    }
}

async fn set_editing(app: &mut App, on: bool) {
    if app.selected.is_none() { return; }
    match net::set_editing(on).await {
        Ok(view) => {
            app.detail = view;
            if on { app.clear_gates(); }
        }
        Err(e) => report_err(app, "edit mode", e),
    }
}

async fn open_email(app: &mut App) {
    match net::email_open().await {
        Ok(draft) => {
            app.detail.email = Some(draft);
            app.email_focus = EmailFocus::Receiver;
            app.suggestion = None;
        }
        Err(e) => report_err(app, "open email", e),
    }
}

/// Press on a form field, from Enter or a mouse click.
async fn press_field(app: &mut App, field: FieldId) {
    app.detail_focus = DetailFocus::Field(field);
    if app.editing() {
        return;
    }
    let now = Instant::now();
    let gesture = app.gates.entry(field).or_default().press(now, field.has_side_action());
    if gesture == Gesture::Double {
        set_editing(app, true).await;
    }
}

async fn edit_field(app: &mut App, field: FieldId, value: String) {
    let Some(case_id) = app.selected.as_ref().map(|c| c.id.clone()) else { return };
    let Some(edit) = field.edit(value) else { return };
    match net::edit(&case_id, &edit).await {
        Ok(case) => {
            apply_case(app, case);
            if field == FieldId::Reason {
                if let Ok(rows) = net::list_cases().await { app.rows = rows; }
            }
        }
        Err(e) => report_err(app, "edit", e),
    }
}

async fn update_draft(app: &mut App, draft: Action) {
    match net::set_action_draft(&draft).await {
        Ok(view) => app.detail = view,
        Err(e) => report_err(app, "action draft", e),
    }
}

async fn log_draft(app: &mut App) {
    match net::log_action().await {
        Ok(case) => {
            apply_case(app, case);
            if let Ok(view) = net::detail().await { app.detail = view; }
            push_toast(app, "Action logged", ToastKind::Success);
        }
        Err(e) => report_err(app, "log action", e),
    }
}

async fn remove_action(app: &mut App, index: usize) {
    let Some(case_id) = app.selected.as_ref().map(|c| c.id.clone()) else { return };
    match net::remove_action(&case_id, index).await {
        Ok(case) => {
            apply_case(app, case);
            if !app.detail_targets().contains(&app.detail_focus) { app.move_detail_focus(-1); }
        }
        Err(e) => report_err(app, "remove action", e),
    }
}

async fn on_cases_key(app: &mut App, k: KeyEvent) {
    if app.email_open() {
        on_email_key(app, k).await;
        return;
    }
    match keymap::resolve(k) {
        Hotkey::ToggleEdit => { let on = !app.editing(); set_editing(app, on).await; return; }
        Hotkey::LogAction => { log_draft(app).await; return; }
        _ => {}
    }
    match app.pane {
        Pane::List => match k.code {
            KeyCode::Up => { app.list_sel = app.list_sel.saturating_sub(1); }
            KeyCode::Down => { if !app.rows.is_empty() { app.list_sel = (app.list_sel + 1).min(app.rows.len() - 1); } }
            KeyCode::Enter => { let i = app.list_sel; select_row(app, i).await; }
            KeyCode::Tab | KeyCode::Right => { if app.selected.is_some() { app.pane = Pane::Detail; } }
            _ => {}
        },
        Pane::Detail => on_detail_key(app, k).await,
    }
}

async fn on_detail_key(app: &mut App, k: KeyEvent) {
    let Some(case) = app.selected.clone() else {
        app.pane = Pane::List;
        return;
    };
    let editing = app.editing();
    match (k.code, app.detail_focus) {
        (KeyCode::Tab, _) | (KeyCode::BackTab, _) => { app.pane = Pane::List; }
        (KeyCode::Esc, _) => {
            if editing { set_editing(app, false).await; } else { app.pane = Pane::List; }
        }
        (KeyCode::Up, _) => app.move_detail_focus(-1),
        (KeyCode::Down, _) => app.move_detail_focus(1),
        (KeyCode::Enter, DetailFocus::Field(f)) => press_field(app, f).await,
        (KeyCode::Enter, DetailFocus::DraftType | DetailFocus::DraftDetails) => log_draft(app).await,
        (KeyCode::Delete, DetailFocus::Action(i)) => remove_action(app, i).await,
        (KeyCode::Left | KeyCode::Right, DetailFocus::Field(f)) if editing && f.kind() == FieldKind::Select => {
            let step = if k.code == KeyCode::Left { -1 } else { 1 };
            if let Some(next) = cycle_option(&f.options(&app.directory), &f.raw_value(&case), step) {
                edit_field(app, f, next).await;
            }
        }
        (KeyCode::Left | KeyCode::Right, DetailFocus::DraftType) => {
            let opts = casebook_types::choice_options::<ActionType>();
            let step = if k.code == KeyCode::Left { -1 } else { 1 };
            let current = app.detail.action_draft.kind.as_str();
            if let Some(kind) = cycle_option(&opts, current, step).and_then(|v| ActionType::parse(&v)) {
                let draft = Action { kind, ..app.detail.action_draft.clone() };
                update_draft(app, draft).await;
            }
        }
        (KeyCode::Char(ch), DetailFocus::Field(f)) if editing && f.kind() == FieldKind::Text && !k.modifiers.contains(KeyModifiers::CONTROL) => {
            let mut value = f.raw_value(&case);
            value.push(ch);
            edit_field(app, f, value).await;
        }
        (KeyCode::Backspace, DetailFocus::Field(f)) if editing && f.kind() == FieldKind::Text => {
            let mut value = f.raw_value(&case);
            if value.pop().is_some() { edit_field(app, f, value).await; }
        }
        (KeyCode::Char(ch), DetailFocus::DraftDetails) if !k.modifiers.contains(KeyModifiers::CONTROL) => {
            let mut draft = app.detail.action_draft.clone();
            draft.details.push(ch);
            update_draft(app, draft).await;
        }
        (KeyCode::Backspace, DetailFocus::DraftDetails) => {
            let mut draft = app.detail.action_draft.clone();
            if draft.details.pop().is_some() { update_draft(app, draft).await; }
        }
        _ => {}
    }
}

async fn on_email_key(app: &mut App, k: KeyEvent) {
    let Some(draft) = app.detail.email.clone() else { return };
    match keymap::resolve(k) {
        Hotkey::SendEmail => {
            match net::email_send().await {
                Ok(case) => {
                    apply_case(app, case);
                    app.detail.email = None;
                    app.suggestion = None;
                    push_toast(app, "Email sent and logged", ToastKind::Success);
                }
                Err(e) => report_err(app, "send email", e),
            }
            return;
        }
        Hotkey::Suggest => {
            if app.email_focus == EmailFocus::Body {
                match net::email_suggest(&draft.body).await {
                    Ok(s) if !s.is_empty() => app.suggestion = Some(s),
                    Ok(_) => app.suggestion = None,
                    Err(e) => report_err(app, "suggest", e),
                }
            }
            return;
        }
        _ => {}
    }
    let change = match k.code {
        KeyCode::Esc => {
            match net::email_cancel().await {
                Ok(()) => { app.detail.email = None; app.suggestion = None; }
                Err(e) => report_err(app, "cancel email", e),
            }
            return;
        }
        KeyCode::Tab if app.email_focus == EmailFocus::Body && app.suggestion.is_some() => {
            let s = app.suggestion.take().unwrap_or_default();
            Some(DraftChange::Body(format!("{}{}", draft.body, s)))
        }
        KeyCode::Tab | KeyCode::Down => { app.email_focus = next_email_focus(app.email_focus, 1); None }
        KeyCode::BackTab | KeyCode::Up => { app.email_focus = next_email_focus(app.email_focus, -1); None }
        KeyCode::Enter if app.email_focus == EmailFocus::Body => Some(edit_email_text(&draft, app.email_focus, |s| s.push('\n'))),
        KeyCode::Char(ch) if !k.modifiers.contains(KeyModifiers::CONTROL) => Some(edit_email_text(&draft, app.email_focus, |s| s.push(ch))),
        KeyCode::Backspace => Some(edit_email_text(&draft, app.email_focus, |s| { s.pop(); })),
        _ => None,
    };
    if let Some(change) = change {
        app.suggestion = None;
        match net::email_change(&change).await {
            Ok(email) => app.detail.email = Some(email),
            Err(e) => report_err(app, "email draft", e),
        }
    }
}

fn next_email_focus(f: EmailFocus, step: isize) -> EmailFocus {
    const ORDER: [EmailFocus; 3] = [EmailFocus::Receiver, EmailFocus::Subject, EmailFocus::Body];
    let at = ORDER.iter().position(|x| *x == f).unwrap_or(0) as isize;
    ORDER[(at + step).rem_euclid(ORDER.len() as isize) as usize]
}

fn edit_email_text(draft: &Email, focus: EmailFocus, f: impl FnOnce(&mut String)) -> DraftChange {
    match focus {
        EmailFocus::Receiver => { let mut s = draft.receiver.clone(); f(&mut s); DraftChange::Receiver(s) }
        EmailFocus::Subject => { let mut s = draft.subject.clone(); f(&mut s); DraftChange::Subject(s) }
        EmailFocus::Body => { let mut s = draft.body.clone(); f(&mut s); DraftChange::Body(s) }
    }
}

async fn on_cases_click(app: &mut App, x: u16, y: u16) {
    let (list, detail) = screens::cases::regions(app.body_area.get());
    let pos = Position { x, y };
    if list.contains(pos) {
        app.pane = Pane::List;
        if let Some(i) = screens::cases::row_at(list, y, app.rows.len()) {
            select_row(app, i).await;
        }
    } else if detail.contains(pos) && app.selected.is_some() {
        app.pane = Pane::Detail;
        let n_actions = app.selected.as_ref().map(|c| c.actions.len()).unwrap_or(0);
        match screens::cases::target_at(detail, y, n_actions) {
            Some(DetailFocus::Field(f)) => press_field(app, f).await,
            Some(t) => app.detail_focus = t,
            None => {}
        }
    }
}

fn on_chat_key(app: &mut App, k: KeyEvent, tx: &tokio::sync::mpsc::UnboundedSender<ChatEvent>) {
    match k.code {
        KeyCode::Enter => {
            let text = app.chat_input.trim().to_string();
            if text.is_empty() || app.chat_busy { return; }
            app.chat_input.clear();
            app.chat_scroll = 0;
            app.chat_messages.push(ChatMessage { role: "user".into(), content: text });
            app.chat_busy = true;
            let history = app.chat_messages.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                let ev = match net::chat_complete(history).await {
                    Ok(reply) => ChatEvent::Reply(reply),
                    Err(e) => ChatEvent::Error(format!("chat error: {}", e)),
                };
                let _ = tx.send(ev);
            });
        }
        KeyCode::Backspace => { app.chat_input.pop(); }
        KeyCode::PageUp => { app.chat_scroll = app.chat_scroll.saturating_add(5); }
        KeyCode::PageDown => { app.chat_scroll = app.chat_scroll.saturating_sub(5); }
        KeyCode::Char(ch) if !k.modifiers.contains(KeyModifiers::CONTROL) => app.chat_input.push(ch),
        _ => {}
    }
}

fn wrap_text_lines(text: &str, inner_width: u16) -> Vec<String> {
    if inner_width == 0 { return vec![String::new()]; }
    let w = inner_width as usize;
    let mut out: Vec<String> = Vec::new();
    for raw in text.split('\n') {
        let mut cur = String::new();
        let mut cur_w = 0usize;
        for ch in raw.chars() {
            let cw = UnicodeWidthChar::width(ch).unwrap_or(0);
            if cur_w > 0 && cur_w + cw > w {
                out.push(std::mem::take(&mut cur));
                cur_w = 0;
            }
            cur.push(ch);
            cur_w += cw;
        }
        out.push(cur);
    }
    out
}

fn ui(f: &mut Frame, app: &App) {
    let size = f.area();
    f.render_widget(Block::default().style(theme::body()), size);
    let header_h: u16 = 3;
    let footer_h: u16 = 1;
    let input_h: u16 = if app.active == Screen::Chat {
        let lines = wrap_text_lines(&app.chat_input, size.width.saturating_sub(2)).len() as u16;
        (lines + 2).clamp(3, size.height.saturating_sub(header_h + footer_h + 6).max(3))
    } else {
        0
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(header_h),
            Constraint::Min(1),
            Constraint::Length(input_h),
            Constraint::Length(footer_h),
        ])
        .split(size);

    let header_block = Block::default()
        .borders(Borders::ALL)
        .title(" Casebook ")
        .title_alignment(Alignment::Left)
        .style(theme::header_block())
        .border_style(theme::header_border())
        .border_type(BorderType::Rounded);
    let header_inner = header_block.inner(chunks[0]);
    f.render_widget(header_block, chunks[0]);
    let titles = ["Cases", "Assistant"].iter().enumerate().map(|(i, t)| {
        let label = format!(" {} {} ", i + 1, t);
        Line::from(Span::styled(label, if app.active as usize == i { theme::tab_active() } else { theme::tab_inactive() }))
    });
    let tabs = Tabs::new(titles)
        .select(app.active as usize)
        .highlight_style(theme::tab_active())
        .style(Style::default().bg(theme::bg()).fg(theme::fg()));
    f.render_widget(tabs, header_inner);

    app.body_area.set(chunks[1]);
    match app.active {
        Screen::Cases => screens::cases::draw(f, chunks[1], app),
        Screen::Chat => screens::chat::draw(f, chunks[1], app),
    }

    if app.active == Screen::Chat {
        let lines: Vec<Line> = wrap_text_lines(&app.chat_input, chunks[2].width.saturating_sub(2)).into_iter().map(Line::from).collect();
        let title = if app.chat_busy { "Message (waiting for reply…)" } else { "Message" };
        let input = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title).border_style(theme::header_border()));
        f.render_widget(input, chunks[2]);
    }

    let hints = match app.active {
        Screen::Cases if app.email_open() => "Ctrl-S send • Esc cancel • Ctrl-Space suggest, Tab accept",
        Screen::Cases => "Enter select/press • double Enter or Ctrl-E edit • Esc done • Ctrl-L log action • Del remove action",
        Screen::Chat => "Enter send • PgUp/PgDn scroll",
    };
    let version = app.core_version.as_deref().map(|v| format!(" • core v{}", v)).unwrap_or_default();
    let status = Paragraph::new(format!("{}{} | {} • F1/F2 tabs • Ctrl-H help • Ctrl-Q quit", app.status, version, hints)).style(theme::status());
    f.render_widget(status, chunks[3]);

    if app.active == Screen::Cases {
        if let Some(draft) = &app.detail.email {
            screens::email::draw(f, centered_rect(70, 60, size), draft, app);
        }
    }

    // Toasts overlay (bottom-right)
    let now = Instant::now();
    let mut active: Vec<&Toast> = app.toasts.iter().filter(|t| now.duration_since(t.at) < Duration::from_millis(3500)).collect();
    if !active.is_empty() {
        let max = active.len().min(3);
        active = active[active.len() - max..].to_vec();
        let width = 52u16.min(size.width);
        let height = (active.len() as u16) + 2;
        let area = Rect { x: size.x + size.width.saturating_sub(width + 2), y: size.y + size.height.saturating_sub(height + 2), width, height };
        let lines: Vec<Line> = active
            .iter()
            .map(|t| {
                let style = match t.kind { ToastKind::Info => Style::default().fg(Color::Cyan), ToastKind::Success => Style::default().fg(Color::Green), ToastKind::Warn => Style::default().fg(Color::Yellow), ToastKind::Error => Style::default().fg(Color::Red) };
                Line::from(t.msg.as_str()).style(style)
            })
            .collect();
        f.render_widget(Clear, area);
        let block = Block::default()
            .borders(Borders::ALL)
            .title("Notifications")
            .border_type(BorderType::Rounded)
            .border_style(theme::header_border())
            .style(theme::panel());
        f.render_widget(Paragraph::new(lines).block(block).style(theme::panel()), area);
    }

    if app.show_help {
        let area = centered_rect(70, 60, size);
        let lines = vec![
            "Tabs: F1 Cases, F2 Assistant (Alt-1/Alt-2 also work)",
            "Case list: ↑/↓ move, Enter or click select, Tab to the detail panel",
            "Detail: ↑/↓ move between fields, actions and the new-action row",
            "Double Enter or double click a field to edit; Ctrl-E toggles, Esc is Done",
            "Selects: ←/→ cycle values while editing",
            "Email field: single Enter or click opens the compose overlay",
            "New action: ←/→ type, type details, Enter or Ctrl-L to log; Del removes an action",
            "Compose: Tab/↑/↓ fields, Ctrl-Space suggest, Tab accept, Ctrl-S send, Esc cancel",
            "Refresh: Ctrl-R  •  Quit: Ctrl-Q  •  Help: Ctrl-H",
        ];
        let block = Block::default()
            .borders(Borders::ALL)
            .title("Help")
            .border_type(BorderType::Rounded)
            .border_style(theme::header_border())
            .style(theme::panel());
        f.render_widget(Clear, area);
        f.render_widget(Paragraph::new(lines.into_iter().map(Line::from).collect::<Vec<_>>()).block(block).wrap(Wrap { trim: true }), area);
    }
}

pub(crate) fn centered_rect(pct_x: u16, pct_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default().direction(Direction::Vertical).constraints([
        Constraint::Percentage((100 - pct_y) / 2), Constraint::Percentage(pct_y), Constraint::Percentage((100 - pct_y) / 2),]).split(r);
    Layout::default().direction(Direction::Horizontal).constraints([
        Constraint::Percentage((100 - pct_x) / 2), Constraint::Percentage(pct_x), Constraint::Percentage((100 - pct_x) / 2),]).split(popup_layout[1])[1]
}

pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max { s.to_string() } else { format!("{}…", s.chars().take(max.saturating_sub(1)).collect::<String>()) }
}
