use crate::detail::DetailPanel;
use crate::directory::Directory;
use crate::edits::{self, CaseUpdate};
use crate::email::SuggestionRequest;
use crate::fixtures;
use crate::store::CaseStore;
use casebook_types::{Action, Case, CaseRow, DetailView, DraftChange, Email, FieldEdit};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkspaceError {
    #[error("case not found: {0}")]
    CaseNotFound(String),
    #[error("case {case_id} has no action at position {index}")]
    ActionNotFound { case_id: String, index: usize },
    #[error("no case selected")]
    NoCaseSelected,
    #[error("email overlay is not open")]
    EmailClosed,
}

pub type Result<T> = std::result::Result<T, WorkspaceError>;

/// Root of all case state: the directory, the collection with its selection, and
/// the detail panel for the selected case. Every change lands through `commit`.
#[derive(Debug, Clone)]
pub struct Workspace {
    directory: Directory,
    store: CaseStore,
    detail: DetailPanel,
}

impl Workspace {
    pub fn new(directory: Directory, cases: Vec<Case>) -> Self {
        Self { directory, store: CaseStore::new(cases), detail: DetailPanel::default() }
    }

    pub fn seeded() -> Self {
        let directory = fixtures::directory();
        let cases = fixtures::cases(&directory);
        Self::new(directory, cases)
    }

    pub fn directory(&self) -> &Directory { &self.directory }

    pub fn cases(&self) -> &[Case] { self.store.cases() }

    pub fn rows(&self) -> Vec<CaseRow> { self.store.rows() }

    pub fn case(&self, id: &str) -> Result<&Case> {
        self.store.get(id).ok_or_else(|| WorkspaceError::CaseNotFound(id.to_string()))
    }

    pub fn selected(&self) -> Option<&Case> { self.store.selected() }

    /// Changes the selection. An id that matches nothing leaves "no case selected".
    pub fn select(&mut self, id: Option<&str>) -> Option<Case> {
        let selected = self.store.select(id).cloned();
        self.detail.bind(selected.as_ref());
        debug!(requested = ?id, found = selected.is_some(), "selection changed");
        selected
    }

    /// Text the assistant reads to know which case is on screen.
    pub fn context(&self) -> String {
        match self.selected() {
            Some(case) => format!(
                "This is the current case: {}",
                serde_json::to_string(case).unwrap_or_else(|_| "{}".into())
            ),
            None => "No case selected".to_string(),
        }
    }

    pub fn detail_view(&self) -> DetailView {
        if self.selected().is_none() {
            return DetailView::default();
        }
        self.detail.view()
    }

    fn commit(&mut self, case: Case, kind: &'static str) -> Result<Case> {
        let id = case.id.clone();
        if !self.store.replace(case.clone()) {
            return Err(WorkspaceError::CaseNotFound(id));
        }
        if self.store.selected_id() == Some(id.as_str()) {
            self.detail.bind(Some(&case));
        }
        casebook_telemetry::inc_case_mutation(kind);
        info!(case_id = %id, kind, "case updated");
        Ok(case)
    }

    fn selected_case(&self) -> Result<Case> {
        self.selected().cloned().ok_or(WorkspaceError::NoCaseSelected)
    }

    // ---- form edits ----

    /// Unknown owner/account ids are a silent no-op: the case comes back unchanged.
    pub fn edit_field(&mut self, id: &str, edit: FieldEdit) -> Result<Case> {
        let current = self.case(id)?.clone();
        let field = edit.field();
        match edits::apply_field_edit(&current, edit, &self.directory) {
            Some(next) => self.commit(next, "field_edit"),
            None => {
                debug!(case_id = %id, field, "edit referenced an unknown id; ignored");
                Ok(current)
            }
        }
    }

    pub fn append_action(&mut self, id: &str, action: Action) -> Result<Case> {
        let current = self.case(id)?.clone();
        self.commit(edits::append_actions(&current, [action]), "log_action")
    }

    pub fn remove_action(&mut self, id: &str, index: usize) -> Result<Case> {
        let current = self.case(id)?.clone();
        let next = edits::remove_action(&current, index)
            .ok_or_else(|| WorkspaceError::ActionNotFound { case_id: id.to_string(), index })?;
        self.commit(next, "remove_action")
    }

    // ---- detail panel ----

    pub fn set_editing(&mut self, on: bool) -> Result<DetailView> {
        self.selected_case()?;
        self.detail.set_editing(on);
        Ok(self.detail.view())
    }

    pub fn set_action_draft(&mut self, draft: Action) -> Result<DetailView> {
        self.selected_case()?;
        self.detail.set_action_draft(draft);
        Ok(self.detail.view())
    }

    pub fn log_action_draft(&mut self) -> Result<Case> {
        let current = self.selected_case()?;
        let next = self.detail.log_draft(&current);
        self.commit(next, "log_action")
    }

    pub fn open_email(&mut self) -> Result<Email> {
        self.selected_case()?;
        Ok(self.detail.open_email().clone())
    }

    pub fn update_email(&mut self, draft: Email) -> Result<Email> {
        self.selected_case()?;
        self.detail.update_email(draft).cloned().ok_or(WorkspaceError::EmailClosed)
    }

    pub fn change_email(&mut self, change: DraftChange) -> Result<Email> {
        self.selected_case()?;
        self.detail.change_email(change).cloned().ok_or(WorkspaceError::EmailClosed)
    }

    pub fn send_email(&mut self) -> Result<Case> {
        let current = self.selected_case()?;
        let next = self.detail.send_email(&current).ok_or(WorkspaceError::EmailClosed)?;
        self.commit(next, "send_email")
    }

    pub fn cancel_email(&mut self) -> Result<()> {
        self.selected_case()?;
        self.detail.cancel_email();
        Ok(())
    }

    pub fn suggestion_request(&self, text: &str, max_tokens: u32, stop: Vec<String>) -> Result<SuggestionRequest> {
        let case = self.selected().ok_or(WorkspaceError::NoCaseSelected)?;
        Ok(SuggestionRequest::for_case(case, text, max_tokens, stop))
    }

    // ---- assistant operations (always against the selected case) ----

    pub fn apply_update(&mut self, update: CaseUpdate) -> Result<Case> {
        let current = self.selected_case()?;
        if update.is_empty() {
            return Ok(current);
        }
        self.commit(update.apply(&current), "assistant_update")
    }

    pub fn log_actions(&mut self, actions: Vec<Action>) -> Result<Case> {
        let current = self.selected_case()?;
        if actions.is_empty() {
            return Ok(current);
        }
        self.commit(edits::append_actions(&current, actions), "assistant_log_actions")
    }

    pub fn draft_email(&mut self, subject: String, body: String) -> Result<Email> {
        let current = self.selected_case()?;
        Ok(self.detail.draft_email(&current, subject, body).clone())
    }
}
