use crate::email;
use casebook_types::{Action, ActionType, Case, DetailView, DraftChange, Email};

/// Per-panel state for the case being viewed: the shared edit flag, the pending
/// action, and the email draft with its overlay visibility.
#[derive(Debug, Clone, Default)]
pub struct DetailPanel {
    case_id: Option<String>,
    /// Contact address the draft was built for.
    bound_email: Option<String>,
    editing: bool,
    action_draft: Action,
    email: Email,
    email_open: bool,
}

impl DetailPanel {
    /// Points the panel at `case`. Switching to a different case leaves edit mode.
    /// A new case or a changed contact address closes the overlay and resets the
    /// email draft for that address.
    pub fn bind(&mut self, case: Option<&Case>) {
        let next_id = case.map(|c| c.id.clone());
        let next_email = case.map(|c| c.email.clone());
        let same_case = next_id == self.case_id;
        if same_case && next_email == self.bound_email {
            return;
        }
        if !same_case {
            self.case_id = next_id;
            self.editing = false;
        }
        self.bound_email = next_email;
        self.email_open = false;
        self.email = case.map(email::default_draft).unwrap_or_default();
    }

    pub fn case_id(&self) -> Option<&str> { self.case_id.as_deref() }

    pub fn editing(&self) -> bool { self.editing }

    pub fn set_editing(&mut self, on: bool) { self.editing = on; }

    pub fn action_draft(&self) -> &Action { &self.action_draft }

    pub fn set_action_draft(&mut self, draft: Action) { self.action_draft = draft; }

    /// Appends the pending action to `case` and resets the draft to an empty Call.
    pub fn log_draft(&mut self, case: &Case) -> Case {
        let action = std::mem::take(&mut self.action_draft);
        crate::edits::append_actions(case, [action])
    }

    pub fn email(&self) -> Option<&Email> {
        self.email_open.then_some(&self.email)
    }

    pub fn open_email(&mut self) -> &Email {
        self.email_open = true;
        &self.email
    }

    /// Opens the overlay pre-filled for `case`. The case itself is not touched.
    pub fn draft_email(&mut self, case: &Case, subject: String, body: String) -> &Email {
        self.email = Email { receiver: case.email.clone(), subject, body };
        self.open_email()
    }

    /// Replaces the draft; ignored while the overlay is closed.
    pub fn update_email(&mut self, draft: Email) -> Option<&Email> {
        if !self.email_open {
            return None;
        }
        self.email = draft;
        Some(&self.email)
    }

    pub fn change_email(&mut self, change: DraftChange) -> Option<&Email> {
        let next = email::apply_change(self.email()?, change);
        self.update_email(next)
    }

    /// Logs the draft on `case` as an Email action and closes the overlay.
    pub fn send_email(&mut self, case: &Case) -> Option<Case> {
        if !self.email_open {
            return None;
        }
        self.email_open = false;
        let details = email::send_details(&self.email);
        Some(crate::edits::append_actions(case, [Action::new(ActionType::Email, details)]))
    }

    pub fn cancel_email(&mut self) -> bool {
        std::mem::replace(&mut self.email_open, false)
    }

    pub fn view(&self) -> DetailView {
        DetailView {
            case_id: self.case_id.clone(),
            editing: self.editing,
            action_draft: self.action_draft.clone(),
            email: self.email().cloned(),
        }
    }
}
