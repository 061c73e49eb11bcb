//! Case mutations. Every function takes the current case by reference and returns
//! a new value; the workspace swaps it into the collection by id.

use crate::directory::Directory;
use casebook_types::{Account, Action, Case, CaseType, FieldEdit, Origin, Priority, Status, User};

/// Applies a single form edit. Owner/account ids that match nothing produce `None`
/// (no change).
pub fn apply_field_edit(case: &Case, edit: FieldEdit, dir: &Directory) -> Option<Case> {
    let mut next = case.clone();
    match edit {
        FieldEdit::Owner(id) => next.owner = dir.user(&id)?.clone(),
        FieldEdit::Account(id) => next.account = dir.account(&id)?.clone(),
        FieldEdit::Phone(v) => next.phone = v,
        FieldEdit::Email(v) => next.email = v,
        FieldEdit::Name(v) => next.name = v,
        FieldEdit::Status(v) => next.status = v,
        FieldEdit::Priority(v) => next.priority = v,
        FieldEdit::Type(v) => next.kind = v,
        FieldEdit::Origin(v) => next.origin = v,
        FieldEdit::Reason(v) => next.reason = v,
        FieldEdit::Notes(v) => next.notes = v,
    }
    Some(next)
}

pub fn append_actions(case: &Case, actions: impl IntoIterator<Item = Action>) -> Case {
    let mut next = case.clone();
    next.actions.extend(actions);
    next
}

/// Drops exactly the action at `index`; `None` when out of range.
pub fn remove_action(case: &Case, index: usize) -> Option<Case> {
    if index >= case.actions.len() {
        return None;
    }
    let mut next = case.clone();
    next.actions = case
        .actions
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != index)
        .map(|(_, a)| a.clone())
        .collect();
    Some(next)
}

/// Resolved partial update: every field already validated, owner/account already
/// looked up. Produced by the assistant's `updateCase` operation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CaseUpdate {
    pub owner: Option<User>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
    pub account: Option<Account>,
    pub status: Option<Status>,
    pub priority: Option<Priority>,
    pub kind: Option<CaseType>,
    pub origin: Option<Origin>,
    pub reason: Option<String>,
    pub notes: Option<String>,
}

impl CaseUpdate {
    pub fn fields(&self) -> Vec<&'static str> {
        let mut out = vec![];
        if self.owner.is_some() { out.push("owner"); }
        if self.phone.is_some() { out.push("phone"); }
        if self.email.is_some() { out.push("email"); }
        if self.name.is_some() { out.push("name"); }
        if self.account.is_some() { out.push("account"); }
        if self.status.is_some() { out.push("status"); }
        if self.priority.is_some() { out.push("priority"); }
        if self.kind.is_some() { out.push("type"); }
        if self.origin.is_some() { out.push("origin"); }
        if self.reason.is_some() { out.push("reason"); }
        if self.notes.is_some() { out.push("notes"); }
        out
    }

    pub fn is_empty(&self) -> bool {
        self.fields().is_empty()
    }

    /// Merges every present field into a copy of `case`.
    pub fn apply(self, case: &Case) -> Case {
        let mut next = case.clone();
        if let Some(v) = self.owner { next.owner = v; }
        if let Some(v) = self.phone { next.phone = v; }
        if let Some(v) = self.email { next.email = v; }
        if let Some(v) = self.name { next.name = v; }
        if let Some(v) = self.account { next.account = v; }
        if let Some(v) = self.status { next.status = v; }
        if let Some(v) = self.priority { next.priority = v; }
        if let Some(v) = self.kind { next.kind = v; }
        if let Some(v) = self.origin { next.origin = v; }
        if let Some(v) = self.reason { next.reason = v; }
        if let Some(v) = self.notes { next.notes = v; }
        next
    }
}
