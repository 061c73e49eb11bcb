//! Editable field model for the case form: which fields exist, how they read and
//! write a case, and the single/double press disambiguation.
#![cfg_attr(not(feature = "tui"), allow(dead_code))]

use casebook_types::{
    choice_options, Case, CaseType, Choice, DirectoryView, FieldEdit, Origin, Priority, SelectOption, Status,
};
use std::time::{Duration, Instant};

/// Window in which a second press promotes to edit mode.
pub const CLICK_WINDOW: Duration = Duration::from_millis(200);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    /// First press; a side action (if any) is armed.
    Single,
    /// Second press inside the window: enter edit mode.
    Double,
}

/// Per-field press tracker. Holds at most one armed side action; entering edit
/// mode or dropping the field clears it.
#[derive(Debug, Default, Clone)]
pub struct ClickGate {
    last_press: Option<Instant>,
    armed: bool,
}

impl ClickGate {
    pub fn press(&mut self, now: Instant, has_side_action: bool) -> Gesture {
        if let Some(prev) = self.last_press {
            if now.saturating_duration_since(prev) <= CLICK_WINDOW {
                self.clear();
                return Gesture::Double;
            }
        }
        self.last_press = Some(now);
        self.armed = has_side_action;
        Gesture::Single
    }

    /// True exactly once, when an armed side action's window has passed.
    pub fn poll(&mut self, now: Instant) -> bool {
        let Some(prev) = self.last_press else { return false };
        if now.saturating_duration_since(prev) <= CLICK_WINDOW {
            return false;
        }
        let fire = self.armed;
        self.clear();
        fire
    }

    #[cfg(test)]
    pub fn is_armed(&self) -> bool { self.armed }

    pub fn clear(&mut self) {
        self.last_press = None;
        self.armed = false;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldId {
    Owner,
    Phone,
    Email,
    Name,
    Account,
    Status,
    Priority,
    Type,
    Origin,
    Reason,
    Notes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind { Text, Select }

impl FieldId {
    /// Form order.
    pub const ALL: [FieldId; 11] = [
        FieldId::Owner,
        FieldId::Name,
        FieldId::Phone,
        FieldId::Email,
        FieldId::Account,
        FieldId::Status,
        FieldId::Priority,
        FieldId::Type,
        FieldId::Origin,
        FieldId::Reason,
        FieldId::Notes,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FieldId::Owner => "Owner",
            FieldId::Phone => "Phone",
            FieldId::Email => "Email",
            FieldId::Name => "Contact",
            FieldId::Account => "Account",
            FieldId::Status => "Status",
            FieldId::Priority => "Priority",
            FieldId::Type => "Type",
            FieldId::Origin => "Origin",
            FieldId::Reason => "Reason",
            FieldId::Notes => "Notes",
        }
    }

    pub fn kind(self) -> FieldKind {
        match self {
            FieldId::Owner | FieldId::Account | FieldId::Status | FieldId::Priority | FieldId::Type | FieldId::Origin => FieldKind::Select,
            _ => FieldKind::Text,
        }
    }

    /// Only the email field has a single-press action (open the compose overlay).
    pub fn has_side_action(self) -> bool {
        self == FieldId::Email
    }

    /// Stored value: ids for owner/account, choice names for enums.
    pub fn raw_value(self, case: &Case) -> String {
        match self {
            FieldId::Owner => case.owner.id.clone(),
            FieldId::Phone => case.phone.clone(),
            FieldId::Email => case.email.clone(),
            FieldId::Name => case.name.clone(),
            FieldId::Account => case.account.id.clone(),
            FieldId::Status => case.status.as_str().to_string(),
            FieldId::Priority => case.priority.as_str().to_string(),
            FieldId::Type => case.kind.as_str().to_string(),
            FieldId::Origin => case.origin.as_str().to_string(),
            FieldId::Reason => case.reason.clone(),
            FieldId::Notes => case.notes.clone(),
        }
    }

    pub fn options(self, dir: &DirectoryView) -> Vec<SelectOption> {
        match self {
            FieldId::Owner => dir
                .users
                .iter()
                .map(|u| SelectOption { value: u.id.clone(), label: u.name.clone() })
                .collect(),
            FieldId::Account => dir
                .accounts
                .iter()
                .map(|a| SelectOption { value: a.id.clone(), label: format!("{} ({})", a.name, a.tier) })
                .collect(),
            FieldId::Status => choice_options::<Status>(),
            FieldId::Priority => choice_options::<Priority>(),
            FieldId::Type => choice_options::<CaseType>(),
            FieldId::Origin => choice_options::<Origin>(),
            _ => vec![],
        }
    }

    /// Read-mode text: the option label for selects, the raw text otherwise.
    pub fn display(self, case: &Case, dir: &DirectoryView) -> String {
        let raw = self.raw_value(case);
        match self.kind() {
            FieldKind::Select => label_for(&self.options(dir), &raw).to_string(),
            FieldKind::Text => raw,
        }
    }

    /// Builds the edit for `value`. Enum values outside the option set yield `None`.
    pub fn edit(self, value: String) -> Option<FieldEdit> {
        Some(match self {
            FieldId::Owner => FieldEdit::Owner(value),
            FieldId::Phone => FieldEdit::Phone(value),
            FieldId::Email => FieldEdit::Email(value),
            FieldId::Name => FieldEdit::Name(value),
            FieldId::Account => FieldEdit::Account(value),
            FieldId::Status => FieldEdit::Status(Status::parse(&value)?),
            FieldId::Priority => FieldEdit::Priority(Priority::parse(&value)?),
            FieldId::Type => FieldEdit::Type(CaseType::parse(&value)?),
            FieldId::Origin => FieldEdit::Origin(Origin::parse(&value)?),
            FieldId::Reason => FieldEdit::Reason(value),
            FieldId::Notes => FieldEdit::Notes(value),
        })
    }
}

/// Label for `value`, or the raw value when no option matches.
pub fn label_for<'a>(options: &'a [SelectOption], value: &'a str) -> &'a str {
    options.iter().find(|o| o.value == value).map(|o| o.label.as_str()).unwrap_or(value)
}

/// Next option value after `current`, wrapping; `step` is +1 or -1.
pub fn cycle_option(options: &[SelectOption], current: &str, step: isize) -> Option<String> {
    if options.is_empty() {
        return None;
    }
    let n = options.len() as isize;
    let at = options.iter().position(|o| o.value == current).map(|i| i as isize).unwrap_or(-1);
    let next = if at < 0 { if step >= 0 { 0 } else { n - 1 } } else { (at + step).rem_euclid(n) };
    Some(options[next as usize].value.clone())
}
