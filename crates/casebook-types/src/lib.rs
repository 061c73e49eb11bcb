//! Shared case-tracking records, closed option sets and the wire shapes exchanged
//! between `case-core` and its clients.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A closed, string-valued choice. The UI selects and the assistant parameter
/// schemas are both generated from `ALL`, so they cannot drift apart.
pub trait Choice: Copy + Sized + 'static {
    const ALL: &'static [Self];

    fn as_str(&self) -> &'static str;

    fn label(&self) -> &'static str {
        self.as_str()
    }

    fn parse(raw: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.as_str() == raw)
    }

    fn values() -> Vec<&'static str> {
        Self::ALL.iter().map(|c| c.as_str()).collect()
    }
}

macro_rules! choice_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name { $($variant),+ }

        impl Choice for $name {
            const ALL: &'static [Self] = &[$($name::$variant),+];

            fn as_str(&self) -> &'static str {
                match self { $($name::$variant => stringify!($variant)),+ }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

choice_enum!(
    /// Account service tier.
    Tier { Basic, Silver, Gold, Platinum }
);
choice_enum!(Status { Open, Closed, Pending, Escalated });
choice_enum!(Priority { Low, Medium, High });
choice_enum!(
    /// Case classification (`type` on the wire).
    CaseType { Problem, Incident, Question, Request }
);
choice_enum!(Origin { Email, Phone, Chat, Portal });
choice_enum!(ActionType { Call, Email, Meeting, Task });

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub name: String,
    pub tier: Tier,
}

/// A logged interaction on a case. Appended, never edited in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    #[serde(rename = "type")]
    pub kind: ActionType,
    pub details: String,
}

impl Action {
    pub fn new(kind: ActionType, details: impl Into<String>) -> Self {
        Self { kind, details: details.into() }
    }
}

impl Default for Action {
    fn default() -> Self {
        Self { kind: ActionType::Call, details: String::new() }
    }
}

/// Draft email for one compose session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Email {
    pub receiver: String,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Case {
    pub id: String,
    pub owner: User,
    pub phone: String,
    pub email: String,
    pub name: String,
    pub account: Account,
    pub status: Status,
    pub priority: Priority,
    #[serde(rename = "type")]
    pub kind: CaseType,
    pub origin: Origin,
    pub reason: String,
    pub notes: String,
    #[serde(default)]
    pub actions: Vec<Action>,
}

/// A single-field edit coming from the case form. Field names are a closed set;
/// anything else fails to deserialize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "lowercase")]
pub enum FieldEdit {
    /// User id, resolved against the known users.
    Owner(String),
    Phone(String),
    Email(String),
    Name(String),
    /// Account id, resolved against the known accounts.
    Account(String),
    Status(Status),
    Priority(Priority),
    Type(CaseType),
    Origin(Origin),
    Reason(String),
    Notes(String),
}

impl FieldEdit {
    pub fn field(&self) -> &'static str {
        match self {
            FieldEdit::Owner(_) => "owner",
            FieldEdit::Phone(_) => "phone",
            FieldEdit::Email(_) => "email",
            FieldEdit::Name(_) => "name",
            FieldEdit::Account(_) => "account",
            FieldEdit::Status(_) => "status",
            FieldEdit::Priority(_) => "priority",
            FieldEdit::Type(_) => "type",
            FieldEdit::Origin(_) => "origin",
            FieldEdit::Reason(_) => "reason",
            FieldEdit::Notes(_) => "notes",
        }
    }
}

/// One keystroke-sized change to the email draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "lowercase")]
pub enum DraftChange {
    Receiver(String),
    Subject(String),
    Body(String),
}

/// value/label pair for an editable select.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

pub fn choice_options<T: Choice>() -> Vec<SelectOption> {
    T::ALL
        .iter()
        .map(|c| SelectOption { value: c.as_str().to_string(), label: c.label().to_string() })
        .collect()
}

// ---- wire shapes ----

/// One row of the case list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseRow {
    pub id: String,
    pub reason: String,
    pub selected: bool,
}

/// Detail-panel state for the selected case.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailView {
    pub case_id: Option<String>,
    pub editing: bool,
    pub action_draft: Action,
    /// Present while the email overlay is open.
    pub email: Option<Email>,
}

/// The known users and accounts, for owner/account selects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryView {
    pub users: Vec<User>,
    pub accounts: Vec<Account>,
}

/// First assistant message shown in a fresh chat.
pub const CHAT_GREETING: &str = "Hi! I'm an AI assistant. I can do things like summarize records, log actions and draft and revise emails. What can I help you with?";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    pub reply: String,
    /// Names of the assistant operations applied during the turn, in order.
    #[serde(default)]
    pub operations: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub text: String,
}
