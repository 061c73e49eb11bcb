//! Email compose overlay. The overlay owns nothing: every change produces a new
//! draft that is reported to the detail panel, which holds the only copy.

use casebook_types::{Case, DraftChange, Email};
use serde_json::{json, Value as JsonValue};

pub fn apply_change(draft: &Email, change: DraftChange) -> Email {
    let mut next = draft.clone();
    match change {
        DraftChange::Receiver(v) => next.receiver = v,
        DraftChange::Subject(v) => next.subject = v,
        DraftChange::Body(v) => next.body = v,
    }
    next
}

/// Draft shown when the overlay is opened from the form rather than by the assistant.
pub fn default_draft(case: &Case) -> Email {
    Email { receiver: case.email.clone(), subject: format!("(ID: {})", case.id), body: String::new() }
}

pub fn send_details(email: &Email) -> String {
    format!("Subject: {} Body: {}", email.subject, email.body)
}

/// Describes what the body field is for, so suggestions stay on topic.
pub fn textarea_purpose(case: &Case) -> String {
    let case_json = serde_json::to_string(case).unwrap_or_else(|_| "{}".into());
    format!("An email about this case: {}", case_json)
}

/// Short inline completion for the email body.
#[derive(Debug, Clone, PartialEq)]
pub struct SuggestionRequest {
    pub purpose: String,
    pub text: String,
    pub max_tokens: u32,
    pub stop: Vec<String>,
}

impl SuggestionRequest {
    pub fn for_case(case: &Case, text: &str, max_tokens: u32, stop: Vec<String>) -> Self {
        Self { purpose: textarea_purpose(case), text: text.to_string(), max_tokens, stop }
    }

    /// Chat-completions body; the gateway fills in the model.
    pub fn to_completion_body(&self) -> JsonValue {
        let system = format!(
            "You are a writing assistant that continues the user's text. Reply only with the next few words, no quotes.\nThe text is: {}",
            self.purpose
        );
        json!({
            "messages": [
                {"role": "system", "content": system},
                {"role": "user", "content": self.text},
            ],
            "max_tokens": self.max_tokens,
            "stop": self.stop,
        })
    }
}
