//! Assistant-invocable operations: a name → handler registry over the workspace.
//! Parameter schemas are generated from the same closed enums the form uses.

use crate::directory::Directory;
use crate::edits::CaseUpdate;
use crate::workspace::{Workspace, WorkspaceError};
use casebook_types::{Action, ActionType, Case, CaseType, Choice, Email, Origin, Priority, Status};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value as JsonValue};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::warn;

pub type Handler = fn(&mut Workspace, JsonValue) -> Result<OperationOutcome, OperationError>;

#[derive(Clone, Serialize)]
pub struct Operation {
    pub name: &'static str,
    pub description: String,
    pub parameters: JsonValue,
    #[serde(skip)]
    handler: Handler,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OperationOutcome {
    pub operation: String,
    /// Fields or items that took effect.
    pub applied: Vec<String>,
    /// Arguments that were skipped (unknown ids, values outside the option sets).
    pub ignored: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case: Option<Case>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<Email>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OperationError {
    #[error("unknown operation: {0}")]
    Unknown(String),
    #[error("bad arguments for {operation}: {message}")]
    BadArguments { operation: &'static str, message: String },
    #[error(transparent)]
    Workspace(#[from] WorkspaceError),
}

#[derive(Clone, Default)]
pub struct OperationRegistry {
    ops: BTreeMap<&'static str, Operation>,
}

impl OperationRegistry {
    /// The three case operations. Descriptions list the known users and accounts so
    /// the model can pick ids.
    pub fn standard(dir: &Directory) -> Self {
        let mut reg = OperationRegistry::default();
        reg.register(Operation {
            name: "updateCase",
            description: "Update the case details".into(),
            parameters: update_case_schema(dir),
            handler: update_case,
        });
        reg.register(Operation {
            name: "logActions",
            description: "Log actions".into(),
            parameters: log_actions_schema(),
            handler: log_actions,
        });
        reg.register(Operation {
            name: "draftEmail",
            description: "Draft an email to the main contact of the account (the name property in the case)".into(),
            parameters: draft_email_schema(),
            handler: draft_email,
        });
        reg
    }

    pub fn register(&mut self, op: Operation) {
        self.ops.insert(op.name, op);
    }

    pub fn names(&self) -> Vec<&'static str> { self.ops.keys().copied().collect() }

    pub fn list(&self) -> Vec<&Operation> { self.ops.values().collect() }

    /// OpenAI function-tool definitions.
    pub fn tool_defs(&self) -> Vec<JsonValue> {
        self.ops
            .values()
            .map(|op| {
                json!({
                    "type": "function",
                    "function": {
                        "name": op.name,
                        "description": op.description,
                        "parameters": op.parameters,
                    }
                })
            })
            .collect()
    }

    /// Runs `name` against the selected case. `null` arguments count as `{}`.
    pub fn invoke(&self, ws: &mut Workspace, name: &str, args: JsonValue) -> Result<OperationOutcome, OperationError> {
        let op = self.ops.get(name).ok_or_else(|| OperationError::Unknown(name.to_string()))?;
        let result = if ws.selected().is_none() {
            Err(WorkspaceError::NoCaseSelected.into())
        } else {
            let args = if args.is_null() { json!({}) } else { args };
            (op.handler)(ws, args)
        };
        casebook_telemetry::inc_assistant_operation(op.name, result.is_ok());
        result
    }
}

fn parse_args<T: serde::de::DeserializeOwned>(operation: &'static str, args: JsonValue) -> Result<T, OperationError> {
    serde_json::from_value(args).map_err(|e| OperationError::BadArguments { operation, message: e.to_string() })
}

/// Accepts any JSON scalar as text; `null`, `false`, `0` and `""` read as absent.
fn lenient_text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    let v = Option::<JsonValue>::deserialize(d)?;
    Ok(match v {
        Some(JsonValue::String(s)) if !s.is_empty() => Some(s),
        Some(JsonValue::Number(n)) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        Some(JsonValue::Bool(true)) => Some("true".into()),
        _ => None,
    })
}

/// A list argument; `null` or any non-array reads as empty.
fn lenient_list<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<JsonValue>, D::Error> {
    Ok(match Option::<JsonValue>::deserialize(d)? {
        Some(JsonValue::Array(items)) => items,
        _ => vec![],
    })
}

// ---- updateCase ----

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateCaseArgs {
    #[serde(default, deserialize_with = "lenient_text")]
    pub owner: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub account: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub priority: Option<String>,
    #[serde(default, rename = "type", deserialize_with = "lenient_text")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub origin: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub reason: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub notes: Option<String>,
}

impl UpdateCaseArgs {
    /// Validates every supplied value. Unknown ids and out-of-set enum values are
    /// dropped and reported back instead of failing the whole update.
    pub fn resolve(self, dir: &Directory) -> (CaseUpdate, Vec<String>) {
        let mut ignored = vec![];
        let mut update = CaseUpdate {
            phone: self.phone,
            email: self.email,
            name: self.name,
            reason: self.reason,
            notes: self.notes,
            ..Default::default()
        };
        if let Some(id) = self.owner {
            match dir.user(&id) {
                Some(u) => update.owner = Some(u.clone()),
                None => ignored.push(format!("owner: unknown user id {:?}", id)),
            }
        }
        if let Some(id) = self.account {
            match dir.account(&id) {
                Some(a) => update.account = Some(a.clone()),
                None => ignored.push(format!("account: unknown account id {:?}", id)),
            }
        }
        update.status = pick::<Status>("status", self.status, &mut ignored);
        update.priority = pick::<Priority>("priority", self.priority, &mut ignored);
        update.kind = pick::<CaseType>("type", self.kind, &mut ignored);
        update.origin = pick::<Origin>("origin", self.origin, &mut ignored);
        (update, ignored)
    }
}

fn pick<T: Choice>(field: &str, raw: Option<String>, ignored: &mut Vec<String>) -> Option<T> {
    let raw = raw?;
    let parsed = T::parse(&raw);
    if parsed.is_none() {
        ignored.push(format!("{}: {:?} is not one of {:?}", field, raw, T::values()));
    }
    parsed
}

fn update_case(ws: &mut Workspace, args: JsonValue) -> Result<OperationOutcome, OperationError> {
    let args: UpdateCaseArgs = parse_args("updateCase", args)?;
    let (update, ignored) = args.resolve(ws.directory());
    for note in &ignored {
        warn!(operation = "updateCase", %note, "argument ignored");
    }
    let applied = update.fields().into_iter().map(String::from).collect();
    let case = ws.apply_update(update)?;
    Ok(OperationOutcome { operation: "updateCase".into(), applied, ignored, case: Some(case), email: None })
}

fn update_case_schema(dir: &Directory) -> JsonValue {
    let users_json = serde_json::to_string(dir.users()).unwrap_or_else(|_| "[]".into());
    let accounts_json = serde_json::to_string(dir.accounts()).unwrap_or_else(|_| "[]".into());
    let user_ids: Vec<&str> = dir.users().iter().map(|u| u.id.as_str()).collect();
    let account_ids: Vec<&str> = dir.accounts().iter().map(|a| a.id.as_str()).collect();
    json!({
        "type": "object",
        "properties": {
            "owner": {
                "type": "string",
                "enum": user_ids,
                "description": format!("The id of the user who owns the case. Possible users are: {}", users_json),
            },
            "phone": {"type": "string", "description": "The phone number"},
            "email": {"type": "string", "description": "The email address"},
            "name": {"type": "string", "description": "The name of the contact that reported the case"},
            "account": {
                "type": "string",
                "enum": account_ids,
                "description": format!("The id of the account associated with the case. Possible accounts are: {}", accounts_json),
            },
            "status": {"type": "string", "enum": Status::values(), "description": "The status of the case"},
            "priority": {"type": "string", "enum": Priority::values(), "description": "The priority of the case"},
            "type": {"type": "string", "enum": CaseType::values(), "description": "The type of the case"},
            "origin": {"type": "string", "enum": Origin::values(), "description": "The origin of the case"},
            "reason": {"type": "string", "description": "The reason for the case"},
            "notes": {"type": "string", "description": "The notes for the case"},
        },
        "additionalProperties": false
    })
}

// ---- logActions ----

#[derive(Debug, Default, Deserialize)]
pub struct LogActionsArgs {
    /// Kept raw so one malformed entry cannot sink the others.
    #[serde(default, deserialize_with = "lenient_list")]
    pub actions: Vec<JsonValue>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawAction {
    #[serde(default, rename = "type", deserialize_with = "lenient_text")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub details: Option<String>,
}

impl LogActionsArgs {
    /// Entries that are not objects or lack a valid action type are dropped; the
    /// rest keep their order.
    pub fn resolve(self) -> (Vec<Action>, Vec<String>) {
        let mut ignored = vec![];
        let mut out = vec![];
        for (i, entry) in self.actions.into_iter().enumerate() {
            let raw = match serde_json::from_value::<RawAction>(entry) {
                Ok(raw) => raw,
                Err(e) => {
                    ignored.push(format!("actions[{}]: {}", i, e));
                    continue;
                }
            };
            let kind = raw.kind.as_deref().and_then(ActionType::parse);
            match kind {
                Some(kind) => out.push(Action::new(kind, raw.details.unwrap_or_default())),
                None => ignored.push(format!("actions[{}]: type {:?} is not one of {:?}", i, raw.kind, ActionType::values())),
            }
        }
        (out, ignored)
    }
}

fn log_actions(ws: &mut Workspace, args: JsonValue) -> Result<OperationOutcome, OperationError> {
    let args: LogActionsArgs = parse_args("logActions", args)?;
    let (actions, ignored) = args.resolve();
    for note in &ignored {
        warn!(operation = "logActions", %note, "argument ignored");
    }
    let applied = actions.iter().map(|a| format!("{}: {}", a.kind, a.details)).collect();
    let case = ws.log_actions(actions)?;
    Ok(OperationOutcome { operation: "logActions".into(), applied, ignored, case: Some(case), email: None })
}

fn log_actions_schema() -> JsonValue {
    json!({
        "type": "object",
        "properties": {
            "actions": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "type": {"type": "string", "enum": ActionType::values()},
                        "details": {"type": "string"}
                    },
                    "required": ["type", "details"]
                }
            }
        },
        "required": ["actions"],
        "additionalProperties": false
    })
}

// ---- draftEmail ----

#[derive(Debug, Default, Deserialize)]
pub struct DraftEmailArgs {
    #[serde(default, deserialize_with = "lenient_text")]
    pub subject: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub body: Option<String>,
}

fn draft_email(ws: &mut Workspace, args: JsonValue) -> Result<OperationOutcome, OperationError> {
    let args: DraftEmailArgs = parse_args("draftEmail", args)?;
    let email = ws.draft_email(args.subject.unwrap_or_default(), args.body.unwrap_or_default())?;
    Ok(OperationOutcome {
        operation: "draftEmail".into(),
        applied: vec!["receiver".into(), "subject".into(), "body".into()],
        ignored: vec![],
        case: None,
        email: Some(email),
    })
}

fn draft_email_schema() -> JsonValue {
    json!({
        "type": "object",
        "properties": {
            "subject": {"type": "string", "description": "The subject of the email"},
            "body": {"type": "string", "description": "The body of the email"}
        },
        "additionalProperties": false
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selected_workspace() -> (Workspace, OperationRegistry, String) {
        let mut ws = Workspace::seeded();
        let reg = OperationRegistry::standard(ws.directory());
        let id = ws.cases()[0].id.clone();
        ws.select(Some(&id));
        (ws, reg, id)
    }

    #[test]
    fn registry_exports_three_tools() {
        let ws = Workspace::seeded();
        let reg = OperationRegistry::standard(ws.directory());
        assert_eq!(reg.names(), vec!["draftEmail", "logActions", "updateCase"]);
        let defs = reg.tool_defs();
        let update = defs.iter().find(|d| d["function"]["name"] == "updateCase").unwrap();
        let params = &update["function"]["parameters"]["properties"];
        assert_eq!(params["status"]["enum"], json!(["Open", "Closed", "Pending", "Escalated"]));
        assert_eq!(params["owner"]["enum"], json!(["u-100", "u-101", "u-102"]));
        assert!(params["account"]["description"].as_str().unwrap().contains("Quantum Freight"));
        let log = defs.iter().find(|d| d["function"]["name"] == "logActions").unwrap();
        assert_eq!(log["function"]["parameters"]["properties"]["actions"]["items"]["properties"]["type"]["enum"], json!(["Call", "Email", "Meeting", "Task"]));
    }

    #[test]
    fn update_skips_unknown_ids_and_empty_values() {
        let (mut ws, reg, id) = selected_workspace();
        let before = ws.case(&id).unwrap().clone();
        let out = reg
            .invoke(&mut ws, "updateCase", json!({
                "owner": "u-999",
                "account": "a-999",
                "phone": "",
                "notes": null,
                "priority": "Low",
            }))
            .unwrap();
        assert_eq!(out.applied, vec!["priority"]);
        assert_eq!(out.ignored.len(), 2);
        let after = ws.case(&id).unwrap();
        assert_eq!(after.owner, before.owner);
        assert_eq!(after.account, before.account);
        assert_eq!(after.phone, before.phone);
        assert_eq!(after.notes, before.notes);
        assert_eq!(after.priority, Priority::Low);
    }

    #[test]
    fn update_merges_all_accepted_fields_at_once() {
        let (mut ws, reg, id) = selected_workspace();
        let out = reg
            .invoke(&mut ws, "updateCase", json!({
                "owner": "u-101",
                "account": "a-203",
                "status": "Closed",
                "type": "Request",
                "reason": "Replacement shipped",
                "origin": "Fax",
            }))
            .unwrap();
        assert_eq!(out.applied, vec!["owner", "account", "status", "type", "reason"]);
        assert_eq!(out.ignored.len(), 1, "Fax is outside the origin set");
        let c = ws.case(&id).unwrap();
        assert_eq!(c.owner.name, "Priya Natarajan");
        assert_eq!(c.account.name, "Quantum Freight");
        assert_eq!(c.status, Status::Closed);
        assert_eq!(c.kind, CaseType::Request);
        assert_eq!(c.reason, "Replacement shipped");
        assert_eq!(c.origin, Origin::Phone);
    }

    #[test]
    fn update_rejects_unknown_field_names() {
        let (mut ws, reg, _) = selected_workspace();
        let err = reg.invoke(&mut ws, "updateCase", json!({"severity": "high"})).unwrap_err();
        assert!(matches!(err, OperationError::BadArguments { operation: "updateCase", .. }));
    }

    #[test]
    fn log_actions_appends_in_order() {
        let (mut ws, reg, id) = selected_workspace();
        assert_eq!(ws.case(&id).unwrap().actions.len(), 1);
        let original = ws.case(&id).unwrap().actions[0].clone();
        reg.invoke(&mut ws, "logActions", json!({"actions": [
            {"type": "Call", "details": "left voicemail"},
            {"type": "Task", "details": "file carrier claim"},
        ]}))
        .unwrap();
        let actions = &ws.case(&id).unwrap().actions;
        assert_eq!(actions.len(), 3);
        assert_eq!(actions[0], original);
        assert_eq!(actions[1], Action::new(ActionType::Call, "left voicemail"));
        assert_eq!(actions[2], Action::new(ActionType::Task, "file carrier claim"));
    }

    #[test]
    fn log_actions_skips_falsy_and_malformed_entries() {
        let (mut ws, reg, id) = selected_workspace();
        let before = ws.case(&id).unwrap().clone();
        for args in [json!({"actions": null}), json!({"actions": "Call"}), json!({})] {
            let out = reg.invoke(&mut ws, "logActions", args).unwrap();
            assert!(out.applied.is_empty());
            assert_eq!(ws.case(&id).unwrap(), &before);
        }

        let out = reg
            .invoke(&mut ws, "logActions", json!({"actions": [
                "call the customer",
                {"type": "Call", "details": "confirmed address"},
                null,
                7,
            ]}))
            .unwrap();
        assert_eq!(out.applied, vec!["Call: confirmed address"]);
        assert_eq!(out.ignored.len(), 3);
        assert!(out.ignored[0].starts_with("actions[0]"));
        let actions = &ws.case(&id).unwrap().actions;
        assert_eq!(actions.len(), before.actions.len() + 1);
        assert_eq!(actions.last(), Some(&Action::new(ActionType::Call, "confirmed address")));
    }

    #[test]
    fn workspace_errors_keep_their_message() {
        let err: OperationError = WorkspaceError::NoCaseSelected.into();
        assert_eq!(err.to_string(), "no case selected");
        assert_eq!(OperationError::Unknown("closeCase".into()).to_string(), "unknown operation: closeCase");
        let bad = OperationError::BadArguments { operation: "updateCase", message: "unknown field `severity`".into() };
        assert_eq!(bad.to_string(), "bad arguments for updateCase: unknown field `severity`");
    }

    #[test]
    fn draft_email_opens_overlay_only() {
        let (mut ws, reg, id) = selected_workspace();
        let before = ws.case(&id).unwrap().clone();
        let out = reg.invoke(&mut ws, "draftEmail", json!({"subject": "Re: case", "body": "Hello"})).unwrap();
        let email = out.email.unwrap();
        assert_eq!(email.receiver, before.email);
        assert_eq!(email.subject, "Re: case");
        assert_eq!(email.body, "Hello");
        assert_eq!(ws.case(&id).unwrap(), &before);
        assert_eq!(ws.detail_view().email, Some(email));
    }

    #[test]
    fn invoke_requires_selection_and_known_name() {
        let mut ws = Workspace::seeded();
        let reg = OperationRegistry::standard(ws.directory());
        assert_eq!(
            reg.invoke(&mut ws, "logActions", json!({"actions": []})).unwrap_err(),
            OperationError::Workspace(WorkspaceError::NoCaseSelected)
        );
        assert_eq!(reg.invoke(&mut ws, "closeCase", JsonValue::Null).unwrap_err(), OperationError::Unknown("closeCase".into()));
    }
}
