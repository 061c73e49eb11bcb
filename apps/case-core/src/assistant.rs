//! One assistant turn: the model sees the business instructions plus the current
//! case, and may call the case operations until it answers in plain text.

use crate::app::AppState;
use crate::gateway::OnceResult;
use crate::prompt;
use casebook_types::{ChatMessage, ChatReply};
use serde_json::{json, Value as JsonValue};
use tracing::{info, warn};

pub async fn chat_turn(state: &AppState, history: Vec<ChatMessage>, max_steps: Option<usize>) -> anyhow::Result<ChatReply> {
    let (gateway, instructions, default_steps) = {
        let cfg = state.config.read();
        (state.gateway(&cfg), cfg.instructions(), cfg.max_steps())
    };
    let max_steps = max_steps.unwrap_or(default_steps);

    let mut messages: Vec<JsonValue> = vec![json!({"role": "system", "content": ""})];
    messages.extend(history.into_iter().map(|m| json!({"role": m.role, "content": m.content})));
    let mut applied: Vec<String> = vec![];

    for _ in 0..max_steps {
        // Context is re-read every step so the model sees its own edits.
        let (context, tools) = {
            let ws = state.workspace.read();
            let tools = if ws.selected().is_some() { state.operations.tool_defs() } else { vec![] };
            (ws.context(), tools)
        };
        messages[0] = json!({"role": "system", "content": prompt::system_prompt(&instructions, &context)});

        match gateway.complete(&messages, &tools).await? {
            OnceResult::Final(reply) => return Ok(ChatReply { reply, operations: applied }),
            OnceResult::ToolCalls(calls, assistant_msg) => {
                messages.push(assistant_msg);
                for c in calls {
                    let args = c.arguments.unwrap_or_else(|| json!({}));
                    let result = {
                        let mut ws = state.workspace.write();
                        state.operations.invoke(&mut ws, &c.name, args)
                    };
                    let content = match result {
                        Ok(outcome) => {
                            info!(operation = %c.name, applied = ?outcome.applied, "assistant operation applied");
                            applied.push(c.name.clone());
                            serde_json::to_string(&outcome).unwrap_or_else(|_| "{}".into())
                        }
                        Err(e) => {
                            warn!(operation = %c.name, error = %e, "assistant operation rejected");
                            json!({"error": e.to_string()}).to_string()
                        }
                    };
                    messages.push(json!({"role": "tool", "tool_call_id": c.id, "content": content}));
                }
            }
        }
    }
    anyhow::bail!("tool loop exceeded {} steps", max_steps)
}
