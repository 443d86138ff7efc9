use std::sync::Arc;

use thiserror::Error;
use tracing::{Instrument, debug, info, info_span, warn};
use uuid::Uuid;

use crate::agent::marker;
use crate::agent::message::{Message, Role};
use crate::llm::{
    ChatMessage, ChatRequest, Completion, GatewayError, ModelGateway, ToolCall, ToolDef, tool_defs,
};
use crate::tools::{ToolError, ToolRegistry, ToolValue};

#[derive(Error, Debug)]
pub enum TurnError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Tool(#[from] ToolError),
}

/// Immutable per-process settings for every turn.
#[derive(Debug, Clone)]
pub struct TurnSettings {
    pub system_prompt: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f64,
    /// Advertise tools on the structured channel and honour native `tool_calls`.
    pub native_tools: bool,
}

/// A tool call picked out of the first reply, ready to dispatch.
#[derive(Debug, Clone)]
struct PendingCall {
    name: String,
    args: Vec<ToolValue>,
    /// Set when the call arrived on the structured channel.
    native: Option<ToolCall>,
}

pub struct TurnOrchestrator<G> {
    gateway: G,
    tools: Arc<ToolRegistry>,
    settings: TurnSettings,
    tool_defs: Vec<ToolDef>,
}

impl<G: ModelGateway> TurnOrchestrator<G> {
    pub fn new(gateway: G, tools: Arc<ToolRegistry>, settings: TurnSettings) -> Self {
        let tool_defs = if settings.native_tools {
            tool_defs(&tools)
        } else {
            vec![]
        };
        Self {
            gateway,
            tools,
            settings,
            tool_defs,
        }
    }

    #[cfg(test)]
    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Run one turn over `history` and return it extended with the turn's messages.
    ///
    /// Appends `assistant(reply)`, and when a registered tool was called, `tool(result)` and
    /// `assistant(final)`. Gateway and tool failures are returned without a partial history.
    pub async fn run_turn(&self, history: &[Message]) -> Result<Vec<Message>, TurnError> {
        let turn_id = Uuid::now_v7();
        let span = info_span!("turn", %turn_id, history_len = history.len());
        self.run_turn_inner(history).instrument(span).await
    }

    async fn run_turn_inner(&self, history: &[Message]) -> Result<Vec<Message>, TurnError> {
        let first = self.gateway.complete(self.request(self.render(history))).await?;
        debug!(reply = %first.text, native_calls = first.tool_calls.len(), "first reply");

        let mut out = history.to_vec();
        let Some(call) = self.detect(&first) else {
            out.push(Message::assistant(first.text));
            return Ok(out);
        };

        let Some(outcome) = self.tools.dispatch(&call.name, &call.args) else {
            out.push(Message::assistant(first.text));
            return Ok(out);
        };
        let result = outcome?.to_string();
        info!(tool = %call.name, result = %result, "tool executed");

        let mut messages = self.render(history);
        let (assistant, tool) = match &call.native {
            Some(native) => (
                ChatMessage {
                    role: Role::Assistant.as_str().into(),
                    content: (!first.text.is_empty()).then(|| first.text.clone()),
                    tool_calls: vec![native.clone()],
                    tool_call_id: None,
                },
                ChatMessage {
                    role: Role::Tool.as_str().into(),
                    content: Some(result.clone()),
                    tool_calls: vec![],
                    tool_call_id: native.id.clone(),
                },
            ),
            None => (
                ChatMessage::new(Role::Assistant.as_str(), first.text.clone()),
                ChatMessage::new(Role::Tool.as_str(), result.clone()),
            ),
        };
        messages.push(assistant);
        messages.push(tool);

        let last = self.gateway.complete(self.request(messages)).await?;

        out.push(Message::assistant(first.text));
        out.push(Message::tool(call.name, result));
        out.push(Message::assistant(last.text));
        Ok(out)
    }

    /// System instruction first, then the history. Only user messages keep their role;
    /// everything else is replayed as assistant text.
    fn render(&self, history: &[Message]) -> Vec<ChatMessage> {
        std::iter::once(ChatMessage::new(
            Role::System.as_str(),
            self.settings.system_prompt.clone(),
        ))
        .chain(history.iter().map(|m| {
            let role = match m.role() {
                Role::User => Role::User,
                _ => Role::Assistant,
            };
            ChatMessage::new(role.as_str(), m.content())
        }))
        .collect()
    }

    fn request(&self, messages: Vec<ChatMessage>) -> ChatRequest {
        ChatRequest {
            model: self.settings.model.clone(),
            messages,
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
            tools: self.tool_defs.clone(),
        }
    }

    fn detect(&self, reply: &Completion) -> Option<PendingCall> {
        if self.settings.native_tools
            && let Some(native) = reply
                .tool_calls
                .iter()
                .find(|c| self.tools.contains(&c.function.name))
        {
            let arguments = serde_json::from_str::<serde_json::Value>(&native.function.arguments)
                .unwrap_or_else(|_| serde_json::Value::String(native.function.arguments.clone()));
            return Some(PendingCall {
                name: native.function.name.clone(),
                args: self.tools.positional_args(&native.function.name, &arguments),
                native: Some(native.clone()),
            });
        }

        let invocation = marker::scan(&reply.text)?;
        if !self.tools.contains(&invocation.name) {
            warn!(tool = %invocation.name, "ignoring call to unregistered tool");
            return None;
        }
        Some(PendingCall {
            name: invocation.name,
            args: invocation.args,
            native: None,
        })
    }
}
