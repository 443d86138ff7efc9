use chrono::{DateTime, Local};
use tracing::{error, info};

use crate::agent::{Message, Role, TurnError, TurnOrchestrator};
use crate::llm::ModelGateway;

/// One entry of the tool-call log shown by `/calls`.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCallRecord {
    pub tool: String,
    pub result: String,
    pub at: DateTime<Local>,
}

/// UI-side conversation state: the history handed to the orchestrator on each submission,
/// plus the log of tool results seen so far.
#[derive(Debug, Default)]
pub struct ConversationStore {
    messages: Vec<Message>,
    tool_calls: Vec<ToolCallRecord>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn tool_calls(&self) -> &[ToolCallRecord] {
        &self.tool_calls
    }

    pub fn reset(&mut self) {
        self.messages.clear();
        self.tool_calls.clear();
    }

    /// Submit one user message and run a turn.
    ///
    /// Returns the messages added by this submission (the user message first), or `None` for
    /// blank input. On failure the conversation is left exactly as it was before the call.
    pub async fn submit<G: ModelGateway>(
        &mut self,
        input: &str,
        orchestrator: &TurnOrchestrator<G>,
    ) -> Result<Option<&[Message]>, TurnError> {
        let text = input.trim();
        if text.is_empty() {
            return Ok(None);
        }

        let before = self.messages.len();
        let mut history = self.messages.clone();
        history.push(Message::user(text));

        let updated = match orchestrator.run_turn(&history).await {
            Ok(updated) => updated,
            Err(e) => {
                error!(error = %e, "turn failed; conversation left unchanged");
                return Err(e);
            }
        };

        let now = Local::now();
        self.tool_calls.extend(
            updated[history.len()..]
                .iter()
                .filter(|m| m.role() == Role::Tool)
                .map(|m| ToolCallRecord {
                    tool: m.tool_call_id().unwrap_or_default().to_string(),
                    result: m.content().to_string(),
                    at: now,
                }),
        );
        self.messages = updated;
        info!(
            added = self.messages.len() - before,
            total = self.messages.len(),
            "turn completed"
        );
        Ok(Some(&self.messages[before..]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{ScriptedGateway, test_settings};
    use crate::llm::{Completion, GatewayError};
    use crate::tools::{ToolError, ToolRegistry};
    use std::sync::Arc;

    fn orchestrator(gw: ScriptedGateway) -> TurnOrchestrator<ScriptedGateway> {
        TurnOrchestrator::new(gw, Arc::new(ToolRegistry::with_defaults()), test_settings())
    }

    #[tokio::test]
    async fn submit_appends_user_and_reply() {
        let orch = orchestrator(ScriptedGateway::texts(&["Meta description draft"]));
        let mut store = ConversationStore::new();
        let added = store
            .submit("  write a meta description  ", &orch)
            .await
            .unwrap()
            .unwrap()
            .to_vec();
        assert_eq!(
            added,
            vec![
                Message::user("write a meta description"),
                Message::assistant("Meta description draft")
            ]
        );
        assert_eq!(store.messages().len(), 2);
        assert!(store.tool_calls().is_empty());
    }

    #[tokio::test]
    async fn blank_input_is_ignored() {
        let orch = orchestrator(ScriptedGateway::texts(&[]));
        let mut store = ConversationStore::new();
        assert!(store.submit("   ", &orch).await.unwrap().is_none());
        assert!(store.messages().is_empty());
        assert!(orch.gateway().requests().is_empty());
    }

    #[tokio::test]
    async fn tool_results_are_logged_once() {
        let orch = orchestrator(ScriptedGateway::texts(&[
            "TOOL_CALL: add 2 3",
            "The sum is 5.",
            "Anything else?",
        ]));
        let mut store = ConversationStore::new();
        store.submit("2+3", &orch).await.unwrap();
        store.submit("thanks", &orch).await.unwrap();

        assert_eq!(store.messages().len(), 6);
        assert_eq!(store.tool_calls().len(), 1);
        assert_eq!(store.tool_calls()[0].tool, "add");
        assert_eq!(store.tool_calls()[0].result, "5");
    }

    #[tokio::test]
    async fn failed_turn_restores_previous_state() {
        let orch = orchestrator(ScriptedGateway::new(vec![
            Ok(Completion::text("hello")),
            Err(GatewayError::NoChoices),
        ]));
        let mut store = ConversationStore::new();
        store.submit("hi", &orch).await.unwrap();
        let before = store.messages().to_vec();

        let err = store.submit("again", &orch).await.unwrap_err();
        assert!(matches!(err, TurnError::Gateway(GatewayError::NoChoices)));
        assert_eq!(store.messages(), &before[..]);
    }

    #[tokio::test]
    async fn failed_tool_call_leaves_store_untouched() {
        let orch = orchestrator(ScriptedGateway::texts(&[
            "TOOL_CALL: add 2 3",
            "The sum is 5.",
            "TOOL_CALL: divide 1 0",
            "TOOL_CALL: add 1",
        ]));
        let mut store = ConversationStore::new();
        store.submit("2+3", &orch).await.unwrap();
        let messages = store.messages().to_vec();
        let calls = store.tool_calls().to_vec();

        let err = store.submit("1/0", &orch).await.unwrap_err();
        assert!(matches!(err, TurnError::Tool(ToolError::DivisionByZero { .. })));
        assert_eq!(store.messages(), &messages[..]);
        assert_eq!(store.tool_calls(), &calls[..]);

        let err = store.submit("just one", &orch).await.unwrap_err();
        assert!(matches!(err, TurnError::Tool(ToolError::Arity { got: 1, .. })));
        assert_eq!(store.messages(), &messages[..]);
        assert_eq!(store.tool_calls(), &calls[..]);
    }

    #[tokio::test]
    async fn reset_clears_everything() {
        let orch = orchestrator(ScriptedGateway::texts(&["TOOL_CALL: slugify My Title", "ok"]));
        let mut store = ConversationStore::new();
        store.submit("slug", &orch).await.unwrap();
        assert_eq!(store.tool_calls()[0].result, "my-title");
        store.reset();
        assert!(store.messages().is_empty());
        assert!(store.tool_calls().is_empty());
    }
}
