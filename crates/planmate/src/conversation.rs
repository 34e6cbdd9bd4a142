//! Conversation orchestrator: the turn-taking state machine between the
//! user, the model, and the tool dispatcher.

use std::sync::Arc;

use crate::bus::Bus;
use crate::error::{CoreError, CoreResult};
use crate::event::{CoreEvent, MessageAppendedPayload, StatusUpdatedPayload, TurnFailedPayload};
use crate::llm::{LanguageModel, ModelReply};
use crate::message::{FunctionCallRequest, Message, Role};
use crate::tools::{ToolDispatcher, GET_SCHEDULE, SCHEDULE_EVENT};

/// Fixed user-visible text appended when a turn dies on a model fault.
pub const TURN_FAULT_MESSAGE: &str = "Sorry, I encountered an error.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    Idle,
    AwaitingModel,
    DispatchingTools,
}

/// One in-memory conversation. Owns the message history exclusively; only one
/// turn runs at a time (`send_turn` takes `&mut self`). The history lives for
/// the lifetime of this value and is never persisted.
pub struct Conversation {
    model: Arc<dyn LanguageModel>,
    dispatcher: ToolDispatcher,
    bus: Bus,
    history: Vec<Message>,
    state: TurnState,
    max_tool_rounds: usize,
}

impl Conversation {
    pub fn new(
        model: Arc<dyn LanguageModel>,
        dispatcher: ToolDispatcher,
        bus: Bus,
        max_tool_rounds: usize,
    ) -> Self {
        Self {
            model,
            dispatcher,
            bus,
            history: Vec::new(),
            state: TurnState::Idle,
            max_tool_rounds,
        }
    }

    pub fn history(&self) -> &[Message] {
        &self.history
    }

    pub fn state(&self) -> TurnState {
        self.state
    }

    /// Run one full turn: user input in, one final assistant message out,
    /// with as many tool rounds in between as the model asks for (bounded).
    ///
    /// Empty input (after trimming) is a no-op: no state transition, no
    /// history change, no events. Model-communication faults append the fixed
    /// error message, return the conversation to `Idle`, and are handed back
    /// to the caller for logging; they are not sticky.
    pub async fn send_turn(&mut self, user_text: &str) -> CoreResult<()> {
        let text = user_text.trim();
        if text.is_empty() {
            return Ok(());
        }

        self.append(Message::from_text(Role::User, text));
        self.state = TurnState::AwaitingModel;
        tracing::info!(history_len = self.history.len(), "turn started");

        match self.run_turn().await {
            Ok(()) => {
                self.state = TurnState::Idle;
                self.bus.publish(CoreEvent::StatusCleared);
                tracing::info!(history_len = self.history.len(), "turn completed");
                Ok(())
            }
            Err(error) => {
                tracing::error!(%error, "turn failed");
                self.state = TurnState::Idle;
                self.append(Message::from_text(Role::Assistant, TURN_FAULT_MESSAGE));
                self.bus.publish(CoreEvent::TurnFailed(TurnFailedPayload {
                    display_text: TURN_FAULT_MESSAGE.to_string(),
                }));
                self.bus.publish(CoreEvent::StatusCleared);
                Err(error)
            }
        }
    }

    async fn run_turn(&mut self) -> CoreResult<()> {
        let declarations = self.dispatcher.registry().declarations();
        let mut rounds = 0;

        loop {
            let reply = self.model.complete(&self.history, &declarations).await?;

            if reply.has_function_calls() {
                rounds += 1;
                if rounds > self.max_tool_rounds {
                    return Err(CoreError::Internal(format!(
                        "model exceeded {} tool-call rounds",
                        self.max_tool_rounds
                    )));
                }
                self.dispatch_round(reply).await;
                continue;
            }

            let text = reply.text.ok_or_else(|| {
                CoreError::ModelCommunication("model reply carried no text".to_string())
            })?;
            self.append(Message::from_text(Role::Assistant, text));
            return Ok(());
        }
    }

    /// One tool round: status per request, the assistant turn that asked,
    /// the dispatch batch, and one tool message per result in request order.
    /// Ends back in `AwaitingModel` so the model sees the results before it
    /// answers the user.
    async fn dispatch_round(&mut self, reply: ModelReply) {
        self.state = TurnState::DispatchingTools;
        for call in &reply.function_calls {
            self.publish_status(status_message(call));
        }

        let requests = reply.function_calls;
        self.append(Message::from_function_calls(requests.clone()));
        let results = self.dispatcher.dispatch(&requests).await;
        for result in results {
            self.append(Message::from_function_result(result));
        }

        self.publish_status("Thinking...".to_string());
        self.state = TurnState::AwaitingModel;
    }

    fn append(&mut self, message: Message) {
        self.bus
            .publish(CoreEvent::MessageAppended(MessageAppendedPayload {
                message: message.clone(),
            }));
        self.history.push(message);
    }

    fn publish_status(&self, message: String) {
        self.bus
            .publish(CoreEvent::StatusUpdated(StatusUpdatedPayload { message }));
    }
}

fn status_message(call: &FunctionCallRequest) -> String {
    match call.name.as_str() {
        GET_SCHEDULE => "Checking your schedule...".to_string(),
        SCHEDULE_EVENT => match call.arguments.get("title").and_then(|v| v.as_str()) {
            Some(title) => format!("Scheduling \"{title}\"..."),
            None => format!("Calling tool: {}...", call.name),
        },
        other => format!("Calling tool: {other}..."),
    }
}
