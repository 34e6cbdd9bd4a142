use serde::Serialize;

use crate::message::Message;

/// Events the conversation publishes for the UI adapter: tool-call progress
/// strings, history deltas, and the fatal-turn notice.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "payload")]
pub enum CoreEvent {
    StatusUpdated(StatusUpdatedPayload),
    StatusCleared,
    MessageAppended(MessageAppendedPayload),
    TurnFailed(TurnFailedPayload),
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusUpdatedPayload {
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageAppendedPayload {
    pub message: Message,
}

#[derive(Debug, Clone, Serialize)]
pub struct TurnFailedPayload {
    #[serde(rename = "displayText")]
    pub display_text: String,
}
