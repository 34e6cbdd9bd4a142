use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::utils::time::now_rfc3339;

/// Who authored a turn in the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    Tool,
}

/// A function invocation requested by the model.
///
/// Only the model produces these; user input never carries one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCallRequest {
    pub name: String,
    /// Argument object keyed by parameter name, typed per the tool's schema.
    pub arguments: Map<String, Value>,
}

/// The outcome of one function invocation, fed back to the model.
///
/// `payload` is either the handler's success payload or `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCallResult {
    pub name: String,
    pub payload: Value,
}

impl FunctionCallResult {
    pub fn error(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            payload: serde_json::json!({ "error": message.into() }),
        }
    }

    pub fn is_error(&self) -> bool {
        self.payload.get("error").is_some()
    }
}

/// One turn in a conversation's append-only history.
///
/// Assistant turns may carry function-call requests instead of (or alongside)
/// text; tool turns carry exactly one function-call result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub content: Option<String>,
    #[serde(rename = "functionCalls", default, skip_serializing_if = "Vec::is_empty")]
    pub function_calls: Vec<FunctionCallRequest>,
    #[serde(rename = "functionResult", skip_serializing_if = "Option::is_none")]
    pub function_result: Option<FunctionCallResult>,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

impl Message {
    pub fn from_text(role: Role, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7().to_string(),
            role,
            content: Some(text.into()),
            function_calls: Vec::new(),
            function_result: None,
            created_at: now_rfc3339(),
        }
    }

    /// Assistant turn requesting one or more function invocations.
    pub fn from_function_calls(calls: Vec<FunctionCallRequest>) -> Self {
        Self {
            id: Uuid::now_v7().to_string(),
            role: Role::Assistant,
            content: None,
            function_calls: calls,
            function_result: None,
            created_at: now_rfc3339(),
        }
    }

    /// Tool turn carrying the result for one function invocation.
    pub fn from_function_result(result: FunctionCallResult) -> Self {
        Self {
            id: Uuid::now_v7().to_string(),
            role: Role::Tool,
            content: None,
            function_calls: Vec::new(),
            function_result: Some(result),
            created_at: now_rfc3339(),
        }
    }
}
