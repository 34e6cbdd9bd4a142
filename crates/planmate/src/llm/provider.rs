use async_trait::async_trait;

use crate::error::CoreResult;
use crate::message::{FunctionCallRequest, Message};
use crate::tools::ToolDeclaration;

/// One model response: either final natural-language text or a batch of
/// function-call requests (never both in this protocol).
#[derive(Debug, Clone)]
pub struct ModelReply {
    pub text: Option<String>,
    pub function_calls: Vec<FunctionCallRequest>,
}

impl ModelReply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            function_calls: Vec::new(),
        }
    }

    pub fn function_calls(calls: Vec<FunctionCallRequest>) -> Self {
        Self {
            text: None,
            function_calls: calls,
        }
    }

    pub fn has_function_calls(&self) -> bool {
        !self.function_calls.is_empty()
    }
}

/// Request/response seam to the hosted language model.
///
/// The model is stateless across calls: every request carries the full
/// ordered history and the full tool declaration list.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn complete(
        &self,
        history: &[Message],
        tools: &[ToolDeclaration],
    ) -> CoreResult<ModelReply>;
}
