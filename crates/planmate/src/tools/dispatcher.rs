//! Tool dispatch: executes a model-issued batch of function calls.

use futures_util::future::join_all;

use crate::error::CoreError;
use crate::message::{FunctionCallRequest, FunctionCallResult};

use super::registry::ToolRegistry;
use super::schema::validate_args;

/// Validates and invokes tool handlers, normalizing every outcome into a
/// [`FunctionCallResult`]. Dispatch itself never fails: partial failure of
/// one call must not abort its siblings or the conversation.
pub struct ToolDispatcher {
    registry: ToolRegistry,
}

impl ToolDispatcher {
    pub fn new(registry: ToolRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Execute a dispatch batch. Handlers run concurrently; results come back
    /// in request order regardless of completion order.
    pub async fn dispatch(&self, requests: &[FunctionCallRequest]) -> Vec<FunctionCallResult> {
        tracing::debug!(batch_size = requests.len(), "dispatching tool batch");
        join_all(requests.iter().map(|request| self.dispatch_one(request))).await
    }

    async fn dispatch_one(&self, request: &FunctionCallRequest) -> FunctionCallResult {
        let Some(tool) = self.registry.resolve(&request.name) else {
            tracing::warn!(tool = %request.name, "model requested unknown tool");
            return FunctionCallResult::error(
                &request.name,
                CoreError::UnknownTool(request.name.clone()).to_string(),
            );
        };

        if let Err(error) = validate_args(&request.arguments, &tool.parameters) {
            return FunctionCallResult::error(&request.name, error.to_string());
        }

        match (tool.handler)(request.arguments.clone()).await {
            Ok(payload) => FunctionCallResult {
                name: request.name.clone(),
                payload,
            },
            Err(error) => {
                tracing::warn!(tool = %request.name, %error, "tool handler failed");
                FunctionCallResult::error(&request.name, error.to_string())
            }
        }
    }
}
