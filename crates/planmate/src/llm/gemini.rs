//! Gemini `generateContent` client and wire-format conversion.

use async_trait::async_trait;
use serde_json::{json, Map, Value};

use crate::error::{CoreError, CoreResult};
use crate::message::{FunctionCallRequest, Message, Role};
use crate::tools::ToolDeclaration;

use super::provider::{LanguageModel, ModelReply};
use super::settings::ModelSettings;

pub struct GeminiClient {
    http: reqwest::Client,
    settings: ModelSettings,
    api_key: String,
}

impl GeminiClient {
    pub fn new(settings: ModelSettings) -> CoreResult<Self> {
        let api_key = settings.require_api_key()?.to_string();
        let http = reqwest::Client::builder()
            .timeout(settings.request_timeout)
            .build()
            .map_err(|error| CoreError::Internal(error.to_string()))?;
        Ok(Self {
            http,
            settings,
            api_key,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.settings.base_url, self.settings.model
        )
    }
}

#[async_trait]
impl LanguageModel for GeminiClient {
    async fn complete(
        &self,
        history: &[Message],
        tools: &[ToolDeclaration],
    ) -> CoreResult<ModelReply> {
        let body = build_request_body(&self.settings.system_prompt, history, tools);
        tracing::debug!(
            history_len = history.len(),
            tool_count = tools.len(),
            model = %self.settings.model,
            "issuing model request"
        );

        let response = self
            .http
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|error| CoreError::ModelCommunication(error.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(CoreError::ModelCommunication(format!(
                "model returned {status}: {detail}"
            )));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|error| CoreError::ModelCommunication(error.to_string()))?;
        parse_reply(&payload)
    }
}

/// Assemble the full `generateContent` request: system instruction, the
/// replayed history, and the complete tool declaration list.
pub(crate) fn build_request_body(
    system_prompt: &str,
    history: &[Message],
    tools: &[ToolDeclaration],
) -> Value {
    let mut body = json!({
        "systemInstruction": { "parts": [{ "text": system_prompt }] },
        "contents": history_to_contents(history),
    });
    if !tools.is_empty() {
        body["tools"] = json!([{ "functionDeclarations": declarations_to_wire(tools) }]);
    }
    body
}

/// Map the ordered message history onto Gemini `contents`, verbatim and in
/// order. Assistant turns become `model` contents (text and/or `functionCall`
/// parts); consecutive tool turns fold into one `user` content carrying their
/// `functionResponse` parts in result order.
fn history_to_contents(history: &[Message]) -> Vec<Value> {
    let mut contents: Vec<Value> = Vec::new();
    for message in history {
        match message.role {
            Role::User => {
                if let Some(text) = &message.content {
                    contents.push(json!({
                        "role": "user",
                        "parts": [{ "text": text }],
                    }));
                }
            }
            Role::Assistant => {
                let mut parts: Vec<Value> = Vec::new();
                if let Some(text) = &message.content {
                    parts.push(json!({ "text": text }));
                }
                for call in &message.function_calls {
                    parts.push(json!({
                        "functionCall": {
                            "name": call.name,
                            "args": Value::Object(call.arguments.clone()),
                        }
                    }));
                }
                if !parts.is_empty() {
                    contents.push(json!({ "role": "model", "parts": parts }));
                }
            }
            Role::Tool => {
                let Some(result) = &message.function_result else {
                    continue;
                };
                let part = json!({
                    "functionResponse": {
                        "name": result.name,
                        "response": result.payload,
                    }
                });
                match contents.last_mut() {
                    Some(last) if is_function_response_content(last) => {
                        if let Some(parts) = last["parts"].as_array_mut() {
                            parts.push(part);
                        }
                    }
                    _ => contents.push(json!({ "role": "user", "parts": [part] })),
                }
            }
        }
    }
    contents
}

fn is_function_response_content(content: &Value) -> bool {
    content["role"] == "user"
        && content["parts"]
            .as_array()
            .map(|parts| parts.iter().all(|p| p.get("functionResponse").is_some()))
            .unwrap_or(false)
}

/// Gemini function declarations use uppercase type names and an `OBJECT`
/// parameter envelope.
fn declarations_to_wire(tools: &[ToolDeclaration]) -> Vec<Value> {
    tools
        .iter()
        .map(|tool| {
            let mut properties = Map::new();
            let mut required: Vec<&str> = Vec::new();
            for parameter in &tool.parameters {
                properties.insert(
                    parameter.name.clone(),
                    json!({
                        "type": parameter.param_type.as_gemini_type(),
                        "description": parameter.description,
                    }),
                );
                if parameter.required {
                    required.push(parameter.name.as_str());
                }
            }
            json!({
                "name": tool.name,
                "description": tool.description,
                "parameters": {
                    "type": "OBJECT",
                    "properties": properties,
                    "required": required,
                }
            })
        })
        .collect()
}

/// Interpret a `generateContent` response: function-call parts win over text;
/// a response with neither is a communication fault.
pub(crate) fn parse_reply(payload: &Value) -> CoreResult<ModelReply> {
    let parts = payload["candidates"]
        .get(0)
        .and_then(|candidate| candidate["content"]["parts"].as_array())
        .ok_or_else(|| {
            CoreError::ModelCommunication("response carried no candidate content".to_string())
        })?;

    let mut calls: Vec<FunctionCallRequest> = Vec::new();
    let mut text_fragments: Vec<&str> = Vec::new();
    for part in parts {
        if let Some(call) = part.get("functionCall") {
            let name = call["name"]
                .as_str()
                .ok_or_else(|| {
                    CoreError::ModelCommunication("functionCall without a name".to_string())
                })?
                .to_string();
            let arguments = call
                .get("args")
                .and_then(Value::as_object)
                .cloned()
                .unwrap_or_default();
            calls.push(FunctionCallRequest { name, arguments });
        } else if let Some(text) = part.get("text").and_then(Value::as_str) {
            text_fragments.push(text);
        }
    }

    if !calls.is_empty() {
        return Ok(ModelReply::function_calls(calls));
    }
    if text_fragments.is_empty() {
        return Err(CoreError::ModelCommunication(
            "response carried neither text nor function calls".to_string(),
        ));
    }
    Ok(ModelReply::text(text_fragments.concat()))
}
