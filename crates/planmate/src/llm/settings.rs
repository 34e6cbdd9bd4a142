use std::env;
use std::time::Duration;

use crate::error::{CoreError, CoreResult};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-1.5-flash-latest";
const DEFAULT_SYSTEM_PROMPT: &str =
    "You are a personal scheduling assistant. You can read the user's calendar \
     and create new events on their behalf.";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_TOOL_ROUNDS: usize = 5;

pub struct ModelSettings {
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub system_prompt: String,
    pub request_timeout: Duration,
    pub max_tool_rounds: usize,
}

impl ModelSettings {
    pub fn from_env() -> CoreResult<Self> {
        let base_url =
            env::var("PLANMATE_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let api_key = env::var("PLANMATE_GEMINI_API_KEY")
            .or_else(|_| env::var("GEMINI_API_KEY"))
            .ok();
        let model = env::var("PLANMATE_MODEL")
            .ok()
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let system_prompt = env::var("PLANMATE_SYSTEM_PROMPT")
            .ok()
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string());
        let request_timeout = env::var("PLANMATE_REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|value| value.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS));
        let max_tool_rounds = env::var("PLANMATE_MAX_TOOL_ROUNDS")
            .ok()
            .and_then(|value| value.parse::<usize>().ok())
            .unwrap_or(DEFAULT_MAX_TOOL_ROUNDS);

        Ok(Self {
            base_url,
            api_key,
            model,
            system_prompt,
            request_timeout,
            max_tool_rounds,
        })
    }

    pub fn require_api_key(&self) -> CoreResult<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| CoreError::InvalidInput("missing Gemini API key".to_string()))
    }
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            max_tool_rounds: DEFAULT_MAX_TOOL_ROUNDS,
        }
    }
}
