//! Tool schema types and argument validation.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{CoreError, CoreResult};

/// The data type of a tool parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterType {
    String,
    Integer,
    Number,
    Boolean,
    Array,
    Object,
}

impl ParameterType {
    /// Gemini's function-declaration type names are uppercase.
    pub fn as_gemini_type(&self) -> &'static str {
        match self {
            ParameterType::String => "STRING",
            ParameterType::Integer => "INTEGER",
            ParameterType::Number => "NUMBER",
            ParameterType::Boolean => "BOOLEAN",
            ParameterType::Array => "ARRAY",
            ParameterType::Object => "OBJECT",
        }
    }

    fn matches(&self, value: &Value) -> bool {
        match self {
            ParameterType::String => value.is_string(),
            ParameterType::Integer => value.is_i64() || value.is_u64(),
            ParameterType::Number => value.is_number(),
            ParameterType::Boolean => value.is_boolean(),
            ParameterType::Array => value.is_array(),
            ParameterType::Object => value.is_object(),
        }
    }
}

/// One parameter in a tool's declared schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolParameter {
    pub name: String,
    #[serde(rename = "type")]
    pub param_type: ParameterType,
    pub description: String,
    pub required: bool,
}

impl ToolParameter {
    pub fn required(
        name: impl Into<String>,
        param_type: ParameterType,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            param_type,
            description: description.into(),
            required: true,
        }
    }

    pub fn optional(
        name: impl Into<String>,
        param_type: ParameterType,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            param_type,
            description: description.into(),
            required: false,
        }
    }
}

/// Handler future type: tool handlers are async and independent of each other.
pub type HandlerFuture = Pin<Box<dyn Future<Output = CoreResult<Value>> + Send>>;

/// Handler type: takes the argument object, returns the tool-result payload.
///
/// Domain refusals (unauthenticated, bad arguments) are returned as
/// `Ok({"error": ...})` payloads; `Err` is reserved for handler faults such
/// as unreachable storage.
pub type ToolHandler = Arc<dyn Fn(Map<String, Value>) -> HandlerFuture + Send + Sync>;

/// Complete tool definition: schema the model selects against, plus the
/// handler bound at registry-build time.
#[derive(Clone)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: Vec<ToolParameter>,
    pub handler: ToolHandler,
}

/// Validate an argument object against a tool's declared parameter list.
///
/// Checks required presence and primitive type of every declared parameter
/// that is present. Undeclared extra arguments pass through untouched.
pub fn validate_args(args: &Map<String, Value>, parameters: &[ToolParameter]) -> CoreResult<()> {
    for parameter in parameters {
        match args.get(&parameter.name) {
            Some(value) => {
                if !parameter.param_type.matches(value) {
                    return Err(CoreError::InvalidInput(format!(
                        "parameter '{}' has wrong type",
                        parameter.name
                    )));
                }
            }
            None => {
                if parameter.required {
                    return Err(CoreError::InvalidInput(format!(
                        "missing required parameter: '{}'",
                        parameter.name
                    )));
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn empty_parameter_list_passes_anything() {
        assert!(validate_args(&args(json!({"extra": 1})), &[]).is_ok());
        assert!(validate_args(&Map::new(), &[]).is_ok());
    }

    #[test]
    fn missing_required_parameter_fails() {
        let parameters = vec![ToolParameter::required(
            "title",
            ParameterType::String,
            "The title.",
        )];
        let result = validate_args(&Map::new(), &parameters);
        assert!(matches!(result, Err(CoreError::InvalidInput(_))));
    }

    #[test]
    fn missing_optional_parameter_passes() {
        let parameters = vec![ToolParameter::optional(
            "description",
            ParameterType::String,
            "A description.",
        )];
        assert!(validate_args(&Map::new(), &parameters).is_ok());
    }

    #[test]
    fn wrong_type_fails_even_for_optional() {
        let parameters = vec![ToolParameter::optional(
            "description",
            ParameterType::String,
            "A description.",
        )];
        let result = validate_args(&args(json!({"description": 42})), &parameters);
        assert!(matches!(result, Err(CoreError::InvalidInput(_))));
    }

    #[test]
    fn matching_types_pass() {
        let parameters = vec![
            ToolParameter::required("title", ParameterType::String, "t"),
            ToolParameter::required("count", ParameterType::Integer, "c"),
            ToolParameter::required("flag", ParameterType::Boolean, "f"),
        ];
        let value = json!({"title": "x", "count": 3, "flag": true});
        assert!(validate_args(&args(value), &parameters).is_ok());
    }

    #[test]
    fn gemini_type_names_are_uppercase() {
        assert_eq!(ParameterType::String.as_gemini_type(), "STRING");
        assert_eq!(ParameterType::Object.as_gemini_type(), "OBJECT");
    }
}
