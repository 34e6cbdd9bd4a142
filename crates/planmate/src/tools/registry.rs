//! Tool registry: the fixed set of callable functions exposed to the model.

use std::collections::HashMap;

use serde::Serialize;

use super::schema::{ToolDefinition, ToolParameter};

/// Schema-only view of a tool, included in every model request.
#[derive(Debug, Clone, Serialize)]
pub struct ToolDeclaration {
    pub name: String,
    pub description: String,
    pub parameters: Vec<ToolParameter>,
}

/// Registry holding the session's tools. Immutable after construction: the
/// builder is consumed, so the set the model sees cannot drift from the set
/// the dispatcher can resolve.
pub struct ToolRegistry {
    tools: HashMap<String, ToolDefinition>,
}

pub struct ToolRegistryBuilder {
    tools: HashMap<String, ToolDefinition>,
}

impl ToolRegistryBuilder {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a tool. Panics if a tool with the same name already exists;
    /// duplicate names are a startup-time wiring bug.
    pub fn register(mut self, tool: ToolDefinition) -> Self {
        if self.tools.contains_key(&tool.name) {
            panic!("duplicate tool: {}", tool.name);
        }
        self.tools.insert(tool.name.clone(), tool);
        self
    }

    pub fn build(self) -> ToolRegistry {
        ToolRegistry { tools: self.tools }
    }
}

impl Default for ToolRegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolRegistry {
    /// Look up a tool by the name the model emitted.
    pub fn resolve(&self, name: &str) -> Option<&ToolDefinition> {
        self.tools.get(name)
    }

    /// Full declaration snapshot, sorted by name. The model is stateless with
    /// respect to available tools, so every request carries the full list.
    pub fn declarations(&self) -> Vec<ToolDeclaration> {
        let mut declarations: Vec<ToolDeclaration> = self
            .tools
            .values()
            .map(|tool| ToolDeclaration {
                name: tool.name.clone(),
                description: tool.description.clone(),
                parameters: tool.parameters.clone(),
            })
            .collect();
        declarations.sort_by(|a, b| a.name.cmp(&b.name));
        declarations
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::schema::ToolHandler;
    use serde_json::json;
    use std::sync::Arc;

    fn make_handler() -> ToolHandler {
        Arc::new(|_args| Box::pin(async { Ok(json!({"ok": true})) }))
    }

    fn make_tool(name: &str) -> ToolDefinition {
        ToolDefinition {
            name: name.to_string(),
            description: format!("{name} tool"),
            parameters: Vec::new(),
            handler: make_handler(),
        }
    }

    #[test]
    fn empty_registry() {
        let registry = ToolRegistryBuilder::new().build();
        assert!(registry.is_empty());
        assert!(registry.resolve("any").is_none());
        assert!(registry.declarations().is_empty());
    }

    #[test]
    fn register_and_resolve() {
        let registry = ToolRegistryBuilder::new()
            .register(make_tool("getSchedule"))
            .build();

        assert_eq!(registry.len(), 1);
        let tool = registry.resolve("getSchedule").unwrap();
        assert_eq!(tool.name, "getSchedule");
        assert!(registry.resolve("somethingElse").is_none());
    }

    #[test]
    fn declarations_are_sorted_by_name() {
        let registry = ToolRegistryBuilder::new()
            .register(make_tool("scheduleEvent"))
            .register(make_tool("getSchedule"))
            .build();

        let declarations = registry.declarations();
        let names: Vec<&str> = declarations.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["getSchedule", "scheduleEvent"]);
    }

    #[test]
    #[should_panic(expected = "duplicate tool")]
    fn duplicate_tool_panics() {
        let _ = ToolRegistryBuilder::new()
            .register(make_tool("dup"))
            .register(make_tool("dup"));
    }
}
