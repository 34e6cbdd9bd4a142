//! Tool registry and dispatcher.

pub mod calendar;
pub mod dispatcher;
pub mod registry;
pub mod schema;

pub use calendar::{calendar_registry, GET_SCHEDULE, SCHEDULE_EVENT};
pub use dispatcher::ToolDispatcher;
pub use registry::{ToolDeclaration, ToolRegistry, ToolRegistryBuilder};
pub use schema::{validate_args, ParameterType, ToolDefinition, ToolHandler, ToolParameter};
