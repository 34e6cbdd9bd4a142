//! planmate — conversational scheduling-assistant core.
//!
//! A chat turn flows user text to a hosted language model, executes the
//! calendar tools the model asks for, feeds the results back, and surfaces
//! the final answer plus progress events to the embedding UI.

pub mod bus;
pub mod calendar;
pub mod conversation;
pub mod error;
pub mod event;
pub mod llm;
pub mod message;
pub mod tools;
pub mod utils;

pub use crate::bus::Bus;
pub use crate::calendar::{
    CalendarEvent, CalendarStore, MemoryCalendarStore, NewCalendarEvent, SessionIdentity,
    DEFAULT_EVENT_COLOR,
};
pub use crate::conversation::{Conversation, TurnState, TURN_FAULT_MESSAGE};
pub use crate::error::{CoreError, CoreResult};
pub use crate::event::CoreEvent;
pub use crate::llm::{GeminiClient, LanguageModel, ModelReply, ModelSettings};
pub use crate::message::{FunctionCallRequest, FunctionCallResult, Message, Role};
pub use crate::tools::{
    calendar_registry, ToolDeclaration, ToolDefinition, ToolDispatcher, ToolRegistry,
    ToolRegistryBuilder,
};
