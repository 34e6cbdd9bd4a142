//! Calendar event records and the store they live in.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};

/// Display color assigned to events created through the assistant.
pub const DEFAULT_EVENT_COLOR: &str = "#841584";

/// The authenticated user context under which tool handlers read and write
/// calendar data. Captured once at conversation construction; handlers never
/// consult ambient global state.
#[derive(Debug, Clone, Default)]
pub struct SessionIdentity {
    pub user_id: Option<String>,
}

impl SessionIdentity {
    pub fn authenticated(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
        }
    }

    pub fn anonymous() -> Self {
        Self { user_id: None }
    }

    /// The user id, or `NotAuthenticated` when none is present.
    pub fn require_user(&self) -> CoreResult<&str> {
        self.user_id
            .as_deref()
            .ok_or(CoreError::NotAuthenticated)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub color: String,
}

/// A calendar event before the store assigns it an id.
#[derive(Debug, Clone)]
pub struct NewCalendarEvent {
    pub title: String,
    pub description: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub color: String,
}

impl NewCalendarEvent {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            start,
            end,
            color: DEFAULT_EVENT_COLOR.to_string(),
        }
    }
}

/// Read/write access to a user's event records.
///
/// Both operations fail with [`CoreError::NotAuthenticated`] when the
/// identity carries no user id.
#[async_trait]
pub trait CalendarStore: Send + Sync {
    async fn read_events(&self, identity: &SessionIdentity) -> CoreResult<Vec<CalendarEvent>>;
    async fn write_event(
        &self,
        identity: &SessionIdentity,
        event: NewCalendarEvent,
    ) -> CoreResult<String>;
}

/// In-process store keeping per-user event vectors in memory.
pub struct MemoryCalendarStore {
    events: RwLock<HashMap<String, Vec<CalendarEvent>>>,
}

impl MemoryCalendarStore {
    pub fn new() -> Self {
        Self {
            events: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryCalendarStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CalendarStore for MemoryCalendarStore {
    async fn read_events(&self, identity: &SessionIdentity) -> CoreResult<Vec<CalendarEvent>> {
        let user_id = identity.require_user()?;
        let events = self.events.read().await;
        Ok(events.get(user_id).cloned().unwrap_or_default())
    }

    async fn write_event(
        &self,
        identity: &SessionIdentity,
        event: NewCalendarEvent,
    ) -> CoreResult<String> {
        let user_id = identity.require_user()?;
        let id = Uuid::new_v4().to_string();
        let stored = CalendarEvent {
            id: id.clone(),
            title: event.title,
            description: event.description,
            start: event.start,
            end: event.end,
            color: event.color,
        };
        let mut events = self.events.write().await;
        events.entry(user_id.to_string()).or_default().push(stored);
        Ok(id)
    }
}
