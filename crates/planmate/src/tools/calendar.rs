//! The calendar tools the model can invoke: `getSchedule` and `scheduleEvent`.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::{json, Map, Value};

use crate::calendar::{CalendarEvent, CalendarStore, NewCalendarEvent, SessionIdentity};
use crate::error::CoreError;

use super::registry::{ToolRegistry, ToolRegistryBuilder};
use super::schema::{ParameterType, ToolDefinition, ToolParameter};

pub const GET_SCHEDULE: &str = "getSchedule";
pub const SCHEDULE_EVENT: &str = "scheduleEvent";

/// Build the registry of calendar tools, binding the store and the session
/// identity into each handler. The identity is an explicit handler input, not
/// ambient state, so a fake identity is enough to test either path.
pub fn calendar_registry(
    store: Arc<dyn CalendarStore>,
    identity: SessionIdentity,
) -> ToolRegistry {
    ToolRegistryBuilder::new()
        .register(get_schedule_tool(store.clone(), identity.clone()))
        .register(schedule_event_tool(store, identity))
        .build()
}

fn get_schedule_tool(store: Arc<dyn CalendarStore>, identity: SessionIdentity) -> ToolDefinition {
    ToolDefinition {
        name: GET_SCHEDULE.to_string(),
        description: "Get the user's schedule for the upcoming days.".to_string(),
        parameters: Vec::new(),
        handler: Arc::new(move |_args| {
            let store = store.clone();
            let identity = identity.clone();
            Box::pin(async move {
                match store.read_events(&identity).await {
                    Ok(events) => Ok(json!({
                        "events": events.iter().map(event_payload).collect::<Vec<_>>(),
                    })),
                    Err(CoreError::NotAuthenticated) => Ok(not_logged_in()),
                    Err(error) => Err(error),
                }
            })
        }),
    }
}

fn schedule_event_tool(
    store: Arc<dyn CalendarStore>,
    identity: SessionIdentity,
) -> ToolDefinition {
    ToolDefinition {
        name: SCHEDULE_EVENT.to_string(),
        description: "Schedule a new event in the user's calendar.".to_string(),
        parameters: vec![
            ToolParameter::required("title", ParameterType::String, "The title of the event."),
            ToolParameter::optional(
                "description",
                ParameterType::String,
                "A brief description of the event.",
            ),
            ToolParameter::required(
                "startTime",
                ParameterType::String,
                "The start time of the event in ISO 8601 format.",
            ),
            ToolParameter::required(
                "endTime",
                ParameterType::String,
                "The end time of the event in ISO 8601 format.",
            ),
        ],
        handler: Arc::new(move |args| {
            let store = store.clone();
            let identity = identity.clone();
            Box::pin(async move {
                let (title, description, start, end) = match parse_schedule_args(&args) {
                    Ok(parsed) => parsed,
                    Err(message) => return Ok(json!({ "error": message })),
                };
                if end < start {
                    return Ok(json!({
                        "error": "endTime must not be earlier than startTime"
                    }));
                }
                let event = NewCalendarEvent::new(title, description, start, end);
                match store.write_event(&identity, event).await {
                    Ok(_id) => Ok(json!({"success": true})),
                    Err(CoreError::NotAuthenticated) => Ok(not_logged_in()),
                    Err(error) => Err(error),
                }
            })
        }),
    }
}

fn not_logged_in() -> Value {
    json!({"error": "User not logged in"})
}

fn event_payload(event: &CalendarEvent) -> Value {
    json!({
        "id": event.id,
        "title": event.title,
        "description": event.description,
        "start": event.start.to_rfc3339(),
        "end": event.end.to_rfc3339(),
        "color": event.color,
    })
}

type ScheduleArgs = (String, String, DateTime<Utc>, DateTime<Utc>);

/// Pull the `scheduleEvent` arguments out of the model-provided object.
/// Violations are reported as strings so the handler can refuse with an
/// `{"error"}` payload instead of a fault.
fn parse_schedule_args(args: &Map<String, Value>) -> Result<ScheduleArgs, String> {
    let title = required_str(args, "title")?;
    let description = args
        .get("description")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let start = parse_instant(required_str(args, "startTime")?.as_str(), "startTime")?;
    let end = parse_instant(required_str(args, "endTime")?.as_str(), "endTime")?;
    Ok((title, description, start, end))
}

fn required_str(args: &Map<String, Value>, name: &str) -> Result<String, String> {
    args.get(name)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| format!("missing required parameter: '{name}'"))
}

fn parse_instant(raw: &str, name: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(raw)
        .map(|instant| instant.with_timezone(&Utc))
        .map_err(|_| format!("could not parse {name}: '{raw}'"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::MemoryCalendarStore;
    use crate::error::CoreResult;
    use async_trait::async_trait;
    use chrono::TimeZone;

    fn args(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap_or_default()
    }

    async fn invoke(registry: &ToolRegistry, name: &str, arguments: Value) -> CoreResult<Value> {
        let tool = registry.resolve(name).expect("tool registered");
        (tool.handler)(args(arguments)).await
    }

    fn authed_registry(store: Arc<MemoryCalendarStore>) -> ToolRegistry {
        calendar_registry(store, SessionIdentity::authenticated("user-1"))
    }

    #[tokio::test]
    async fn get_schedule_returns_empty_event_list() {
        let registry = authed_registry(Arc::new(MemoryCalendarStore::new()));
        let payload = invoke(&registry, GET_SCHEDULE, json!({})).await.unwrap();
        assert_eq!(payload, json!({"events": []}));
    }

    #[tokio::test]
    async fn schedule_then_get_round_trips_the_event() {
        let registry = authed_registry(Arc::new(MemoryCalendarStore::new()));

        let written = invoke(
            &registry,
            SCHEDULE_EVENT,
            json!({
                "title": "Lab",
                "startTime": "2025-03-01T10:00:00Z",
                "endTime": "2025-03-01T11:00:00Z",
            }),
        )
        .await
        .unwrap();
        assert_eq!(written, json!({"success": true}));

        let payload = invoke(&registry, GET_SCHEDULE, json!({})).await.unwrap();
        let events = payload["events"].as_array().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0]["title"], "Lab");
        // Instant-equal, not string-equal.
        let start: DateTime<Utc> = events[0]["start"].as_str().unwrap().parse().unwrap();
        let end: DateTime<Utc> = events[0]["end"].as_str().unwrap().parse().unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2025, 3, 1, 11, 0, 0).unwrap());
    }

    #[tokio::test]
    async fn offset_timestamps_normalize_to_the_same_instant() {
        let registry = authed_registry(Arc::new(MemoryCalendarStore::new()));
        invoke(
            &registry,
            SCHEDULE_EVENT,
            json!({
                "title": "Standup",
                "startTime": "2025-03-01T04:00:00-05:00",
                "endTime": "2025-03-01T04:30:00-05:00",
            }),
        )
        .await
        .unwrap();

        let payload = invoke(&registry, GET_SCHEDULE, json!({})).await.unwrap();
        let start: DateTime<Utc> = payload["events"][0]["start"]
            .as_str()
            .unwrap()
            .parse()
            .unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap());
    }

    #[tokio::test]
    async fn anonymous_identity_gets_error_payload_not_fault() {
        let registry = calendar_registry(
            Arc::new(MemoryCalendarStore::new()),
            SessionIdentity::anonymous(),
        );

        let read = invoke(&registry, GET_SCHEDULE, json!({})).await.unwrap();
        assert_eq!(read, json!({"error": "User not logged in"}));

        let write = invoke(
            &registry,
            SCHEDULE_EVENT,
            json!({
                "title": "Lab",
                "startTime": "2025-03-01T10:00:00Z",
                "endTime": "2025-03-01T11:00:00Z",
            }),
        )
        .await
        .unwrap();
        assert_eq!(write, json!({"error": "User not logged in"}));
    }

    #[tokio::test]
    async fn unparseable_times_are_refused_as_error_payloads() {
        let registry = authed_registry(Arc::new(MemoryCalendarStore::new()));
        let payload = invoke(
            &registry,
            SCHEDULE_EVENT,
            json!({
                "title": "Lab",
                "startTime": "tomorrow at 10",
                "endTime": "2025-03-01T11:00:00Z",
            }),
        )
        .await
        .unwrap();
        assert!(payload["error"]
            .as_str()
            .unwrap()
            .contains("could not parse startTime"));
    }

    #[tokio::test]
    async fn end_before_start_is_refused() {
        let store = Arc::new(MemoryCalendarStore::new());
        let registry = authed_registry(store.clone());
        let payload = invoke(
            &registry,
            SCHEDULE_EVENT,
            json!({
                "title": "Backwards",
                "startTime": "2025-03-01T11:00:00Z",
                "endTime": "2025-03-01T10:00:00Z",
            }),
        )
        .await
        .unwrap();
        assert!(payload.get("error").is_some());
        let events = store
            .read_events(&SessionIdentity::authenticated("user-1"))
            .await
            .unwrap();
        assert!(events.is_empty());
    }

    #[tokio::test]
    async fn description_defaults_to_empty() {
        let registry = authed_registry(Arc::new(MemoryCalendarStore::new()));
        invoke(
            &registry,
            SCHEDULE_EVENT,
            json!({
                "title": "Lab",
                "startTime": "2025-03-01T10:00:00Z",
                "endTime": "2025-03-01T11:00:00Z",
            }),
        )
        .await
        .unwrap();

        let payload = invoke(&registry, GET_SCHEDULE, json!({})).await.unwrap();
        assert_eq!(payload["events"][0]["description"], "");
    }

    struct FailingStore;

    #[async_trait]
    impl CalendarStore for FailingStore {
        async fn read_events(
            &self,
            _identity: &SessionIdentity,
        ) -> CoreResult<Vec<CalendarEvent>> {
            Err(CoreError::Internal("store unreachable".to_string()))
        }

        async fn write_event(
            &self,
            _identity: &SessionIdentity,
            _event: NewCalendarEvent,
        ) -> CoreResult<String> {
            Err(CoreError::Internal("store unreachable".to_string()))
        }
    }

    #[tokio::test]
    async fn store_faults_propagate_as_handler_faults() {
        let registry = calendar_registry(
            Arc::new(FailingStore),
            SessionIdentity::authenticated("user-1"),
        );
        let result = invoke(&registry, GET_SCHEDULE, json!({})).await;
        assert!(matches!(result, Err(CoreError::Internal(_))));
    }
}
