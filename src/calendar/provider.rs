//! Calendar-provider capability seam.
//!
//! One capability: create one event, return its identifier. The real
//! implementation talks to the Google Calendar API; the stub keeps events
//! in memory and is selected at startup when no credentials are configured.

use std::sync::Mutex;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::json;

/// Timezone attached to published event times.
const EVENT_TIME_ZONE: &str = "America/New_York";

/// Request timeout for calendar calls.
const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Provider-level event fields, ready for a create call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventSpec {
    pub summary: String,
    pub description: String,
    pub start_time: String,
    pub end_time: String,
    pub reminder_overrides: Vec<ReminderOverride>,
    pub color_id: String,
}

/// One reminder override on a published event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReminderOverride {
    pub method: &'static str,
    pub minutes: u32,
}

/// Errors from the calendar collaborator.
#[derive(Debug, thiserror::Error)]
pub enum CalendarError {
    #[error("Calendar request failed: {0}")]
    Request(String),

    #[error("Calendar service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Calendar response shape unexpected: {0}")]
    ResponseShape(String),
}

/// Create-one-event capability.
#[async_trait]
pub trait CalendarProvider: Send + Sync {
    /// Create one event, returning the provider's event identifier.
    async fn create_event(&self, spec: &EventSpec) -> Result<String, CalendarError>;
}

// ═══════════════════════════════════════════════════════════
// Stub provider
// ═══════════════════════════════════════════════════════════

/// In-memory calendar used when no provider credentials are configured.
pub struct StubCalendar {
    events: Mutex<Vec<EventSpec>>,
}

impl StubCalendar {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
        }
    }

    /// Events created so far, in creation order.
    pub fn created(&self) -> Vec<EventSpec> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl Default for StubCalendar {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CalendarProvider for StubCalendar {
    async fn create_event(&self, spec: &EventSpec) -> Result<String, CalendarError> {
        let mut events = self
            .events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        events.push(spec.clone());
        let id = format!("mock_event_{}", events.len());
        tracing::info!(event_id = %id, summary = %spec.summary, "Stub calendar event created");
        Ok(id)
    }
}

// ═══════════════════════════════════════════════════════════
// Google Calendar provider
// ═══════════════════════════════════════════════════════════

/// HTTP client for the Google Calendar v3 events endpoint.
pub struct GoogleCalendarClient {
    base_url: String,
    access_token: String,
    client: reqwest::Client,
}

impl GoogleCalendarClient {
    pub fn new(base_url: &str, access_token: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token: access_token.to_string(),
            client,
        }
    }

    fn event_body(spec: &EventSpec) -> serde_json::Value {
        let overrides: Vec<serde_json::Value> = spec
            .reminder_overrides
            .iter()
            .map(|r| json!({ "method": r.method, "minutes": r.minutes }))
            .collect();

        json!({
            "summary": spec.summary,
            "description": spec.description,
            "start": { "dateTime": spec.start_time, "timeZone": EVENT_TIME_ZONE },
            "end": { "dateTime": spec.end_time, "timeZone": EVENT_TIME_ZONE },
            "reminders": { "useDefault": false, "overrides": overrides },
            "colorId": spec.color_id,
        })
    }
}

#[async_trait]
impl CalendarProvider for GoogleCalendarClient {
    async fn create_event(&self, spec: &EventSpec) -> Result<String, CalendarError> {
        let url = format!("{}/calendars/primary/events", self.base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(&Self::event_body(spec))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CalendarError::Request(format!(
                        "Request timed out after {DEFAULT_TIMEOUT_SECS}s"
                    ))
                } else {
                    CalendarError::Request(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CalendarError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: serde_json::Value = response
            .json()
            .await
            .map_err(|e| CalendarError::ResponseShape(e.to_string()))?;

        parsed["id"]
            .as_str()
            .map(|id| id.to_string())
            .ok_or_else(|| CalendarError::ResponseShape("no event id in response".into()))
    }
}
