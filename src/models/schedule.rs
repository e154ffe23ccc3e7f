use serde::{Deserialize, Serialize};

/// Calendar color id used for medication-derived events.
pub const HEALTH_EVENT_COLOR: &str = "11";

/// Reminder channels a schedule event may ask for.
///
/// Advisory only: the publisher injects its own fixed reminder overrides at
/// event-creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderKind {
    Popup,
    Email,
}

/// One calendar-event descriptor produced by the schedule synthesizer.
///
/// Transient: handed straight to the calendar publisher, never persisted in
/// the health record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEvent {
    pub summary: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub end_time: String,
    #[serde(default = "default_reminders")]
    pub reminders: Vec<ReminderKind>,
    #[serde(default = "default_color", rename = "colorId")]
    pub color_id: String,
}

fn default_reminders() -> Vec<ReminderKind> {
    vec![ReminderKind::Popup]
}

fn default_color() -> String {
    HEALTH_EVENT_COLOR.to_string()
}

/// Record of one event the calendar provider accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishedEvent {
    pub id: String,
    pub summary: String,
    pub start_time: String,
    pub status: String,
}

/// Outcome of pushing a schedule to the calendar provider.
///
/// `success=false` with a non-zero `events_created` is a partial failure:
/// the events counted were created and are NOT rolled back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishResult {
    pub success: bool,
    pub events_created: usize,
    pub events: Vec<PublishedEvent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
