//! Pushing a synthesized schedule through the calendar provider.

use crate::models::{PublishResult, PublishedEvent, ScheduleEvent};
use crate::models::schedule::HEALTH_EVENT_COLOR;

use super::provider::{CalendarProvider, EventSpec, ReminderOverride};

/// Minutes before the event for the injected popup reminder.
const POPUP_MINUTES: u32 = 10;
/// Minutes before the event for the injected email reminder.
const EMAIL_MINUTES: u32 = 60;

/// Publish events in order, one create call each.
///
/// The synthesizer's reminder hints are advisory: every published event
/// gets the fixed 10-minute popup and 60-minute email overrides, plus the
/// fixed health color. The first failed create aborts the run; events
/// already created are NOT rolled back, and the result reports the partial
/// count alongside the captured error.
pub async fn publish(provider: &dyn CalendarProvider, events: &[ScheduleEvent]) -> PublishResult {
    let mut published = Vec::with_capacity(events.len());

    for event in events {
        let spec = medication_event_spec(event);
        match provider.create_event(&spec).await {
            Ok(id) => {
                published.push(PublishedEvent {
                    id,
                    summary: event.summary.clone(),
                    start_time: event.start_time.clone(),
                    status: "created".to_string(),
                });
            }
            Err(e) => {
                tracing::error!(
                    created = published.len(),
                    remaining = events.len() - published.len(),
                    error = %e,
                    "Calendar publish aborted mid-sequence"
                );
                return PublishResult {
                    success: false,
                    events_created: published.len(),
                    events: published,
                    error: Some(e.to_string()),
                };
            }
        }
    }

    tracing::info!(events_created = published.len(), "Calendar publish complete");
    PublishResult {
        success: true,
        events_created: published.len(),
        events: published,
        error: None,
    }
}

fn medication_event_spec(event: &ScheduleEvent) -> EventSpec {
    EventSpec {
        summary: event.summary.clone(),
        description: event.description.clone(),
        start_time: event.start_time.clone(),
        end_time: event.end_time.clone(),
        reminder_overrides: vec![
            ReminderOverride {
                method: "popup",
                minutes: POPUP_MINUTES,
            },
            ReminderOverride {
                method: "email",
                minutes: EMAIL_MINUTES,
            },
        ],
        color_id: HEALTH_EVENT_COLOR.to_string(),
    }
}
