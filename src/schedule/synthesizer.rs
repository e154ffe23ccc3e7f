//! Schedule synthesis: AI-generated schedule first, deterministic fallback
//! when the AI path errors, returns non-JSON, or yields nothing usable.

use chrono::NaiveDate;

use crate::gateway::{classify, extract_array, ExtractionGateway, ParseOutcome};
use crate::models::{Medication, ScheduleEvent};

/// Accepted events plus the count of elements dropped by the shape check.
///
/// Dropping malformed entries is expected behavior, not an error; the count
/// makes the fallback decision observable in logs.
#[derive(Debug)]
pub struct ParsedSchedule {
    pub events: Vec<ScheduleEvent>,
    pub dropped: usize,
}

/// Parse a raw schedule response into accepted events.
///
/// The response is scanned for the first `[` … last `]` substring. Elements
/// are accepted only if they decode as an event record with a `summary`
/// field; the rest are dropped and counted. `None` means no JSON array
/// could be extracted at all.
pub fn parse_schedule(raw: &str) -> Option<ParsedSchedule> {
    match extract_array(raw) {
        ParseOutcome::Parsed(values) => {
            let total = values.len();
            let events: Vec<ScheduleEvent> = values
                .into_iter()
                .filter_map(|value| serde_json::from_value(value).ok())
                .collect();
            let dropped = total - events.len();
            Some(ParsedSchedule { events, dropped })
        }
        ParseOutcome::Unparseable(_) => None,
    }
}

/// Convert a medication list into calendar-event descriptors.
///
/// Empty input returns immediately without touching the collaborator. The
/// primary path asks the gateway for a schedule; any failure, non-JSON
/// response, or zero accepted events falls back to the deterministic
/// generator, which always produces a well-formed schedule.
pub async fn synthesize(
    gateway: &ExtractionGateway,
    medications: &[Medication],
    today: NaiveDate,
) -> Vec<ScheduleEvent> {
    if medications.is_empty() {
        return Vec::new();
    }

    let raw = match gateway.schedule(medications, today).await {
        Ok(raw) => raw,
        Err(e) => {
            let kind = classify(&e);
            tracing::warn!(
                kind = kind.as_str(),
                error = %e,
                "Schedule generation failed, using fallback schedule"
            );
            return super::fallback_schedule(medications, today);
        }
    };

    match parse_schedule(&raw) {
        Some(parsed) if !parsed.events.is_empty() => {
            if parsed.dropped > 0 {
                tracing::warn!(
                    accepted = parsed.events.len(),
                    dropped = parsed.dropped,
                    "Dropped malformed entries from generated schedule"
                );
            }
            parsed.events
        }
        Some(parsed) => {
            tracing::warn!(
                dropped = parsed.dropped,
                "Generated schedule had no usable events, using fallback schedule"
            );
            super::fallback_schedule(medications, today)
        }
        None => {
            tracing::warn!(
                response_len = raw.len(),
                "Schedule response was not a JSON array, using fallback schedule"
            );
            super::fallback_schedule(medications, today)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::MockCompletionClient;
    use std::sync::Arc;

    fn med(name: &str, frequency: &str) -> Medication {
        Medication {
            name: name.into(),
            dosage: "500mg".into(),
            frequency: frequency.into(),
            ..Medication::default()
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    // ── parse_schedule ──────────────────────────────────────

    #[test]
    fn parse_accepts_events_with_summary() {
        let parsed = parse_schedule(
            r#"[{"summary": "Take Metformin", "start_time": "2025-06-01T08:00:00"}]"#,
        )
        .unwrap();
        assert_eq!(parsed.events.len(), 1);
        assert_eq!(parsed.dropped, 0);
        assert_eq!(parsed.events[0].summary, "Take Metformin");
    }

    #[test]
    fn parse_normalizes_missing_fields() {
        let parsed = parse_schedule(r#"[{"summary": "Take Metformin"}]"#).unwrap();
        let event = &parsed.events[0];
        assert_eq!(event.description, "");
        assert_eq!(event.start_time, "");
        assert_eq!(event.end_time, "");
        assert_eq!(event.reminders, vec![crate::models::ReminderKind::Popup]);
        assert_eq!(event.color_id, "11");
    }

    #[test]
    fn parse_drops_and_counts_malformed_elements() {
        let parsed = parse_schedule(
            r#"[{"summary": "ok"}, {"no_summary": true}, "just a string", {"summary": "also ok"}]"#,
        )
        .unwrap();
        assert_eq!(parsed.events.len(), 2);
        assert_eq!(parsed.dropped, 2);
    }

    #[test]
    fn parse_tolerates_wrapper_prose() {
        let parsed =
            parse_schedule("Here is your schedule:\n[{\"summary\": \"Take X\"}]\nEnjoy!").unwrap();
        assert_eq!(parsed.events.len(), 1);
    }

    #[test]
    fn parse_rejects_non_array_text() {
        assert!(parse_schedule("I cannot produce a schedule today.").is_none());
    }

    // ── synthesize ──────────────────────────────────────────

    #[tokio::test]
    async fn empty_medications_skip_the_collaborator() {
        let client = Arc::new(MockCompletionClient::replying("[]"));
        let gateway = ExtractionGateway::new(client.clone());
        let events = synthesize(&gateway, &[], today()).await;
        assert!(events.is_empty());
        assert_eq!(client.calls(), 0);
    }

    #[tokio::test]
    async fn primary_path_uses_generated_events() {
        let gateway = ExtractionGateway::new(Arc::new(MockCompletionClient::replying(
            r#"[{"summary": "Take Metformin with breakfast",
                 "start_time": "2025-06-01T07:30:00",
                 "end_time": "2025-06-01T07:45:00"}]"#,
        )));
        let events = synthesize(&gateway, &[med("Metformin", "daily")], today()).await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].summary, "Take Metformin with breakfast");
    }

    #[tokio::test]
    async fn completion_error_falls_back_deterministically() {
        let gateway = ExtractionGateway::new(Arc::new(MockCompletionClient::failing("429")));
        let events = synthesize(&gateway, &[med("Metformin", "twice daily")], today()).await;
        assert_eq!(events.len(), 14);
        assert_eq!(events[0].summary, "Take Metformin");
    }

    #[tokio::test]
    async fn non_json_response_falls_back() {
        let gateway = ExtractionGateway::new(Arc::new(MockCompletionClient::replying(
            "Sorry, I can't help with scheduling.",
        )));
        let events = synthesize(&gateway, &[med("Lisinopril", "once daily")], today()).await;
        assert_eq!(events.len(), 7);
    }

    #[tokio::test]
    async fn all_elements_dropped_falls_back() {
        let gateway = ExtractionGateway::new(Arc::new(MockCompletionClient::replying(
            r#"[{"title": "missing summary"}, 42]"#,
        )));
        let events = synthesize(&gateway, &[med("Lisinopril", "once daily")], today()).await;
        assert_eq!(events.len(), 7);
        assert!(events[0].start_time.ends_with("T08:00:00"));
    }

    #[tokio::test]
    async fn partial_drops_keep_accepted_events() {
        let gateway = ExtractionGateway::new(Arc::new(MockCompletionClient::replying(
            r#"[{"summary": "Take A"}, {"bogus": 1}]"#,
        )));
        let events = synthesize(&gateway, &[med("A", "daily")], today()).await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].summary, "Take A");
    }
}
