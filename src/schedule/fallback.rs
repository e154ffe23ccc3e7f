//! Deterministic schedule generation, used when the AI path is degraded.
//!
//! Fail-safe default: rate-limited, misconfigured, or malformed upstream
//! output still yields a basic reminder cadence instead of no schedule.

use chrono::{Days, NaiveDate, NaiveTime};

use crate::models::{Medication, ReminderKind, ScheduleEvent};
use crate::models::schedule::HEALTH_EVENT_COLOR;

/// Days of reminders generated per medication.
const SCHEDULE_DAYS: u64 = 7;
/// Reminder duration in minutes.
const REMINDER_MINUTES: i64 = 15;

/// Frequencies that get a second daily reminder, compared lowercased.
const TWICE_DAILY_FREQUENCIES: &[&str] = &["twice daily", "bid", "2x daily"];

/// Build the deterministic 7-day reminder schedule.
///
/// Per medication, per day starting `today`: one 08:00 event, plus a 20:00
/// event when the frequency reads as twice-daily. Between 7 and 14 events
/// per medication; never fails, empty input yields an empty schedule.
pub fn fallback_schedule(medications: &[Medication], today: NaiveDate) -> Vec<ScheduleEvent> {
    let morning = NaiveTime::from_hms_opt(8, 0, 0).expect("valid reminder time");
    let evening = NaiveTime::from_hms_opt(20, 0, 0).expect("valid reminder time");

    let mut schedule = Vec::new();
    for med in medications {
        let twice_daily =
            TWICE_DAILY_FREQUENCIES.contains(&med.frequency.to_lowercase().as_str());

        for day in 0..SCHEDULE_DAYS {
            let date = today
                .checked_add_days(Days::new(day))
                .expect("date within calendar range");

            schedule.push(reminder_event(med, date, morning));
            if twice_daily {
                schedule.push(reminder_event(med, date, evening));
            }
        }
    }
    schedule
}

fn reminder_event(med: &Medication, date: NaiveDate, time: NaiveTime) -> ScheduleEvent {
    let name = if med.name.is_empty() {
        "Medication"
    } else {
        &med.name
    };
    let dosage = if med.dosage.is_empty() {
        "As prescribed"
    } else {
        &med.dosage
    };

    let start = date.and_time(time);
    let end = start + chrono::Duration::minutes(REMINDER_MINUTES);

    ScheduleEvent {
        summary: format!("Take {name}"),
        description: format!("Dosage: {dosage}\nInstructions: {}", med.instructions),
        start_time: start.format("%Y-%m-%dT%H:%M:%S").to_string(),
        end_time: end.format("%Y-%m-%dT%H:%M:%S").to_string(),
        reminders: vec![ReminderKind::Popup],
        color_id: HEALTH_EVENT_COLOR.to_string(),
    }
}
