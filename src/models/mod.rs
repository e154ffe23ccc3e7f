pub mod facts;
pub mod record;
pub mod schedule;

pub use facts::{Appointment, ExtractedFacts, HealthMetric, Medication, Recommendation};
pub use record::{ChatEntry, Document, HealthRecord};
pub use schedule::{PublishResult, PublishedEvent, ReminderKind, ScheduleEvent};
