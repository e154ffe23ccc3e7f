pub mod provider;
pub mod publisher;

pub use provider::{
    CalendarError, CalendarProvider, EventSpec, GoogleCalendarClient, ReminderOverride,
    StubCalendar,
};
pub use publisher::publish;
