pub mod fallback;
pub mod synthesizer;

pub use fallback::fallback_schedule;
pub use synthesizer::{parse_schedule, synthesize, ParsedSchedule};
