//! iCalendar (`.ics`) export and import of attendance records.

pub mod export;
pub mod import;

pub use export::to_ics;
pub use import::from_ics;

/// Suffix appended to record ids to form event UIDs
pub const UID_SUFFIX: &str = "@attendance-tracker";

const ICS_DATE_TIME: &str = "%Y%m%dT%H%M%S";
