use super::{ICS_DATE_TIME, UID_SUFFIX};
use crate::error::AttendanceResult;
use crate::records::AttendanceRecord;
use icalendar::{Calendar, Component, EventLike};

/// Render closed records as a calendar, one VEVENT each. Open records are
/// skipped. Times are written as floating local date-times.
pub fn to_ics(records: &[AttendanceRecord]) -> AttendanceResult<String> {
    let mut cal = Calendar::new();
    cal.name("Attendance");

    for record in records {
        let Some((start, end)) = record.span()? else {
            continue;
        };

        let mut event = icalendar::Event::new();
        event.uid(&format!("{}{}", record.id, UID_SUFFIX));
        if !record.title.is_empty() {
            event.summary(&record.title);
        }
        event.description(&format!("Working hours: {:.2}h", record.working_hours));
        event.add_property("DTSTART", start.format(ICS_DATE_TIME).to_string());
        event.add_property("DTEND", end.format(ICS_DATE_TIME).to_string());

        cal.push(event.done());
    }

    Ok(cal.done().to_string())
}
