use super::UID_SUFFIX;
use crate::error::{AttendanceError, AttendanceResult};
use crate::records::{AttendanceRecord, TimeOfDay, format_record_date};
use chrono::{Local, NaiveDateTime, NaiveTime};
use icalendar::parser::{Component, read_calendar, unfold};
use icalendar::{CalendarDateTime, DatePerhapsTime};

/// Parse calendar text into records, one per VEVENT.
///
/// Any event without a usable DTSTART fails the whole parse, so callers never
/// see a partial result. Events without DTEND come back as open records.
pub fn from_ics(content: &str) -> AttendanceResult<Vec<AttendanceRecord>> {
    let unfolded = unfold(content);
    let calendar = read_calendar(&unfolded).map_err(|e| AttendanceError::IcsParse(e.to_string()))?;

    calendar
        .components
        .iter()
        .filter(|c| c.name == "VEVENT")
        .enumerate()
        .map(|(idx, vevent)| to_record(idx, vevent))
        .collect()
}

fn to_record(idx: usize, vevent: &Component<'_>) -> AttendanceResult<AttendanceRecord> {
    let id = vevent
        .find_prop("UID")
        .map(|p| p.val.to_string())
        .map(|uid| uid.strip_suffix(UID_SUFFIX).map(str::to_string).unwrap_or(uid))
        .filter(|uid| !uid.is_empty())
        .unwrap_or_else(|| format!("ical-{}", idx));

    let title = vevent
        .find_prop("SUMMARY")
        .map(|p| unescape_text(p.val.as_ref()))
        .unwrap_or_default();

    let start = vevent
        .find_prop("DTSTART")
        .ok_or_else(|| AttendanceError::IcsParse(format!("event {} has no DTSTART", id)))
        .and_then(|prop| local_date_time(&id, DatePerhapsTime::try_from(prop).ok()))?;

    let end = vevent
        .find_prop("DTEND")
        .map(|prop| local_date_time(&id, DatePerhapsTime::try_from(prop).ok()))
        .transpose()?;

    let mut record = AttendanceRecord {
        id,
        date: format_record_date(start.date()),
        title,
        clock_in_time: clock_reading(start.time()),
        clock_out_time: end.map(|e| clock_reading(e.time())),
        working_hours: 0.0,
    };
    record.recompute_hours()?;
    Ok(record)
}

/// Wall-clock time of an event boundary. UTC instants are shown in the local
/// zone; zoned and floating values are taken as written.
fn local_date_time(id: &str, value: Option<DatePerhapsTime>) -> AttendanceResult<NaiveDateTime> {
    match value {
        Some(DatePerhapsTime::DateTime(CalendarDateTime::Utc(dt))) => {
            Ok(dt.with_timezone(&Local).naive_local())
        }
        Some(DatePerhapsTime::DateTime(CalendarDateTime::Floating(naive))) => Ok(naive),
        Some(DatePerhapsTime::DateTime(CalendarDateTime::WithTimezone { date_time, .. })) => {
            Ok(date_time)
        }
        Some(DatePerhapsTime::Date(date)) => Ok(date.and_time(NaiveTime::MIN)),
        None => Err(AttendanceError::IcsParse(format!(
            "event {} has an unreadable date-time",
            id
        ))),
    }
}

fn clock_reading(time: NaiveTime) -> String {
    TimeOfDay::from_naive(time).to_string()
}

fn unescape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') | Some('N') => out.push('\n'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}
