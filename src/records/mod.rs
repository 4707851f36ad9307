pub mod duration;
pub mod merge;
pub mod time;

use crate::error::{AttendanceError, AttendanceResult};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

pub use duration::{compute_working_hours, working_hours};
pub use merge::{MergePlan, merge, plan_merge};
pub use time::{TimeOfDay, YearMonth, format_record_date, parse_record_date};

/// One clock-in/clock-out span, stored in the same camelCase shape the web
/// client keeps in local storage.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub id: String,
    /// `YYYY/MM/DD` of the clock-in
    pub date: String,
    #[serde(default)]
    pub title: String,
    pub clock_in_time: String,
    pub clock_out_time: Option<String>,
    #[serde(default)]
    pub working_hours: f64,
}

/// Field changes for a manual edit; `None` leaves the field as is
#[derive(Debug, Default, Clone)]
pub struct RecordEdit {
    pub date: Option<String>,
    pub title: Option<String>,
    pub clock_in_time: Option<String>,
    pub clock_out_time: Option<String>,
}

impl AttendanceRecord {
    /// A fresh open record starting at `at`
    pub fn open(title: &str, at: NaiveDateTime) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            date: format_record_date(at.date()),
            title: title.to_string(),
            clock_in_time: TimeOfDay::from_naive(at.time()).to_string(),
            clock_out_time: None,
            working_hours: 0.0,
        }
    }

    pub fn is_open(&self) -> bool {
        self.clock_out_time.is_none()
    }

    pub fn naive_date(&self) -> AttendanceResult<NaiveDate> {
        parse_record_date(&self.date)
    }

    pub fn month(&self) -> AttendanceResult<YearMonth> {
        Ok(YearMonth::of(self.naive_date()?))
    }

    pub fn clock_in(&self) -> AttendanceResult<TimeOfDay> {
        self.clock_in_time.parse()
    }

    pub fn clock_out(&self) -> AttendanceResult<Option<TimeOfDay>> {
        self.clock_out_time.as_deref().map(str::parse::<TimeOfDay>).transpose()
    }

    /// Close the record and derive its working hours
    pub fn close(&mut self, clock_out: TimeOfDay) -> AttendanceResult<()> {
        self.clock_out_time = Some(clock_out.to_string());
        self.recompute_hours()
    }

    /// Re-derive `working_hours` from the clock readings
    pub fn recompute_hours(&mut self) -> AttendanceResult<()> {
        self.working_hours = match self.clock_out()? {
            Some(out) => working_hours(self.clock_in()?, out),
            None => 0.0,
        };
        Ok(())
    }

    /// Apply a manual edit. Times are validated, hours recomputed, and a
    /// closed record cannot be turned back into an open one.
    pub fn apply(&mut self, edit: RecordEdit) -> AttendanceResult<()> {
        let mut updated = self.clone();
        if let Some(date) = edit.date {
            updated.date = format_record_date(parse_record_date(&date)?);
        }
        if let Some(title) = edit.title {
            updated.title = title;
        }
        if let Some(clock_in) = edit.clock_in_time {
            updated.clock_in_time = clock_in.parse::<TimeOfDay>()?.to_string();
        }
        if let Some(clock_out) = edit.clock_out_time {
            if clock_out.trim().is_empty() {
                if !self.is_open() {
                    return Err(AttendanceError::CannotReopen(self.id.clone()));
                }
            } else {
                updated.clock_out_time = Some(clock_out.parse::<TimeOfDay>()?.to_string());
            }
        }
        updated.recompute_hours()?;
        *self = updated;
        Ok(())
    }

    /// Start and end as local date-times. The end rolls to the next day when
    /// the clock-out reads earlier than the clock-in.
    pub fn span(&self) -> AttendanceResult<Option<(NaiveDateTime, NaiveDateTime)>> {
        let Some(out) = self.clock_out()? else {
            return Ok(None);
        };
        let date = self.naive_date()?;
        let start = date.and_time(self.clock_in()?.naive());
        let mut end = date.and_time(out.naive());
        if end < start {
            end += Duration::days(1);
        }
        Ok(Some((start, end)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(date: &str, time: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(&format!("{date} {time}"), "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn test_open_record_shape() {
        let record = AttendanceRecord::open("Design review", at("2026-10-18", "09:05:07"));
        assert_eq!(record.date, "2026/10/18");
        assert_eq!(record.clock_in_time, "09:05:07");
        assert!(record.is_open());
        assert_eq!(record.working_hours, 0.0);
        assert!(!record.id.is_empty());
    }

    #[test]
    fn test_close_computes_hours() {
        let mut record = AttendanceRecord::open("Shift", at("2026-10-18", "22:00:00"));
        record.close("06:00:00".parse().unwrap()).unwrap();
        assert_eq!(record.working_hours, 8.0);
        assert!(!record.is_open());
    }

    #[test]
    fn test_edit_recomputes_hours() {
        let mut record = AttendanceRecord::open("Shift", at("2026-10-18", "09:00:00"));
        record.close("17:00:00".parse().unwrap()).unwrap();
        record
            .apply(RecordEdit {
                clock_in_time: Some("08:00".to_string()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(record.working_hours, 9.0);
        assert_eq!(record.clock_in_time, "08:00");
    }

    #[test]
    fn test_edit_cannot_reopen() {
        let mut record = AttendanceRecord::open("Shift", at("2026-10-18", "09:00:00"));
        record.close("17:00:00".parse().unwrap()).unwrap();
        let err = record
            .apply(RecordEdit {
                clock_out_time: Some(String::new()),
                ..Default::default()
            })
            .unwrap_err();
        assert!(matches!(err, AttendanceError::CannotReopen(_)));
        assert_eq!(record.clock_out_time.as_deref(), Some("17:00:00"));
    }

    #[test]
    fn test_invalid_edit_leaves_record_untouched() {
        let mut record = AttendanceRecord::open("Shift", at("2026-10-18", "09:00:00"));
        let before = record.clone();
        let result = record.apply(RecordEdit {
            title: Some("Changed".to_string()),
            clock_out_time: Some("late".to_string()),
            ..Default::default()
        });
        assert!(result.is_err());
        assert_eq!(record, before);
    }

    #[test]
    fn test_span_rolls_over_midnight() {
        let mut record = AttendanceRecord::open("Night", at("2026-10-31", "22:00:00"));
        record.close("02:30:00".parse().unwrap()).unwrap();
        let (start, end) = record.span().unwrap().unwrap();
        assert_eq!(start, at("2026-10-31", "22:00:00"));
        assert_eq!(end, at("2026-11-01", "02:30:00"));
    }

    #[test]
    fn test_deserialize_web_client_shape() {
        let json = serde_json::json!({
            "id": "abc",
            "date": "2026/10/18",
            "title": "",
            "clockInTime": "09:00:00",
            "clockOutTime": null,
            "workingHours": 0
        });
        let record: AttendanceRecord = serde_json::from_value(json).unwrap();
        assert!(record.is_open());
        assert_eq!(record.clock_in_time, "09:00:00");
    }
}
