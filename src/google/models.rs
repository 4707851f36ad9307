use crate::error::AttendanceResult;
use crate::records::AttendanceRecord;
use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Summary used when a record has no title
pub const DEFAULT_SUMMARY: &str = "Work";

/// Google Calendar event resource (the fields we write)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GoogleEvent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub summary: String,
    #[serde(default)]
    pub description: String,
    pub start: EventDateTime,
    pub end: EventDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EventDateTime {
    #[serde(rename = "dateTime")]
    pub date_time: String, // local, no offset
    #[serde(rename = "timeZone")]
    pub time_zone: String,
}

impl EventDateTime {
    pub fn local(dt: NaiveDateTime, tz: &str) -> Self {
        Self {
            date_time: dt.format("%Y-%m-%dT%H:%M:%S").to_string(),
            time_zone: tz.to_string(),
        }
    }
}

impl GoogleEvent {
    /// Event for a closed record; `None` for an open one
    pub fn from_record(record: &AttendanceRecord, time_zone: &str) -> AttendanceResult<Option<Self>> {
        let Some((start, end)) = record.span()? else {
            return Ok(None);
        };

        let summary = if record.title.is_empty() {
            DEFAULT_SUMMARY.to_string()
        } else {
            record.title.clone()
        };

        Ok(Some(Self {
            id: None,
            summary,
            description: format!(
                "Working hours: {:.2}h\nID: {}",
                record.working_hours, record.id
            ),
            start: EventDateTime::local(start, time_zone),
            end: EventDateTime::local(end, time_zone),
        }))
    }
}

/// Cached OAuth tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenSet {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl TokenSet {
    /// True once the access token is within a minute of expiring
    pub fn needs_refresh(&self, now: DateTime<Utc>) -> bool {
        self.expires_at
            .is_some_and(|expires| expires - Duration::seconds(60) <= now)
    }
}
