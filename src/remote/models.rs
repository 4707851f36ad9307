use crate::error::AttendanceResult;
use crate::records::{AttendanceRecord, TimeOfDay, format_record_date, parse_record_date};
use serde::{Deserialize, Serialize};

/// A record as the script returns it. The script spells the time fields
/// `checkinTime`/`checkoutTime`; the local spelling is accepted as well.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RemoteRecord {
    pub id: String,
    /// Calendar event backing the record
    #[serde(default)]
    pub event_id: Option<String>,
    pub date: String,
    #[serde(default)]
    pub title: String,
    #[serde(alias = "checkinTime")]
    pub clock_in_time: String,
    #[serde(default, alias = "checkoutTime")]
    pub clock_out_time: Option<String>,
}

impl RemoteRecord {
    /// Map into a local record, validating fields and computing hours
    pub fn into_record(self) -> AttendanceResult<AttendanceRecord> {
        let clock_in: TimeOfDay = self.clock_in_time.parse()?;
        let clock_out = self
            .clock_out_time
            .as_deref()
            .filter(|t| !t.is_empty())
            .map(str::parse::<TimeOfDay>)
            .transpose()?;

        let mut record = AttendanceRecord {
            id: self.id,
            date: format_record_date(parse_record_date(&self.date)?),
            title: self.title,
            clock_in_time: clock_in.to_string(),
            clock_out_time: clock_out.map(|t| t.to_string()),
            working_hours: 0.0,
        };
        record.recompute_hours()?;
        Ok(record)
    }
}

/// Body of every POST to the script, tagged by `action`
#[derive(Debug, Serialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum ScriptRequest {
    CheckIn {
        title: String,
    },
    #[serde(rename_all = "camelCase")]
    CheckOut {
        title: String,
        checkout_time: String,
        event_id: String,
    },
}

/// `getRecords` body. Older deployments send only `records`, so a missing
/// `success` is not a failure.
#[derive(Debug, Deserialize)]
pub struct RecordsResponse {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub records: Vec<RemoteRecord>,
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CheckInResponse {
    #[serde(default)]
    pub success: bool,
    pub record: Option<RemoteRecord>,
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AckResponse {
    #[serde(default)]
    pub success: bool,
    pub message: Option<String>,
}
