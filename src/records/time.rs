use crate::error::{AttendanceError, AttendanceResult};
use chrono::{Datelike, NaiveDate, NaiveTime, Timelike};
use std::fmt;
use std::str::FromStr;

/// Date format used by stored records (`2026/10/18`)
pub const RECORD_DATE_FORMAT: &str = "%Y/%m/%d";

/// A validated `HH:MM` or `HH:MM:SS` clock reading.
///
/// Remembers whether seconds were given so that values read from the store
/// are written back in the same shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TimeOfDay {
    time: NaiveTime,
    with_seconds: bool,
}

impl TimeOfDay {
    pub fn from_naive(time: NaiveTime) -> Self {
        Self {
            time: time.with_nanosecond(0).unwrap_or(time),
            with_seconds: true,
        }
    }

    pub fn naive(&self) -> NaiveTime {
        self.time
    }

    /// Minutes since midnight, seconds contributing fractionally
    pub fn minutes_since_midnight(&self) -> f64 {
        f64::from(self.time.num_seconds_from_midnight()) / 60.0
    }
}

impl FromStr for TimeOfDay {
    type Err = AttendanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let with_seconds = match s.matches(':').count() {
            1 => false,
            2 => true,
            _ => return Err(AttendanceError::InvalidTime(s.to_string())),
        };
        let format = if with_seconds { "%H:%M:%S" } else { "%H:%M" };
        let time = NaiveTime::parse_from_str(s, format)
            .map_err(|_| AttendanceError::InvalidTime(s.to_string()))?;
        Ok(Self { time, with_seconds })
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.with_seconds {
            write!(f, "{}", self.time.format("%H:%M:%S"))
        } else {
            write!(f, "{}", self.time.format("%H:%M"))
        }
    }
}

pub fn parse_record_date(s: &str) -> AttendanceResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), RECORD_DATE_FORMAT)
        .map_err(|_| AttendanceError::InvalidDate(s.to_string()))
}

pub fn format_record_date(date: NaiveDate) -> String {
    date.format(RECORD_DATE_FORMAT).to_string()
}

/// Calendar month used for monthly views and month-scoped storage keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    pub fn previous(&self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }
}

impl FromStr for YearMonth {
    type Err = AttendanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AttendanceError::InvalidMonth(s.to_string());
        let (year, month) = s.trim().split_once(['-', '/']).ok_or_else(invalid)?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        if !(1..=12).contains(&month) {
            return Err(invalid());
        }
        Ok(Self { year, month })
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}
