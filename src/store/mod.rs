//! Storage port for attendance records.
//!
//! Records live in a key-value store: each key holds the full JSON list for
//! its scope. With [`StorageScope::All`] there is a single key; with
//! [`StorageScope::Month`] every calendar month gets its own key.
//!
//! All read-modify-write cycles go through [`RecordStore::transact`], which
//! implementations must run atomically against other writers of the same key.

pub mod file;
pub mod memory;

use crate::records::{AttendanceRecord, YearMonth};
use anyhow::Result;
use serde::{Deserialize, Serialize};

pub use file::FileStore;
pub use memory::MemoryStore;

pub const BASE_KEY: &str = "attendanceRecords";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageScope {
    #[default]
    All,
    Month,
}

impl StorageScope {
    /// Store key holding records dated in `month`
    pub fn key_for(&self, month: YearMonth) -> String {
        match self {
            StorageScope::All => BASE_KEY.to_string(),
            StorageScope::Month => format!("{}-{}", BASE_KEY, month),
        }
    }
}

/// Returns true if `key` names a record list (as opposed to stray files)
pub fn is_record_key(key: &str) -> bool {
    key == BASE_KEY
        || key
            .strip_prefix(BASE_KEY)
            .and_then(|rest| rest.strip_prefix('-'))
            .is_some_and(|month| month.parse::<YearMonth>().is_ok())
}

pub trait RecordStore {
    /// Keys currently holding data, sorted
    fn keys(&self) -> Result<Vec<String>>;

    /// Snapshot of one key; a missing key reads as empty
    fn load(&self, key: &str) -> Result<Vec<AttendanceRecord>>;

    /// Run `f` on the records under `key` while holding that key exclusively.
    /// The list is written back only if `f` succeeds.
    fn transact<R, F>(&self, key: &str, f: F) -> Result<R>
    where
        F: FnOnce(&mut Vec<AttendanceRecord>) -> Result<R>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_per_scope() {
        let month: YearMonth = "2026-10".parse().unwrap();
        assert_eq!(StorageScope::All.key_for(month), "attendanceRecords");
        assert_eq!(
            StorageScope::Month.key_for(month),
            "attendanceRecords-2026-10"
        );
    }

    #[test]
    fn test_is_record_key() {
        assert!(is_record_key("attendanceRecords"));
        assert!(is_record_key("attendanceRecords-2026-10"));
        assert!(!is_record_key("attendanceRecords-backup"));
        assert!(!is_record_key("config"));
    }
}
