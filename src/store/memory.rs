use crate::records::AttendanceRecord;
use crate::store::RecordStore;
use anyhow::{Result, anyhow};
use std::collections::BTreeMap;
use std::sync::Mutex;

/// In-process store, used to exercise the repository without touching disk
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, Vec<AttendanceRecord>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for MemoryStore {
    fn keys(&self) -> Result<Vec<String>> {
        let entries = self.entries.lock().map_err(|_| anyhow!("store poisoned"))?;
        Ok(entries.keys().cloned().collect())
    }

    fn load(&self, key: &str) -> Result<Vec<AttendanceRecord>> {
        let entries = self.entries.lock().map_err(|_| anyhow!("store poisoned"))?;
        Ok(entries.get(key).cloned().unwrap_or_default())
    }

    fn transact<R, F>(&self, key: &str, f: F) -> Result<R>
    where
        F: FnOnce(&mut Vec<AttendanceRecord>) -> Result<R>,
    {
        let mut entries = self.entries.lock().map_err(|_| anyhow!("store poisoned"))?;
        let mut records = entries.get(key).cloned().unwrap_or_default();
        let result = f(&mut records)?;
        entries.insert(key.to_string(), records);
        Ok(result)
    }
}
