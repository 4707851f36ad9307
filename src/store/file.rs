use crate::records::AttendanceRecord;
use crate::store::{RecordStore, is_record_key};
use anyhow::{Context, Result};
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

/// JSON-file store: `<dir>/<key>.json`, guarded by `<dir>/<key>.lock`
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    pub fn data_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    fn lock_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.lock", key))
    }

    fn open_lock(&self, key: &str) -> Result<File> {
        fs::create_dir_all(&self.dir)?;
        OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(self.lock_path(key))
            .context("Failed to open lock file")
    }

    fn read(path: &Path) -> Result<Vec<AttendanceRecord>> {
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(path).context("Failed to read records file")?;

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse records JSON in {}", path.display()))
    }

    fn write(path: &Path, records: &[AttendanceRecord]) -> Result<()> {
        let content =
            serde_json::to_string_pretty(records).context("Failed to serialize records")?;

        // Temp file + rename so a crash never leaves a half-written list
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, content)?;
        fs::rename(&temp_path, path)?;

        Ok(())
    }
}

impl RecordStore for FileStore {
    fn keys(&self) -> Result<Vec<String>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }
        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.dir).context("Failed to list state directory")? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str())
                && is_record_key(stem)
            {
                keys.push(stem.to_string());
            }
        }
        keys.sort();
        Ok(keys)
    }

    fn load(&self, key: &str) -> Result<Vec<AttendanceRecord>> {
        let lock = self.open_lock(key)?;
        lock.lock_shared().context("Failed to acquire lock")?;
        let records = Self::read(&self.data_path(key));
        lock.unlock().context("Failed to unlock")?;
        records
    }

    fn transact<R, F>(&self, key: &str, f: F) -> Result<R>
    where
        F: FnOnce(&mut Vec<AttendanceRecord>) -> Result<R>,
    {
        let lock = self.open_lock(key)?;
        lock.lock_exclusive().context("Failed to acquire lock")?;

        let path = self.data_path(key);
        let mut records = Self::read(&path)?;

        let result = f(&mut records);

        if result.is_ok() {
            Self::write(&path, &records)?;
            tracing::debug!(key, count = records.len(), "records written");
        }

        lock.unlock().context("Failed to unlock")?;

        result
    }
}
