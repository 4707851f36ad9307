pub mod clock;
pub mod config;
pub mod ical;
pub mod oauth;
pub mod records;
pub mod remote;
pub mod sync;

use crate::config::Config;
use crate::platform;
use crate::repository::AttendanceRepository;
use crate::store::FileStore;
use anyhow::Result;

/// Repository over the JSON files in the state directory
pub fn local_repository(config: &Config) -> Result<AttendanceRepository<FileStore>> {
    let dir = platform::records_dir(config.storage.state_dir_override.as_ref())?;
    Ok(AttendanceRepository::new(
        FileStore::new(dir),
        config.storage.scope,
    ))
}
