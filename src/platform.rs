//! Cross-platform utilities for directory resolution and file operations.
//!
//! Everything the tracker persists (record lists, config, cached Google
//! tokens) lives in one state directory resolved here.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "attendance-tracker";

/// Get the state directory with cross-platform fallback chain.
///
/// Priority order:
/// 1. Explicit override (for testing/CI)
/// 2. Home directory (~/.attendance-tracker)
/// 3. Platform-specific data directory (XDG on Linux, AppData on Windows)
/// 4. Current working directory (last resort)
///
/// Each directory is validated for write access before being selected.
pub fn get_state_dir(override_dir: Option<&PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = override_dir {
        ensure_writable(dir)?;
        return Ok(dir.clone());
    }

    if let Some(home) = home::home_dir() {
        let dir = home.join(format!(".{}", APP_DIR));
        if ensure_writable(&dir).is_ok() {
            return Ok(dir);
        }
        tracing::warn!(dir = %dir.display(), "state directory not writable, trying fallbacks");
    }

    if let Some(data) = dirs::data_local_dir() {
        let dir = data.join(APP_DIR);
        if ensure_writable(&dir).is_ok() {
            return Ok(dir);
        }
    }

    let dir = PathBuf::from(format!(".{}", APP_DIR));
    ensure_writable(&dir).context(
        "Cannot create state directory in any location. \
         Check file permissions or set storage.state_dir_override in config.",
    )?;
    Ok(dir)
}

/// Ensure a directory exists and is writable by the current user.
pub fn ensure_writable(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

    let test_path = dir.join(".write_test");
    fs::write(&test_path, b"test")
        .with_context(|| format!("Directory {} is not writable", dir.display()))?;

    // Ignore errors (file might be held by antivirus on Windows)
    let _ = fs::remove_file(&test_path);

    Ok(())
}

/// Directory holding the record lists, respecting the config override.
pub fn records_dir(state_dir_override: Option<&PathBuf>) -> Result<PathBuf> {
    let dir = get_state_dir(state_dir_override)?.join("records");
    ensure_writable(&dir)?;
    Ok(dir)
}

pub fn token_cache_path(state_dir_override: Option<&PathBuf>) -> Result<PathBuf> {
    Ok(get_state_dir(state_dir_override)?.join("google_tokens.json"))
}
