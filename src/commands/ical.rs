use crate::ical;
use crate::records::YearMonth;
use crate::repository::AttendanceRepository;
use crate::store::RecordStore;
use anyhow::{Context, Result};
use std::path::Path;

pub fn export<S: RecordStore>(
    repo: &AttendanceRepository<S>,
    output: &Path,
    month: Option<YearMonth>,
) -> Result<()> {
    let records = repo.list(month)?;
    let closed = records.iter().filter(|r| !r.is_open()).count();

    let ics = ical::to_ics(&records)?;
    std::fs::write(output, ics)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!("✓ Exported {} record(s) to {}", closed, output.display());
    if closed < records.len() {
        println!("  Skipped {} open record(s)", records.len() - closed);
    }
    Ok(())
}

/// Parse an .ics file and merge it into the store. Parsing finishes before
/// anything is written, so a malformed file leaves the store untouched.
pub fn import<S: RecordStore>(
    repo: &AttendanceRepository<S>,
    file: &Path,
    dry_run: bool,
) -> Result<()> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let imported = ical::from_ics(&content)
        .with_context(|| format!("Could not import {}", file.display()))?;

    if imported.is_empty() {
        println!("No events found in {}", file.display());
        return Ok(());
    }

    if dry_run {
        let plan = repo.plan_import(&imported)?;
        println!(
            "[DRY-RUN] Would import {} record(s): {} replaced, {} added",
            imported.len(),
            plan.replaced,
            plan.appended
        );
        return Ok(());
    }

    let count = imported.len();
    let plan = repo.import(imported)?;
    println!(
        "✓ Imported {} record(s): {} replaced, {} added",
        count, plan.replaced, plan.appended
    );
    Ok(())
}
