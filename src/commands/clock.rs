use crate::OutputFormat;
use crate::repository::AttendanceRepository;
use crate::store::RecordStore;
use crate::utils::format::format_hours;
use anyhow::Result;
use chrono::NaiveDateTime;
use serde_json::json;

pub fn clock_in<S: RecordStore>(
    repo: &AttendanceRepository<S>,
    title: &str,
    now: NaiveDateTime,
) -> Result<()> {
    let record = repo.clock_in(title, now)?;
    println!(
        "✓ Clocked in at {} on {}: {}",
        record.clock_in_time, record.date, record.title
    );
    println!("  Record: {}", record.id);
    Ok(())
}

pub fn clock_out<S: RecordStore>(repo: &AttendanceRepository<S>, now: NaiveDateTime) -> Result<()> {
    let record = repo.clock_out(now)?;
    println!(
        "✓ Clocked out at {} ({} worked on '{}')",
        record.clock_out_time.as_deref().unwrap_or_default(),
        format_hours(record.working_hours),
        record.title
    );
    Ok(())
}

/// Show the open record, if any, with hours elapsed so far
pub fn status<S: RecordStore>(
    repo: &AttendanceRepository<S>,
    now: NaiveDateTime,
    format: OutputFormat,
) -> Result<()> {
    let open = repo.open_record()?;

    let elapsed = match &open {
        Some(record) => {
            let started = record.naive_date()?.and_time(record.clock_in()?.naive());
            Some((now - started).num_seconds().max(0) as f64 / 3600.0)
        }
        None => None,
    };

    match format {
        OutputFormat::Json => {
            let value = json!({ "open": open, "elapsedHours": elapsed });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        OutputFormat::Text => match (open, elapsed) {
            (Some(record), Some(hours)) => {
                println!("Clocked in: {}", record.title);
                println!("  Since:   {} {}", record.date, record.clock_in_time);
                println!("  Elapsed: {}", format_hours(hours));
                println!("  Record:  {}", record.id);
            }
            _ => println!("Not clocked in."),
        },
    }

    Ok(())
}
