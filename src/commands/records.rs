use crate::OutputFormat;
use crate::records::{RecordEdit, YearMonth};
use crate::repository::AttendanceRepository;
use crate::store::RecordStore;
use crate::utils::format::{format_amount, format_hours, print_records_table, summary_tree};
use anyhow::Result;

pub fn list<S: RecordStore>(
    repo: &AttendanceRepository<S>,
    month: Option<YearMonth>,
    format: OutputFormat,
) -> Result<()> {
    let records = repo.list(month)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&records)?),
        OutputFormat::Text => {
            print_records_table(&records);
            if let Some(month) = month
                && !records.is_empty()
            {
                let total = records.iter().fold(0.0, |acc, r| acc + r.working_hours);
                println!("{}", "-".repeat(90));
                println!("Total for {}: {}", month, format_hours(total));
            }
        }
    }
    Ok(())
}

pub fn edit<S: RecordStore>(
    repo: &AttendanceRepository<S>,
    id: &str,
    edit: RecordEdit,
) -> Result<()> {
    let record = repo.update(id, edit)?;
    println!(
        "✓ Updated {}: {} {} - {} ({})",
        record.id,
        record.date,
        record.clock_in_time,
        record.clock_out_time.as_deref().unwrap_or("open"),
        format_hours(record.working_hours)
    );
    Ok(())
}

pub fn delete<S: RecordStore>(repo: &AttendanceRepository<S>, id: &str) -> Result<()> {
    let record = repo.delete(id)?;
    println!("✓ Deleted {} ({} {})", record.id, record.date, record.title);
    Ok(())
}

pub fn summary<S: RecordStore>(
    repo: &AttendanceRepository<S>,
    month: YearMonth,
    hourly_rate: f64,
    format: OutputFormat,
) -> Result<()> {
    let summary = repo.summary(month, hourly_rate)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        OutputFormat::Text => {
            let records = repo.list(Some(month))?;
            println!("{}", summary_tree(&summary, &records));
            if summary.open > 0 {
                println!("({} open record(s) not counted)", summary.open);
            }
            println!(
                "Total: {}  Estimated pay: {}",
                format_hours(summary.total_hours),
                format_amount(summary.estimated_pay)
            );
        }
    }
    Ok(())
}
