//! Commands against the script endpoint. Failures are logged and degrade to
//! an empty result; nothing is retried.

use crate::OutputFormat;
use crate::error::AttendanceError;
use crate::records::{AttendanceRecord, TimeOfDay};
use crate::remote::{RemoteClient, RemoteRecord};
use crate::utils::format::print_records_table;
use anyhow::Result;
use chrono::NaiveDateTime;

/// Remote records, or an empty list if the endpoint cannot be reached
pub fn fetch_records(client: &RemoteClient) -> Vec<RemoteRecord> {
    match client.get_records() {
        Ok(records) => records,
        Err(e) => {
            tracing::warn!(error = %e, "remote getRecords failed, showing no records");
            Vec::new()
        }
    }
}

fn to_local(remote: Vec<RemoteRecord>) -> Vec<AttendanceRecord> {
    remote
        .into_iter()
        .filter_map(|r| {
            let id = r.id.clone();
            r.into_record()
                .map_err(|e| tracing::warn!(id = %id, error = %e, "skipping malformed remote record"))
                .ok()
        })
        .collect()
}

pub fn list(client: &RemoteClient, format: OutputFormat) -> Result<()> {
    let records = to_local(fetch_records(client));
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&records)?),
        OutputFormat::Text => print_records_table(&records),
    }
    Ok(())
}

pub fn check_in(client: &RemoteClient, title: &str) -> Result<bool> {
    let title = title.trim();
    if title.is_empty() {
        return Err(AttendanceError::EmptyTitle.into());
    }

    match client.check_in(title) {
        Ok(record) => {
            let event = record
                .and_then(|r| r.event_id.or(Some(r.id)))
                .unwrap_or_default();
            println!("✓ Checked in remotely: {}", title);
            if !event.is_empty() {
                println!("  Event: {}", event);
            }
            Ok(true)
        }
        Err(e) => {
            tracing::warn!(error = %e, "remote checkIn failed");
            println!("Check-in was not recorded remotely.");
            Ok(false)
        }
    }
}

pub fn check_out(
    client: &RemoteClient,
    event_id: &str,
    title: &str,
    time: Option<&str>,
    now: NaiveDateTime,
) -> Result<bool> {
    // The script expects HH:MM
    let checkout = match time {
        Some(t) => t.parse::<TimeOfDay>()?.naive(),
        None => now.time(),
    }
    .format("%H:%M")
    .to_string();

    let recorded = client.check_out(title, &checkout, event_id).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "remote checkOut failed");
        false
    });

    if recorded {
        println!("✓ Checked out remotely at {}", checkout);
    } else {
        println!("Check-out was not recorded remotely.");
    }
    Ok(recorded)
}

/// Check out of the most recent open remote record
pub fn check_out_latest(client: &RemoteClient, now: NaiveDateTime) -> Result<bool> {
    let open = fetch_records(client)
        .into_iter()
        .rev()
        .find(|r| r.clock_out_time.as_deref().is_none_or(str::is_empty));

    let Some(open) = open else {
        println!("No open remote record to check out of.");
        return Ok(false);
    };

    let event_id = open.event_id.clone().unwrap_or_else(|| open.id.clone());
    check_out(client, &event_id, &open.title, None, now)
}
