use crate::commands::oauth::authenticator;
use crate::config::Config;
use crate::error::AttendanceError;
use crate::google::{CalendarClient, GoogleEvent};
use crate::records::{AttendanceRecord, YearMonth};
use crate::repository::AttendanceRepository;
use crate::store::RecordStore;
use crate::utils::format::format_hours;
use anyhow::Result;

/// Closed records to push: the named ids, or every closed record with `all`
pub fn select_records(
    records: Vec<AttendanceRecord>,
    ids: &[String],
    all: bool,
) -> Result<Vec<AttendanceRecord>> {
    if all {
        return Ok(records.into_iter().filter(|r| !r.is_open()).collect());
    }

    let mut selected = Vec::with_capacity(ids.len());
    for id in ids {
        let record = records
            .iter()
            .find(|r| &r.id == id)
            .ok_or_else(|| AttendanceError::RecordNotFound(id.clone()))?;
        if record.is_open() {
            tracing::warn!(id = %id, "skipping open record");
            continue;
        }
        selected.push(record.clone());
    }
    Ok(selected)
}

/// Insert one event per record, in order. Stops at the first failure;
/// events already created stay in the calendar.
pub async fn push_events(
    client: &CalendarClient,
    calendar_id: &str,
    time_zone: &str,
    records: &[AttendanceRecord],
) -> Result<usize> {
    let mut created = 0;
    for record in records {
        let Some(event) = GoogleEvent::from_record(record, time_zone)? else {
            continue;
        };
        let inserted = client.insert_event(calendar_id, &event).await.map_err(|e| {
            anyhow::Error::new(e).context(format!(
                "Sync stopped at record {} after {} event(s) created",
                record.id, created
            ))
        })?;
        tracing::debug!(id = %record.id, event = ?inserted.id, "event created");
        created += 1;
    }
    Ok(created)
}

pub async fn sync<S: RecordStore>(
    repo: &AttendanceRepository<S>,
    config: &Config,
    ids: &[String],
    all: bool,
    month: Option<YearMonth>,
    dry_run: bool,
) -> Result<()> {
    if ids.is_empty() && !all {
        anyhow::bail!("Select records to sync by id, or pass --all");
    }

    let selected = select_records(repo.list(month)?, ids, all)?;
    if selected.is_empty() {
        println!("No closed records to sync.");
        return Ok(());
    }

    if dry_run {
        println!(
            "[DRY-RUN] Would create {} event(s) in calendar '{}':",
            selected.len(),
            config.google.calendar_id
        );
        for record in &selected {
            println!(
                "  {} {} - {} ({}) {}",
                record.date,
                record.clock_in_time,
                record.clock_out_time.as_deref().unwrap_or_default(),
                format_hours(record.working_hours),
                record.title
            );
        }
        return Ok(());
    }

    let token = authenticator(config)?.access_token().await?;
    let mut client = CalendarClient::new(&token);
    if let Some(url) = &config.google.api_url {
        client = client.with_base_url(url);
    }

    let created = push_events(
        &client,
        &config.google.calendar_id,
        &config.google.timezone,
        &selected,
    )
    .await?;

    tracing::info!(created, calendar = %config.google.calendar_id, "sync complete");
    println!("✓ Synced {} record(s) to Google Calendar", created);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, open: bool) -> AttendanceRecord {
        AttendanceRecord {
            id: id.to_string(),
            date: "2026/10/18".to_string(),
            title: "Support".to_string(),
            clock_in_time: "09:00".to_string(),
            clock_out_time: (!open).then(|| "17:00".to_string()),
            working_hours: if open { 0.0 } else { 8.0 },
        }
    }

    #[test]
    fn test_all_selects_closed_only() {
        let selected =
            select_records(vec![record("a", false), record("b", true)], &[], true).unwrap();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].id, "a");
    }

    #[test]
    fn test_unknown_id_is_an_error() {
        let result = select_records(vec![record("a", false)], &["zzz".to_string()], false);
        assert!(result.is_err());
    }

    #[test]
    fn test_open_id_is_skipped() {
        let selected = select_records(
            vec![record("a", false), record("b", true)],
            &["b".to_string(), "a".to_string()],
            false,
        )
        .unwrap();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].id, "a");
    }
}
