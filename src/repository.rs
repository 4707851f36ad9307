//! Attendance operations on top of an injected [`RecordStore`].

use crate::error::AttendanceError;
use crate::records::{
    AttendanceRecord, MergePlan, RecordEdit, TimeOfDay, YearMonth, format_record_date, merge,
    plan_merge,
};
use crate::store::{RecordStore, StorageScope};
use anyhow::Result;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::BTreeMap;

pub struct AttendanceRepository<S: RecordStore> {
    store: S,
    scope: StorageScope,
}

/// Totals for one month of records
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MonthlySummary {
    pub month: String,
    pub records: usize,
    pub open: usize,
    pub total_hours: f64,
    pub hourly_rate: f64,
    pub estimated_pay: f64,
}

impl<S: RecordStore> AttendanceRepository<S> {
    pub fn new(store: S, scope: StorageScope) -> Self {
        Self { store, scope }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Open a new record. Checking for an existing open record today and
    /// inserting the new one happen in a single store transaction.
    pub fn clock_in(&self, title: &str, now: NaiveDateTime) -> Result<AttendanceRecord> {
        let title = title.trim();
        if title.is_empty() {
            return Err(AttendanceError::EmptyTitle.into());
        }

        let key = self.scope.key_for(YearMonth::of(now.date()));
        let today = format_record_date(now.date());

        self.store.transact(&key, |records| {
            if let Some(open) = records.iter().find(|r| r.date == today && r.is_open()) {
                return Err(AttendanceError::AlreadyClockedIn {
                    id: open.id.clone(),
                    date: open.date.clone(),
                }
                .into());
            }
            let record = AttendanceRecord::open(title, now);
            records.push(record.clone());
            tracing::debug!(id = %record.id, key = %key, "clocked in");
            Ok(record)
        })
    }

    /// Close the most recent open record at `now`, whichever key holds it
    pub fn clock_out(&self, now: NaiveDateTime) -> Result<AttendanceRecord> {
        let clock_out = TimeOfDay::from_naive(now.time());

        let (key, open) = self.find_open()?.ok_or(AttendanceError::NoOpenRecord)?;
        let closed = self.store.transact(&key, |records| {
            let record = records
                .iter_mut()
                .find(|r| r.id == open.id && r.is_open())
                .ok_or(AttendanceError::NoOpenRecord)?;
            record.close(clock_out)?;
            Ok(record.clone())
        })?;

        tracing::debug!(id = %closed.id, key = %key, hours = closed.working_hours, "clocked out");
        Ok(closed)
    }

    /// The most recently opened record that is still open
    pub fn open_record(&self) -> Result<Option<AttendanceRecord>> {
        Ok(self.find_open()?.map(|(_, record)| record))
    }

    pub fn get(&self, id: &str) -> Result<Option<AttendanceRecord>> {
        Ok(self.locate(id)?.map(|(_, record)| record))
    }

    /// Apply a manual edit and recompute working hours. An edit that moves
    /// the record into another month key is written as remove + insert.
    pub fn update(&self, id: &str, edit: RecordEdit) -> Result<AttendanceRecord> {
        let (key, _) = self
            .locate(id)?
            .ok_or_else(|| AttendanceError::RecordNotFound(id.to_string()))?;

        let (record, target) = self.store.transact(&key, |records| {
            let idx = records
                .iter()
                .position(|r| r.id == id)
                .ok_or_else(|| AttendanceError::RecordNotFound(id.to_string()))?;
            let mut record = records[idx].clone();
            record.apply(edit)?;
            let target = self.scope.key_for(record.month()?);
            if target == key {
                records[idx] = record.clone();
            } else {
                records.remove(idx);
            }
            Ok((record, target))
        })?;

        if target != key {
            self.store.transact(&target, |records| {
                records.push(record.clone());
                Ok(())
            })?;
            tracing::debug!(id, from = %key, to = %target, "record moved");
        }

        Ok(record)
    }

    pub fn delete(&self, id: &str) -> Result<AttendanceRecord> {
        let (key, _) = self
            .locate(id)?
            .ok_or_else(|| AttendanceError::RecordNotFound(id.to_string()))?;

        self.store.transact(&key, |records| {
            let idx = records
                .iter()
                .position(|r| r.id == id)
                .ok_or_else(|| AttendanceError::RecordNotFound(id.to_string()))?;
            Ok(records.remove(idx))
        })
    }

    /// All records, or those dated within `month`, in store order
    pub fn list(&self, month: Option<YearMonth>) -> Result<Vec<AttendanceRecord>> {
        let keys = match (self.scope, month) {
            (StorageScope::Month, Some(month)) => vec![self.scope.key_for(month)],
            _ => self.store.keys()?,
        };

        let mut records = Vec::new();
        for key in keys {
            records.extend(self.store.load(&key)?);
        }

        if let Some(month) = month {
            records.retain(|r| r.naive_date().is_ok_and(|d| month.contains(d)));
        }
        Ok(records)
    }

    /// Merge imported records into the store, each under the key of its own
    /// date. An existing id is overwritten in place, or moved out of its old
    /// key when its month changed.
    pub fn import(&self, imported: Vec<AttendanceRecord>) -> Result<MergePlan> {
        let plan = self.plan_import(&imported)?;

        let mut owners: BTreeMap<String, String> = BTreeMap::new();
        for key in self.store.keys()? {
            for record in self.store.load(&key)? {
                owners.entry(record.id).or_insert_with(|| key.clone());
            }
        }

        // A record whose date moved to another month leaves its old key
        let mut batches: BTreeMap<String, Vec<AttendanceRecord>> = BTreeMap::new();
        let mut stale: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for mut record in imported {
            record.recompute_hours()?;
            let target = self.scope.key_for(record.month()?);
            if let Some(owner) = owners.get(&record.id)
                && *owner != target
            {
                if let Some(batch) = batches.get_mut(owner) {
                    batch.retain(|r| r.id != record.id);
                }
                stale
                    .entry(owner.clone())
                    .or_default()
                    .push(record.id.clone());
            }
            owners.insert(record.id.clone(), target.clone());
            batches.entry(target).or_default().push(record);
        }

        for (key, batch) in batches {
            if batch.is_empty() {
                continue;
            }
            let count = batch.len();
            self.store.transact(&key, |records| {
                *records = merge(std::mem::take(records), batch);
                Ok(())
            })?;
            tracing::debug!(key = %key, count, "imported records merged");
        }

        for (key, ids) in stale {
            let ids: Vec<String> = ids
                .into_iter()
                .filter(|id| owners.get(id) != Some(&key))
                .collect();
            if ids.is_empty() {
                continue;
            }
            self.store.transact(&key, |records| {
                records.retain(|r| !ids.contains(&r.id));
                Ok(())
            })?;
            tracing::debug!(key = %key, moved = ids.len(), "imported records moved out");
        }

        Ok(plan)
    }

    /// What [`import`](Self::import) would do, without writing
    pub fn plan_import(&self, imported: &[AttendanceRecord]) -> Result<MergePlan> {
        let existing = self.list(None)?;
        Ok(plan_merge(&existing, imported))
    }

    pub fn summary(&self, month: YearMonth, hourly_rate: f64) -> Result<MonthlySummary> {
        let records = self.list(Some(month))?;
        let total_hours = records.iter().fold(0.0, |acc, r| acc + r.working_hours);
        Ok(MonthlySummary {
            month: month.to_string(),
            records: records.len(),
            open: records.iter().filter(|r| r.is_open()).count(),
            total_hours,
            hourly_rate,
            estimated_pay: total_hours * hourly_rate,
        })
    }

    fn locate(&self, id: &str) -> Result<Option<(String, AttendanceRecord)>> {
        for key in self.store.keys()? {
            if let Some(record) = self.store.load(&key)?.into_iter().find(|r| r.id == id) {
                return Ok(Some((key, record)));
            }
        }
        Ok(None)
    }

    /// Latest open record and its key, newest key first
    fn find_open(&self) -> Result<Option<(String, AttendanceRecord)>> {
        for key in self.store.keys()?.into_iter().rev() {
            if let Some(record) = self.store.load(&key)?.into_iter().rev().find(|r| r.is_open()) {
                return Ok(Some((key, record)));
            }
        }
        Ok(None)
    }
}
