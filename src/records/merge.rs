use crate::records::AttendanceRecord;

/// Merge imported records into an existing list, keyed on `id`.
///
/// An imported record replaces the existing record with the same id in place;
/// records with unknown ids are appended in import order. The imported
/// version always wins, field for field.
pub fn merge(
    existing: Vec<AttendanceRecord>,
    imported: impl IntoIterator<Item = AttendanceRecord>,
) -> Vec<AttendanceRecord> {
    let mut merged = existing;
    for record in imported {
        match merged.iter().position(|r| r.id == record.id) {
            Some(idx) => merged[idx] = record,
            None => merged.push(record),
        }
    }
    merged
}

/// How a merge would treat an import, without applying it
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MergePlan {
    pub replaced: usize,
    pub appended: usize,
}

pub fn plan_merge(existing: &[AttendanceRecord], imported: &[AttendanceRecord]) -> MergePlan {
    let mut seen: Vec<&str> = existing.iter().map(|r| r.id.as_str()).collect();
    let mut plan = MergePlan::default();
    for record in imported {
        if seen.contains(&record.id.as_str()) {
            plan.replaced += 1;
        } else {
            plan.appended += 1;
            seen.push(record.id.as_str());
        }
    }
    plan
}
