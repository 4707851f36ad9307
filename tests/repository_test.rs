use attendance_tracker::error::AttendanceError;
use attendance_tracker::records::{AttendanceRecord, RecordEdit, YearMonth};
use attendance_tracker::repository::AttendanceRepository;
use attendance_tracker::store::{FileStore, RecordStore, StorageScope};
use chrono::NaiveDateTime;
use std::sync::Arc;
use std::thread;
use tempfile::tempdir;

fn at(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
}

fn closed(id: &str, date: &str, clock_in: &str, clock_out: &str) -> AttendanceRecord {
    AttendanceRecord {
        id: id.to_string(),
        date: date.to_string(),
        title: format!("shift {}", id),
        clock_in_time: clock_in.to_string(),
        clock_out_time: Some(clock_out.to_string()),
        working_hours: 0.0,
    }
}

#[test]
fn test_clock_in_out_round_trip_on_disk() {
    let dir = tempdir().unwrap();
    let repo = AttendanceRepository::new(FileStore::new(dir.path()), StorageScope::All);

    let opened = repo.clock_in("Inventory", at("2026-10-18 09:00:00")).unwrap();
    assert_eq!(opened.clock_in_time, "09:00:00");

    // A fresh repository sees the same open record
    let reopened = AttendanceRepository::new(FileStore::new(dir.path()), StorageScope::All);
    assert_eq!(reopened.open_record().unwrap().unwrap().id, opened.id);

    let closed = reopened.clock_out(at("2026-10-18 17:30:00")).unwrap();
    assert_eq!(closed.working_hours, 8.5);
    assert!(reopened.open_record().unwrap().is_none());
}

#[test]
fn test_concurrent_clock_in_creates_one_record() {
    let dir = tempdir().unwrap();
    let repo = Arc::new(AttendanceRepository::new(
        FileStore::new(dir.path()),
        StorageScope::All,
    ));

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let repo = Arc::clone(&repo);
            thread::spawn(move || {
                repo.clock_in(&format!("worker {}", i), at("2026-10-18 09:00:00"))
                    .is_ok()
            })
        })
        .collect();

    let successes = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|ok| *ok)
        .count();

    assert_eq!(successes, 1);
    assert_eq!(repo.list(None).unwrap().len(), 1);
}

#[test]
fn test_overnight_shift_clocks_out_next_day() {
    let dir = tempdir().unwrap();
    let repo = AttendanceRepository::new(FileStore::new(dir.path()), StorageScope::Month);

    repo.clock_in("Night", at("2026-10-31 22:00:00")).unwrap();
    let closed = repo.clock_out(at("2026-11-01 06:00:00")).unwrap();

    assert_eq!(closed.date, "2026/10/31");
    assert_eq!(closed.working_hours, 8.0);
}

#[test]
fn test_month_scope_keeps_one_key_per_month() {
    let dir = tempdir().unwrap();
    let store = FileStore::new(dir.path());
    let repo = AttendanceRepository::new(store.clone(), StorageScope::Month);

    repo.import(vec![
        closed("a", "2026/09/30", "09:00:00", "17:00:00"),
        closed("b", "2026/10/01", "09:00:00", "12:00:00"),
    ])
    .unwrap();

    assert_eq!(
        store.keys().unwrap(),
        vec!["attendanceRecords-2026-09", "attendanceRecords-2026-10"]
    );

    let october: YearMonth = "2026-10".parse().unwrap();
    let listed = repo.list(Some(october)).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, "b");
    assert_eq!(listed[0].working_hours, 3.0);
}

#[test]
fn test_edit_moves_record_between_month_keys() {
    let dir = tempdir().unwrap();
    let store = FileStore::new(dir.path());
    let repo = AttendanceRepository::new(store.clone(), StorageScope::Month);
    repo.import(vec![closed("a", "2026/09/30", "09:00:00", "17:00:00")])
        .unwrap();

    let edited = repo
        .update(
            "a",
            RecordEdit {
                date: Some("2026/10/02".to_string()),
                clock_out_time: Some("13:00".to_string()),
                ..Default::default()
            },
        )
        .unwrap();

    assert_eq!(edited.working_hours, 4.0);
    assert!(store.load("attendanceRecords-2026-09").unwrap().is_empty());
    assert_eq!(store.load("attendanceRecords-2026-10").unwrap(), vec![edited]);
}

#[test]
fn test_reimport_is_idempotent() {
    let dir = tempdir().unwrap();
    let repo = AttendanceRepository::new(FileStore::new(dir.path()), StorageScope::All);
    let batch = vec![
        closed("a", "2026/10/01", "09:00:00", "17:00:00"),
        closed("b", "2026/10/02", "22:00:00", "06:00:00"),
    ];

    let first = repo.import(batch.clone()).unwrap();
    let after_first = repo.list(None).unwrap();
    let second = repo.import(batch).unwrap();

    assert_eq!((first.replaced, first.appended), (0, 2));
    assert_eq!((second.replaced, second.appended), (2, 0));
    assert_eq!(repo.list(None).unwrap(), after_first);
}

#[test]
fn test_delete_unknown_record() {
    let dir = tempdir().unwrap();
    let repo = AttendanceRepository::new(FileStore::new(dir.path()), StorageScope::All);

    let err = repo.delete("missing").unwrap_err();
    assert!(matches!(
        err.downcast_ref::<AttendanceError>(),
        Some(AttendanceError::RecordNotFound(_))
    ));
}

#[test]
fn test_reimport_with_new_date_moves_record_to_its_month() {
    let dir = tempdir().unwrap();
    let store = FileStore::new(dir.path());
    let repo = AttendanceRepository::new(store.clone(), StorageScope::Month);
    let record = repo.clock_in("Audit", at("2026-10-18 09:00:00")).unwrap();
    repo.clock_out(at("2026-10-18 17:00:00")).unwrap();

    let mut moved = closed(&record.id, "2026/11/03", "10:00:00", "12:00:00");
    moved.title = "Audit".to_string();
    let plan = repo.import(vec![moved]).unwrap();
    assert_eq!((plan.replaced, plan.appended), (1, 0));

    let october: YearMonth = "2026-10".parse().unwrap();
    let november: YearMonth = "2026-11".parse().unwrap();
    assert!(repo.list(Some(october)).unwrap().is_empty());
    let listed = repo.list(Some(november)).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, record.id);
    assert_eq!(repo.summary(november, 1000.0).unwrap().total_hours, 2.0);
    assert!(store.load("attendanceRecords-2026-10").unwrap().is_empty());
    assert_eq!(repo.list(None).unwrap().len(), 1);
}

#[test]
fn test_duplicate_new_id_across_months_is_stored_once() {
    let dir = tempdir().unwrap();
    let repo = AttendanceRepository::new(FileStore::new(dir.path()), StorageScope::Month);

    let mut first = closed("x", "2026/10/01", "09:00:00", "17:00:00");
    first.title = "first".to_string();
    let mut second = closed("x", "2026/11/01", "09:00:00", "12:00:00");
    second.title = "second".to_string();

    let plan = repo.import(vec![first, second]).unwrap();
    assert_eq!((plan.replaced, plan.appended), (1, 1));

    let stored: Vec<_> = repo
        .list(None)
        .unwrap()
        .into_iter()
        .filter(|r| r.id == "x")
        .collect();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].title, "second");
    assert_eq!(stored[0].date, "2026/11/01");
}

#[test]
fn test_clock_out_finds_open_record_from_older_month() {
    let dir = tempdir().unwrap();
    let repo = AttendanceRepository::new(FileStore::new(dir.path()), StorageScope::Month);
    let opened = repo.clock_in("Forgot to clock out", at("2026-08-10 09:00:00")).unwrap();

    assert_eq!(repo.open_record().unwrap().unwrap().id, opened.id);

    let closed = repo.clock_out(at("2026-10-18 10:30:00")).unwrap();
    assert_eq!(closed.id, opened.id);
    assert_eq!(closed.date, "2026/08/10");
    assert_eq!(closed.working_hours, 1.5);
    assert!(repo.open_record().unwrap().is_none());
}

#[test]
fn test_empty_month_summary_is_positive_zero() {
    let dir = tempdir().unwrap();
    let repo = AttendanceRepository::new(FileStore::new(dir.path()), StorageScope::Month);

    let summary = repo.summary("2026-10".parse().unwrap(), 2500.0).unwrap();
    assert_eq!(summary.records, 0);
    assert!(summary.total_hours.is_sign_positive());
    assert!(summary.estimated_pay.is_sign_positive());

    let json = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["total_hours"].to_string(), "0.0");
    assert_eq!(json["estimated_pay"].to_string(), "0.0");
}
