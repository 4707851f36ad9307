//! Text rendering for records and monthly summaries.

use crate::records::AttendanceRecord;
use crate::repository::MonthlySummary;
use std::collections::BTreeMap;
use termtree::Tree;

pub fn format_hours(hours: f64) -> String {
    format!("{:.2}h", hours)
}

/// Whole currency units with thousands separators (`53125.9` -> `53,125`)
pub fn format_amount(amount: f64) -> String {
    let whole = amount.floor().max(0.0) as u64;
    let digits = whole.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn span_label(record: &AttendanceRecord) -> String {
    let out = record.clock_out_time.as_deref().unwrap_or("--:--");
    let title = if record.title.is_empty() {
        "(untitled)"
    } else {
        record.title.as_str()
    };
    format!(
        "{} - {}  {}  {}",
        record.clock_in_time,
        out,
        format_hours(record.working_hours),
        title
    )
}

pub fn print_records_table(records: &[AttendanceRecord]) {
    if records.is_empty() {
        println!("No records found.");
        return;
    }

    println!(
        "{:<36} {:<10} {:<9} {:<9} {:>7}  {}",
        "ID", "Date", "In", "Out", "Hours", "Title"
    );
    println!("{}", "-".repeat(90));

    for record in records {
        println!(
            "{:<36} {:<10} {:<9} {:<9} {:>7.2}  {}",
            record.id,
            record.date,
            record.clock_in_time,
            record.clock_out_time.as_deref().unwrap_or("-"),
            record.working_hours,
            record.title
        );
    }
}

/// Month -> day -> shift tree used by `summary`
pub fn summary_tree(summary: &MonthlySummary, records: &[AttendanceRecord]) -> Tree<String> {
    let mut root = Tree::new(format!(
        "{}  {} over {} records, est. pay {} (rate {})",
        summary.month,
        format_hours(summary.total_hours),
        summary.records,
        format_amount(summary.estimated_pay),
        summary.hourly_rate
    ));

    let mut by_date: BTreeMap<&str, Vec<&AttendanceRecord>> = BTreeMap::new();
    for record in records {
        by_date.entry(record.date.as_str()).or_default().push(record);
    }

    for (date, shifts) in by_date {
        let hours: f64 = shifts.iter().map(|r| r.working_hours).sum();
        let mut day = Tree::new(format!("{}  {}", date, format_hours(hours)));
        for shift in shifts {
            day.push(Tree::new(span_label(shift)));
        }
        root.push(day);
    }

    root
}
