//! Text and Excel export functionality.

use chrono::{Local, NaiveDate};
use rust_xlsxwriter::{Color, Format, FormatBorder, Workbook, XlsxError};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::{AppError, Result};
use crate::models::AttendanceStatus;
use crate::storage::SnapshotBackend;
use crate::store::{AttendanceStore, ReportRow};

/// Render the plain-text report for one day.
///
/// Current roster members come first in roster order, then entries left by
/// removed students.
pub fn render_day_report<B: SnapshotBackend>(store: &AttendanceStore<B>, date: NaiveDate) -> String {
    let mut lines = vec![
        format!("Date: {date}"),
        "Student attendance:".to_string(),
        "-".repeat(30),
    ];

    let entries = day_entries(store, date);
    if entries.is_empty() {
        lines.push("No attendance recorded for this day".to_string());
    }
    lines.extend(entries.iter().map(|(name, status)| format!("{name}: {}", status.label())));

    let tally = store.daily_tally(date);
    lines.push(String::new());
    lines.push(match tally.attendance_rate() {
        Some(_) => format!(
            "Attendance rate: {} ({}/{})",
            tally.rate_display(),
            tally.attended(),
            tally.recorded_total
        ),
        None => "Attendance rate: —".to_string(),
    });

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn day_entries<B: SnapshotBackend>(store: &AttendanceStore<B>, date: NaiveDate) -> Vec<(String, AttendanceStatus)> {
    let Some(record) = store.day_record(date) else {
        return Vec::new();
    };

    let mut entries: Vec<(String, AttendanceStatus)> = store
        .students()
        .iter()
        .filter_map(|name| record.get(name).map(|status| (name.clone(), status)))
        .collect();
    entries.extend(
        record
            .iter()
            .filter(|(name, _)| !store.contains(name))
            .map(|(name, status)| (name.to_string(), status)),
    );
    entries
}

/// File name for a day report: `attendance_YYYY-MM-DD.txt`.
pub fn day_report_filename(date: NaiveDate) -> String {
    format!("attendance_{}.txt", date.format("%Y-%m-%d"))
}

/// Write the day report into `dir` and return its path.
pub fn export_day_report<B: SnapshotBackend>(store: &AttendanceStore<B>, date: NaiveDate, dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir).map_err(|e| AppError::export(format!("{}: {e}", dir.display())))?;
    let path = dir.join(day_report_filename(date));
    std::fs::write(&path, render_day_report(store, date))
        .map_err(|e| AppError::export(format!("{}: {e}", path.display())))?;
    info!("Exported day report for {date} to {}", path.display());
    Ok(path)
}

/// Export rolling report rows to Excel file.
/// One row per date with status counts and attendance rate.
pub fn export_rolling_report_to_excel(rows: &[ReportRow], path: &Path) -> std::result::Result<(), XlsxError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    worksheet.set_name("Attendance Report")?;

    // Header format
    let header_format = Format::new()
        .set_bold()
        .set_background_color(Color::RGB(0x4472C4))
        .set_font_color(Color::White)
        .set_border(FormatBorder::Thin);

    let rate_format = Format::new().set_num_format("0.0%");

    let headers = ["Date", "Present", "Late", "Absent", "Leave", "Recorded", "Rate"];
    for (col, header) in headers.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *header, &header_format)?;
    }

    worksheet.set_column_width(0, 12)?; // Date
    for col in 1..=5 {
        worksheet.set_column_width(col, 10)?;
    }
    worksheet.set_column_width(6, 10)?; // Rate

    for (idx, row) in rows.iter().enumerate() {
        let r = (idx + 1) as u32;
        let tally = &row.tally;

        worksheet.write_string(r, 0, row.date.format("%Y-%m-%d").to_string())?;
        worksheet.write_number(r, 1, tally.present as f64)?;
        worksheet.write_number(r, 2, tally.late as f64)?;
        worksheet.write_number(r, 3, tally.absent as f64)?;
        worksheet.write_number(r, 4, tally.leave as f64)?;
        worksheet.write_number(r, 5, tally.recorded_total as f64)?;

        match tally.attendance_rate() {
            Some(rate) => worksheet.write_number_with_format(r, 6, rate, &rate_format)?,
            None => worksheet.write_string(r, 6, "—")?,
        };
    }

    if !rows.is_empty() {
        worksheet.autofilter(0, 0, rows.len() as u32, 6)?;
    }

    // Freeze top row
    worksheet.set_freeze_panes(1, 0)?;

    workbook.save(path)?;
    Ok(())
}

/// Generate default filename for export.
pub fn generate_export_filename(prefix: &str) -> String {
    let now = Local::now();
    format!("{prefix}_{ts}.xlsx", ts = now.format("%Y%m%d_%H%M%S"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryBackend;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_day_report_filename() {
        assert_eq!(day_report_filename(date("2026-02-20")), "attendance_2026-02-20.txt");
    }

    #[test]
    fn test_render_day_report() {
        let day = date("2026-02-20");
        let mut store = AttendanceStore::new(MemoryBackend::new());
        store.add_student("Bob").unwrap();
        store.add_student("Alice").unwrap();
        store.add_student("Zed").unwrap();
        store.set_status(day, "Zed", AttendanceStatus::Absent).unwrap();
        store.set_status(day, "Alice", AttendanceStatus::Present).unwrap();
        store.set_status(day, "Bob", AttendanceStatus::Late).unwrap();
        store.remove_student("Zed").unwrap();

        let report = render_day_report(&store, day);
        let lines: Vec<&str> = report.lines().collect();
        assert_eq!(lines[0], "Date: 2026-02-20");
        assert_eq!(lines[2], "-".repeat(30));
        assert_eq!(lines[3], "Bob: ⚠️ Late");
        assert_eq!(lines[4], "Alice: ✅ Present");
        assert_eq!(lines[5], "Zed: ❌ Absent");
        assert!(report.ends_with("Attendance rate: 66.7% (2/3)\n"));
    }

    #[test]
    fn test_render_empty_day() {
        let store = AttendanceStore::new(MemoryBackend::new());
        let report = render_day_report(&store, date("2026-02-20"));
        assert!(report.contains("No attendance recorded for this day"));
        assert!(report.ends_with("Attendance rate: —\n"));
    }

    #[test]
    fn test_render_day_report_full_text() {
        let day = date("2026-02-20");
        let mut store = AttendanceStore::new(MemoryBackend::new());
        store.add_student("Alice").unwrap();
        store.set_status(day, "Alice", AttendanceStatus::Present).unwrap();

        let expected = format!(
            "Date: 2026-02-20\nStudent attendance:\n{}\nAlice: ✅ Present\n\nAttendance rate: 100.0% (1/1)\n",
            "-".repeat(30)
        );
        assert_eq!(render_day_report(&store, day), expected);
    }

    #[test]
    fn test_export_day_report_writes_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut store = AttendanceStore::new(MemoryBackend::new());
        store.add_student("Alice").unwrap();
        store.set_status(date("2026-02-20"), "Alice", AttendanceStatus::Leave).unwrap();

        let path = export_day_report(&store, date("2026-02-20"), temp_dir.path()).unwrap();
        assert_eq!(path, temp_dir.path().join("attendance_2026-02-20.txt"));

        let content = std::fs::read_to_string(path).unwrap();
        assert!(content.contains("Alice: 📝 Leave"));
        assert!(content.contains("Attendance rate: 0.0% (0/1)"));
    }

    #[test]
    fn test_export_rolling_report_to_excel() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut store = AttendanceStore::new(MemoryBackend::new());
        store.add_student("Alice").unwrap();
        store.set_status(date("2026-02-19"), "Alice", AttendanceStatus::Present).unwrap();
        store.set_status(date("2026-02-20"), "Alice", AttendanceStatus::Absent).unwrap();

        let path = temp_dir.path().join("report.xlsx");
        export_rolling_report_to_excel(&store.rolling_report(30), &path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_generate_export_filename() {
        let name = generate_export_filename("attendance_report");
        assert!(name.starts_with("attendance_report_"));
        assert!(name.ends_with(".xlsx"));
    }
}
