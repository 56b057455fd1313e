//! Weekly attendance grid.

use chrono::{Days, NaiveDate};

use crate::models::AttendanceStatus;
use crate::storage::SnapshotBackend;
use crate::store::AttendanceStore;

/// One roster member's statuses across the grid dates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridRow {
    pub name: String,
    pub statuses: Vec<Option<AttendanceStatus>>,
}

/// Statuses for every current student over consecutive days.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeeklyGrid {
    /// Oldest first, ending at the requested date.
    pub dates: Vec<NaiveDate>,
    /// Roster order.
    pub rows: Vec<GridRow>,
}

/// Build a grid of `days` calendar days ending at `end`.
///
/// Reads only; dates without a day record show as unrecorded.
pub fn weekly_grid<B: SnapshotBackend>(store: &AttendanceStore<B>, end: NaiveDate, days: u32) -> WeeklyGrid {
    let dates: Vec<NaiveDate> = (0..u64::from(days))
        .rev()
        .filter_map(|back| end.checked_sub_days(Days::new(back)))
        .collect();

    let rows = store
        .students()
        .iter()
        .map(|name| GridRow {
            name: name.clone(),
            statuses: dates.iter().map(|date| store.get_status(*date, name)).collect(),
        })
        .collect();

    WeeklyGrid { dates, rows }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryBackend;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_grid_dates_cross_month() {
        let store = AttendanceStore::new(MemoryBackend::new());
        let grid = weekly_grid(&store, date("2026-03-02"), 7);

        assert_eq!(grid.dates.first(), Some(&date("2026-02-24")));
        assert_eq!(grid.dates.last(), Some(&date("2026-03-02")));
        assert_eq!(grid.dates.len(), 7);
        assert!(grid.rows.is_empty());
    }

    #[test]
    fn test_grid_rows_follow_roster() {
        let mut store = AttendanceStore::new(MemoryBackend::new());
        store.add_student("Bob").unwrap();
        store.add_student("Alice").unwrap();
        store.set_status(date("2026-02-20"), "Alice", AttendanceStatus::Late).unwrap();

        let grid = weekly_grid(&store, date("2026-02-20"), 7);
        let names: Vec<_> = grid.rows.iter().map(|row| row.name.as_str()).collect();
        assert_eq!(names, vec!["Bob", "Alice"]);

        assert_eq!(grid.rows[1].statuses[6], Some(AttendanceStatus::Late));
        assert!(grid.rows[0].statuses.iter().all(Option::is_none));

        // Building the grid does not create day records
        assert_eq!(store.recorded_dates().count(), 1);
    }

    #[test]
    fn test_grid_excludes_removed_students() {
        let mut store = AttendanceStore::new(MemoryBackend::new());
        store.add_student("Alice").unwrap();
        store.add_student("Bob").unwrap();
        store.set_status(date("2026-02-20"), "Bob", AttendanceStatus::Absent).unwrap();
        store.remove_student("Bob").unwrap();

        let grid = weekly_grid(&store, date("2026-02-20"), 7);
        assert_eq!(grid.rows.len(), 1);
        assert_eq!(grid.rows[0].name, "Alice");
    }
}
