//! Data models for statuses, day records and snapshots.

pub mod attendance;
pub mod snapshot;

pub use attendance::{AttendanceStatus, DailyTally, DayRecord, status_label};
pub use snapshot::{AttendanceLog, Snapshot};
