pub mod config;
pub mod dates;
pub mod error;
pub mod export;
pub mod models;
pub mod report;
pub mod storage;
pub mod store;

pub use error::{AppError, Result};
pub use models::{AttendanceStatus, DailyTally, DayRecord, Snapshot};
pub use store::{AttendanceStore, LoadOutcome, ReportRow, StartupPolicy};
