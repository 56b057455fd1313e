//! Attendance store: roster, day records and statistics.
//!
//! The store owns the roster and the attendance log and writes a full
//! snapshot through its backend after every mutation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{AppError, Result};
use crate::models::{AttendanceLog, AttendanceStatus, DailyTally, DayRecord, Snapshot};
use crate::storage::SnapshotBackend;


/// What to do with an existing snapshot when the store opens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StartupPolicy {
    /// Continue from the stored snapshot.
    #[default]
    Load,
    /// Delete the stored snapshot and start empty.
    Clear,
}

/// Result of loading the stored snapshot.
#[derive(Debug)]
pub enum LoadOutcome {
    /// Snapshot loaded.
    Loaded,
    /// Nothing stored yet.
    Missing,
    /// Stored snapshot was unreadable; state reset to empty.
    Recovered(AppError),
}

/// One row of the rolling report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportRow {
    pub date: NaiveDate,
    pub tally: DailyTally,
}

/// Roster plus attendance log, persisted through a [`SnapshotBackend`].
pub struct AttendanceStore<B: SnapshotBackend> {
    roster: Vec<String>,
    log: AttendanceLog,
    backend: B,
}

impl<B: SnapshotBackend> AttendanceStore<B> {
    /// Create an empty store without touching the backend.
    pub fn new(backend: B) -> Self {
        Self {
            roster: Vec::new(),
            log: AttendanceLog::new(),
            backend,
        }
    }

    /// Open the store, applying the startup policy.
    pub fn open(backend: B, policy: StartupPolicy) -> Self {
        let mut store = Self::new(backend);
        match policy {
            StartupPolicy::Load => {
                store.load();
            }
            StartupPolicy::Clear => match store.backend.clear() {
                Ok(()) => info!("Cleared previous data at {}", store.backend.describe()),
                Err(e) => warn!("Failed to clear previous data at {}: {}", store.backend.describe(), e),
            },
        }
        store
    }

    /// Current roster, in insertion order.
    pub fn students(&self) -> &[String] {
        &self.roster
    }

    pub fn contains(&self, name: &str) -> bool {
        self.roster.iter().any(|n| n == name)
    }

    /// Add a student to the end of the roster.
    ///
    /// The name is trimmed first. Returns the stored name.
    pub fn add_student(&mut self, name: &str) -> Result<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::InvalidName);
        }
        if self.contains(name) {
            return Err(AppError::duplicate(name));
        }

        self.roster.push(name.to_string());
        info!("Added student {name} ({} on roster)", self.roster.len());
        self.save()?;
        Ok(name.to_string())
    }

    /// Remove a student from the roster. Their past entries stay in the log.
    pub fn remove_student(&mut self, name: &str) -> Result<()> {
        let index = self
            .roster
            .iter()
            .position(|n| n == name)
            .ok_or_else(|| AppError::not_found(name))?;

        self.roster.remove(index);
        info!("Removed student {name} ({} on roster)", self.roster.len());
        self.save()
    }

    /// Record `status` for `name` on `date`, overwriting any previous entry.
    pub fn set_status(&mut self, date: NaiveDate, name: &str, status: AttendanceStatus) -> Result<()> {
        if !self.contains(name) {
            return Err(AppError::not_found(name));
        }

        self.log.entry(date).or_default().set(name, status);
        info!("Recorded {name} as {status} on {date}");
        self.save()
    }

    /// Recorded status, or `None` when `name` has no entry on `date`.
    pub fn get_status(&self, date: NaiveDate, name: &str) -> Option<AttendanceStatus> {
        self.log.get(&date).and_then(|record| record.get(name))
    }

    /// Status counts for `date`. Only entries in that day's record count.
    pub fn daily_tally(&self, date: NaiveDate) -> DailyTally {
        self.log.get(&date).map(|record| record.tally()).unwrap_or_default()
    }

    /// Tallies for the `limit` most recent recorded dates, newest first.
    pub fn rolling_report(&self, limit: usize) -> Vec<ReportRow> {
        self.log
            .iter()
            .rev()
            .take(limit)
            .map(|(date, record)| ReportRow {
                date: *date,
                tally: record.tally(),
            })
            .collect()
    }

    /// Dates with a day record, oldest first.
    pub fn recorded_dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.log.keys().copied()
    }

    /// Read-only day record for `date`.
    pub fn day_record(&self, date: NaiveDate) -> Option<&DayRecord> {
        self.log.get(&date)
    }

    /// Owned copy of the whole state.
    pub fn export_snapshot(&self) -> Snapshot {
        Snapshot {
            students: self.roster.clone(),
            records: self.log.clone(),
        }
    }

    /// Replace in-memory state with the stored snapshot.
    ///
    /// Missing or malformed data resets the store to empty instead of failing.
    pub fn load(&mut self) -> LoadOutcome {
        let source = self.backend.describe();
        let outcome = match self.backend.read() {
            Ok(Some(content)) => match Snapshot::from_json(&content) {
                Ok(snapshot) => {
                    self.roster = snapshot.students;
                    self.log = snapshot.records;
                    LoadOutcome::Loaded
                }
                Err(e) => LoadOutcome::Recovered(e),
            },
            Ok(None) => LoadOutcome::Missing,
            Err(e) => LoadOutcome::Recovered(AppError::malformed(e.to_string())),
        };

        match &outcome {
            LoadOutcome::Loaded => info!(
                "Loaded {} students and {} days from {source}",
                self.roster.len(),
                self.log.len()
            ),
            LoadOutcome::Missing => {
                self.reset();
                info!("No saved data at {source}, starting empty");
            }
            LoadOutcome::Recovered(e) => {
                self.reset();
                warn!("Discarding unreadable data at {source}: {e}");
            }
        }
        outcome
    }

    /// Write the full snapshot to the backend.
    ///
    /// On failure the in-memory state is kept as is.
    pub fn save(&mut self) -> Result<()> {
        let json = self.export_snapshot().to_json()?;
        self.backend.write(&json).map_err(|e| {
            warn!("Failed to save to {}: {}", self.backend.describe(), e);
            AppError::Persistence(e)
        })
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn reset(&mut self) {
        self.roster.clear();
        self.log.clear();
    }
}
