//! Attendance status, day records and daily tallies.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Attendance status recorded for one student on one day.
///
/// Persisted as the lowercase token (`"present"`, `"absent"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
    Leave,
}

impl AttendanceStatus {
    /// Every status, in display order.
    pub const ALL: [AttendanceStatus; 4] = [Self::Present, Self::Absent, Self::Late, Self::Leave];

    /// Persisted token.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Present => "present",
            Self::Absent => "absent",
            Self::Late => "late",
            Self::Leave => "leave",
        }
    }

    /// Human-readable label for display.
    pub fn label(self) -> &'static str {
        match self {
            Self::Present => "✅ Present",
            Self::Absent => "❌ Absent",
            Self::Late => "⚠️ Late",
            Self::Leave => "📝 Leave",
        }
    }

    /// Whether the student counts as attending for the attendance rate.
    pub fn counts_as_attended(self) -> bool {
        matches!(self, Self::Present | Self::Late)
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AttendanceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "present" => Ok(Self::Present),
            "absent" => Ok(Self::Absent),
            "late" => Ok(Self::Late),
            "leave" => Ok(Self::Leave),
            other => Err(format!("unknown status '{other}' (expected present, absent, late or leave)")),
        }
    }
}

/// Label for a possibly unrecorded entry.
pub fn status_label(status: Option<AttendanceStatus>) -> &'static str {
    status.map_or("— Unrecorded", AttendanceStatus::label)
}

/// Status entries for one calendar date, keyed by student name.
///
/// A name missing from the map is unrecorded for that day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DayRecord(BTreeMap<String, AttendanceStatus>);

impl DayRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<AttendanceStatus> {
        self.0.get(name).copied()
    }

    /// Set or overwrite the entry for `name`.
    pub fn set(&mut self, name: impl Into<String>, status: AttendanceStatus) {
        self.0.insert(name.into(), status);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, AttendanceStatus)> {
        self.0.iter().map(|(name, status)| (name.as_str(), *status))
    }

    /// Count each status in a single pass.
    pub fn tally(&self) -> DailyTally {
        self.0.values().fold(DailyTally::default(), |mut tally, status| {
            tally.record(*status);
            tally
        })
    }
}

impl FromIterator<(String, AttendanceStatus)> for DayRecord {
    fn from_iter<T: IntoIterator<Item = (String, AttendanceStatus)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Per-status counts for one date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DailyTally {
    pub present: usize,
    pub absent: usize,
    pub late: usize,
    pub leave: usize,
    /// Number of entries in the day record, not the roster size.
    pub recorded_total: usize,
}

impl DailyTally {
    fn record(&mut self, status: AttendanceStatus) {
        match status {
            AttendanceStatus::Present => self.present += 1,
            AttendanceStatus::Absent => self.absent += 1,
            AttendanceStatus::Late => self.late += 1,
            AttendanceStatus::Leave => self.leave += 1,
        }
        self.recorded_total += 1;
    }

    /// Students counted as attending (present or late).
    pub fn attended(&self) -> usize {
        self.present + self.late
    }

    /// `(present + late) / recorded_total`, or `None` when nothing was recorded.
    pub fn attendance_rate(&self) -> Option<f64> {
        (self.recorded_total > 0).then(|| self.attended() as f64 / self.recorded_total as f64)
    }

    /// Rate as a percentage with one decimal, or "—" when undefined.
    pub fn rate_display(&self) -> String {
        match self.attendance_rate() {
            Some(rate) => format!("{:.1}%", rate * 100.0),
            None => "—".to_string(),
        }
    }
}
