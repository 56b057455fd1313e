//! Persisted snapshot of the roster and attendance log.

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::attendance::DayRecord;
use crate::error::{AppError, Result};

/// Date-indexed day records. Ordered by date, oldest first.
pub type AttendanceLog = BTreeMap<NaiveDate, DayRecord>;

/// Full state as written to the JSON data file.
///
/// ```json
/// { "students": ["Alice"], "records": { "2026-02-20": { "Alice": "present" } } }
/// ```
///
/// A missing key reads as an empty roster or an empty log.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    pub students: Vec<String>,
    pub records: AttendanceLog,
}

impl Snapshot {
    /// Parse and validate snapshot JSON.
    pub fn from_json(content: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(content)?;
        if !value.is_object() {
            return Err(AppError::malformed("snapshot must be a JSON object"));
        }
        let snapshot: Snapshot = serde_json::from_value(value)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Serialize as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| AppError::Persistence(e.into()))
    }

    /// Roster names must be non-blank, trimmed and unique.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::with_capacity(self.students.len());
        for name in &self.students {
            if name.trim().is_empty() || name.trim() != name.as_str() {
                return Err(AppError::malformed(format!("invalid student name {name:?}")));
            }
            if !seen.insert(name.as_str()) {
                return Err(AppError::malformed(format!("duplicate student {name:?}")));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AttendanceStatus;

    #[test]
    fn test_parse_snapshot_format() {
        let json = r#"{
            "students": ["Alice", "Bob"],
            "records": {
                "2026-02-20": { "Alice": "present", "Bob": "late" }
            }
        }"#;
        let snapshot = Snapshot::from_json(json).unwrap();
        assert_eq!(snapshot.students, vec!["Alice", "Bob"]);

        let date = NaiveDate::from_ymd_opt(2026, 2, 20).unwrap();
        let record = &snapshot.records[&date];
        assert_eq!(record.get("Bob"), Some(AttendanceStatus::Late));
    }

    #[test]
    fn test_dates_serialize_iso() {
        let mut snapshot = Snapshot::default();
        snapshot
            .records
            .insert(NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(), DayRecord::new());
        let json = serde_json::to_string(&snapshot).unwrap();
        assert_eq!(json, r#"{"students":[],"records":{"2026-01-05":{}}}"#);
    }

    #[test]
    fn test_rejects_duplicates_and_blank_names() {
        assert!(matches!(
            Snapshot::from_json(r#"{"students":["A","A"],"records":{}}"#),
            Err(AppError::MalformedSnapshot(_))
        ));
        assert!(matches!(
            Snapshot::from_json(r#"{"students":["  "],"records":{}}"#),
            Err(AppError::MalformedSnapshot(_))
        ));
    }

    #[test]
    fn test_missing_keys_default_to_empty() {
        let snapshot = Snapshot::from_json(r#"{"students":["Alice"]}"#).unwrap();
        assert_eq!(snapshot.students, vec!["Alice"]);
        assert!(snapshot.records.is_empty());

        let snapshot = Snapshot::from_json(r#"{"records":{"2026-01-01":{"Bob":"late"}}}"#).unwrap();
        assert!(snapshot.students.is_empty());
        assert_eq!(snapshot.records.len(), 1);

        assert_eq!(Snapshot::from_json("{}").unwrap(), Snapshot::default());
    }

    #[test]
    fn test_rejects_wrong_shapes() {
        assert!(matches!(Snapshot::from_json("[]"), Err(AppError::MalformedSnapshot(_))));
        assert!(Snapshot::from_json(r#"["Alice"]"#).is_err());
        assert!(Snapshot::from_json(r#"{"students":"Alice"}"#).is_err());
        assert!(Snapshot::from_json(r#"{"records":[]}"#).is_err());
    }

    #[test]
    fn test_rejects_unknown_status_and_bad_date() {
        assert!(Snapshot::from_json(r#"{"students":[],"records":{"2026-01-01":{"A":"sick"}}}"#).is_err());
        assert!(Snapshot::from_json(r#"{"students":[],"records":{"yesterday":{}}}"#).is_err());
        assert!(Snapshot::from_json("not json").is_err());
    }
}
