//! Sync run statistics.
//!
//! Counts how many records ended in each terminal state during a run.

use crate::sync::upsert::SyncOutcome;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Statistics for a single sync run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    /// Records written as new rows
    pub inserted: usize,
    /// Existing rows overwritten with incoming values
    pub updated: usize,
    /// Rows rejected by validation, at load time or right before a write
    pub rejected: usize,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl SyncReport {
    pub fn started() -> Self {
        Self {
            started_at: Some(Utc::now()),
            ..Self::default()
        }
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub fn record(&mut self, outcome: &SyncOutcome) {
        match outcome {
            SyncOutcome::Inserted => self.inserted += 1,
            SyncOutcome::Updated => self.updated += 1,
            SyncOutcome::Rejected(_) => self.rejected += 1,
        }
    }

    /// Merge another report into this one by summing all counts.
    ///
    /// The earliest start and latest finish are kept.
    pub fn merge(&mut self, other: SyncReport) {
        self.inserted += other.inserted;
        self.updated += other.updated;
        self.rejected += other.rejected;
        self.started_at = match (self.started_at, other.started_at) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        self.finished_at = match (self.finished_at, other.finished_at) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        };
    }

    /// Records that reached storage.
    pub fn written(&self) -> usize {
        self.inserted + self.updated
    }

    pub fn total(&self) -> usize {
        self.written() + self.rejected
    }
}

impl fmt::Display for SyncReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} inserted, {} updated, {} rejected",
            self.inserted, self.updated, self.rejected
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Field;
    use crate::sync::validation::Rejection;

    #[test]
    fn test_record_counts_each_terminal_state() {
        let mut report = SyncReport::started();
        report.record(&SyncOutcome::Inserted);
        report.record(&SyncOutcome::Inserted);
        report.record(&SyncOutcome::Updated);
        report.record(&SyncOutcome::Rejected(Rejection::MissingField {
            field: Field::Name,
        }));
        report.finish();

        assert_eq!(report.inserted, 2);
        assert_eq!(report.updated, 1);
        assert_eq!(report.rejected, 1);
        assert_eq!(report.written(), 3);
        assert_eq!(report.total(), 4);
        assert!(report.finished_at >= report.started_at);
        assert_eq!(report.to_string(), "2 inserted, 1 updated, 1 rejected");
    }

    #[test]
    fn test_merge_sums_counts() {
        let mut a = SyncReport {
            inserted: 1,
            updated: 2,
            ..SyncReport::default()
        };
        let b = SyncReport {
            inserted: 3,
            rejected: 1,
            started_at: Some(Utc::now()),
            ..SyncReport::default()
        };

        a.merge(b);
        assert_eq!((a.inserted, a.updated, a.rejected), (4, 2, 1));
        assert!(a.started_at.is_some());
    }

    #[test]
    fn test_report_serializes_counts() {
        let report = SyncReport {
            inserted: 5,
            ..SyncReport::default()
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["inserted"], 5);
        assert_eq!(json["updated"], 0);
    }
}
