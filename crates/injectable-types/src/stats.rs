//! Run statistics reported by an extraction run.

/// Counters accumulated over a whole extraction run.
///
/// Counters only ever increase. `skipped` is the sum of `duplicates`
/// (rejected by the in-run key set) and `existing` (rejected by the store's
/// existence check).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunStatistics {
    /// Terms accepted by the classifier that yielded a loadable template.
    pub found: u64,
    /// Templates inserted into the catalog.
    pub inserted: u64,
    /// Templates not inserted because they were already known.
    pub skipped: u64,
    /// Templates whose insert failed.
    pub errors: u64,
    /// Skips caused by a repeated name and dose.
    pub duplicates: u64,
    /// Skips caused by a template name already present in the catalog.
    pub existing: u64,
    /// Source files read to the end.
    pub files_processed: u64,
    /// Source files that could not be opened.
    pub files_missing: u64,
    /// Data lines read with enough fields to form a record.
    pub records_read: u64,
    /// Lines skipped for being short or undecodable.
    pub malformed_lines: u64,
}

impl RunStatistics {
    /// Records a template dropped by the in-run key set.
    pub fn record_duplicate(&mut self) {
        self.duplicates += 1;
        self.skipped += 1;
    }

    /// Records a template dropped by the catalog existence check.
    pub fn record_existing(&mut self) {
        self.existing += 1;
        self.skipped += 1;
    }

    /// Percentage of found templates that were inserted.
    pub fn insert_rate(&self) -> f64 {
        if self.found == 0 {
            0.0
        } else {
            (self.inserted as f64 / self.found as f64) * 100.0
        }
    }
}

/// Outcome of a completed run.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunReport {
    /// Run counters.
    pub statistics: RunStatistics,
    /// Catalog rows before the run.
    pub catalog_before: u64,
    /// Catalog rows after the run.
    pub catalog_after: u64,
    /// Wall-clock duration in milliseconds.
    pub elapsed_ms: u64,
}

impl RunReport {
    /// Net rows added to the catalog by the run.
    pub fn catalog_growth(&self) -> u64 {
        self.catalog_after.saturating_sub(self.catalog_before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skip_counters() {
        let mut stats = RunStatistics::default();
        stats.record_duplicate();
        stats.record_existing();
        stats.record_existing();
        assert_eq!(stats.skipped, 3);
        assert_eq!(stats.duplicates, 1);
        assert_eq!(stats.existing, 2);
    }

    #[test]
    fn test_insert_rate() {
        let stats = RunStatistics {
            found: 8,
            inserted: 6,
            ..Default::default()
        };
        assert!((stats.insert_rate() - 75.0).abs() < 0.01);
        assert_eq!(RunStatistics::default().insert_rate(), 0.0);
    }

    #[test]
    fn test_catalog_growth() {
        let report = RunReport {
            catalog_before: 10,
            catalog_after: 14,
            ..Default::default()
        };
        assert_eq!(report.catalog_growth(), 4);
    }
}
