use chrono::{DateTime, Utc};

//
// ─── ATTEMPT RECORD ────────────────────────────────────────────────────────────
//

/// A single learner response to an exercise item.
///
/// Records are immutable once created. Only `correct` takes part in progress
/// computation; the timestamp is kept for the host's own bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttemptRecord {
    correct: bool,
    answered_at: Option<DateTime<Utc>>,
}

impl AttemptRecord {
    /// Creates a record without a timestamp.
    #[must_use]
    pub fn new(correct: bool) -> Self {
        Self {
            correct,
            answered_at: None,
        }
    }

    #[must_use]
    pub fn correct() -> Self {
        Self::new(true)
    }

    #[must_use]
    pub fn incorrect() -> Self {
        Self::new(false)
    }

    /// Creates a record stamped with the time the response was given.
    #[must_use]
    pub fn answered(correct: bool, answered_at: DateTime<Utc>) -> Self {
        Self {
            correct,
            answered_at: Some(answered_at),
        }
    }

    #[must_use]
    pub fn is_correct(&self) -> bool {
        self.correct
    }

    #[must_use]
    pub fn answered_at(&self) -> Option<DateTime<Utc>> {
        self.answered_at
    }
}

//
// ─── ATTEMPT LOG ───────────────────────────────────────────────────────────────
//

/// Chronological, append-only sequence of attempt records for one exercise run.
///
/// Every mutation bumps `revision`, so hosts can key cached results on it
/// instead of comparing whole logs.
#[derive(Debug, Clone, Default)]
pub struct AttemptLog {
    records: Vec<AttemptRecord>,
    revision: u64,
}

impl AttemptLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a log from records already in chronological order.
    #[must_use]
    pub fn from_records(records: Vec<AttemptRecord>) -> Self {
        Self {
            records,
            revision: 0,
        }
    }

    /// Appends a record at the end of the log.
    pub fn push(&mut self, record: AttemptRecord) {
        self.records.push(record);
        self.revision = self.revision.wrapping_add(1);
    }

    /// Discards all records. Used when the learner starts the exercise over.
    pub fn reset(&mut self) {
        self.records.clear();
        self.revision = self.revision.wrapping_add(1);
    }

    #[must_use]
    pub fn records(&self) -> &[AttemptRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AttemptRecord> {
        self.records.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of correct records over the whole log.
    #[must_use]
    pub fn correct_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_correct()).count()
    }

    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

impl PartialEq for AttemptLog {
    fn eq(&self, other: &Self) -> bool {
        self.records == other.records
    }
}

impl Eq for AttemptLog {}

impl FromIterator<AttemptRecord> for AttemptLog {
    fn from_iter<I: IntoIterator<Item = AttemptRecord>>(iter: I) -> Self {
        Self::from_records(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a AttemptLog {
    type Item = &'a AttemptRecord;
    type IntoIter = std::slice::Iter<'a, AttemptRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn record_keeps_timestamp() {
        let now = fixed_now();
        let record = AttemptRecord::answered(true, now);
        assert!(record.is_correct());
        assert_eq!(record.answered_at(), Some(now));
        assert_eq!(AttemptRecord::incorrect().answered_at(), None);
    }

    #[test]
    fn counts_correct_records_over_whole_log() {
        let log: AttemptLog = [true, false, true, false, false, true]
            .into_iter()
            .map(AttemptRecord::new)
            .collect();
        assert_eq!(log.len(), 6);
        assert_eq!(log.correct_count(), 3);
        assert_eq!(log.iter().filter(|r| !r.is_correct()).count(), 3);
        assert!((&log).into_iter().next().is_some_and(|r| r.is_correct()));
    }

    #[test]
    fn push_and_reset_bump_revision() {
        let mut log = AttemptLog::new();
        assert_eq!(log.revision(), 0);

        log.push(AttemptRecord::correct());
        log.push(AttemptRecord::incorrect());
        assert_eq!(log.revision(), 2);
        assert_eq!(log.len(), 2);

        log.reset();
        assert!(log.is_empty());
        assert_eq!(log.revision(), 3);
    }

    #[test]
    fn equality_ignores_revision() {
        let mut grown = AttemptLog::new();
        grown.push(AttemptRecord::correct());
        let built = AttemptLog::from_records(vec![AttemptRecord::correct()]);
        assert_ne!(grown.revision(), built.revision());
        assert_eq!(grown, built);
    }
}
