use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::topic::TopicFilter;

/// Whole-number percentage of `correct` out of `total`, rounded half up.
///
/// Returns 0 for an empty quiz.
#[must_use]
pub fn percent(correct: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    let correct = u64::from(correct.min(total));
    let total = u64::from(total);
    let rounded = (correct * 200 + total) / (total * 2);
    u32::try_from(rounded).unwrap_or(100)
}

/// One row of the high-score ledger.
///
/// Dates are stored as Unix milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub date: DateTime<Utc>,
    pub percent: u32,
    pub correct: u32,
    pub total: u32,
    pub topics: String,
}

impl ScoreEntry {
    #[must_use]
    pub fn new(correct: u32, total: u32, topics: &TopicFilter, date: DateTime<Utc>) -> Self {
        Self {
            date,
            percent: percent(correct, total),
            correct,
            total,
            topics: topics.label(),
        }
    }

    /// Ledger ordering: higher percent first, then fewer questions first.
    #[must_use]
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        other
            .percent
            .cmp(&self.percent)
            .then_with(|| self.total.cmp(&other.total))
    }
}

/// Sort entries into ledger order and keep at most `capacity` of them.
///
/// The sort is stable, so entries that tie keep their insertion order.
pub fn rank_entries(entries: &mut Vec<ScoreEntry>, capacity: usize) {
    entries.sort_by(ScoreEntry::rank_cmp);
    entries.truncate(capacity);
}
