use std::cmp::Ordering;
use std::sync::Arc;

use quiz_core::model::{QuizSettings, ScoreEntry, rank_entries};
use storage::repository::KeyValueStore;

use crate::error::LedgerError;

/// Storage key holding the JSON list of score entries.
pub const HIGH_SCORES_KEY: &str = "highScores";

/// Locally persisted high-score ledger.
///
/// Scores are not critical data: read failures and corrupt values degrade to
/// an empty ledger, and write failures are logged and dropped.
#[derive(Clone)]
pub struct LedgerService {
    store: Arc<dyn KeyValueStore>,
    capacity: usize,
    leaderboard_size: usize,
}

impl LedgerService {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>, settings: &QuizSettings) -> Self {
        Self {
            store,
            capacity: settings.ledger_capacity(),
            leaderboard_size: settings.leaderboard_size(),
        }
    }

    /// Read the stored ledger.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError` if storage fails or the value is not a list of entries.
    pub async fn try_load(&self) -> Result<Vec<ScoreEntry>, LedgerError> {
        let Some(raw) = self.store.get(HIGH_SCORES_KEY).await? else {
            return Ok(Vec::new());
        };
        Ok(serde_json::from_str(&raw)?)
    }

    /// Read the stored ledger, or an empty one if it cannot be read.
    pub async fn load(&self) -> Vec<ScoreEntry> {
        match self.try_load().await {
            Ok(entries) => entries,
            Err(err) => {
                tracing::warn!(error = %err, "high scores unreadable; starting empty");
                Vec::new()
            }
        }
    }

    /// Write the ledger.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError` if serialization or storage fails.
    pub async fn try_save(&self, entries: &[ScoreEntry]) -> Result<(), LedgerError> {
        let raw = serde_json::to_string(entries)?;
        self.store.set(HIGH_SCORES_KEY, &raw).await?;
        Ok(())
    }

    /// Best-effort write; failures are logged.
    pub async fn save(&self, entries: &[ScoreEntry]) {
        if let Err(err) = self.try_save(entries).await {
            tracing::warn!(error = %err, "failed to save high scores");
        }
    }

    /// Insert `entry`, keep the top entries and persist.
    ///
    /// Returns the ledger as it was written.
    pub async fn record(&self, entry: ScoreEntry) -> Vec<ScoreEntry> {
        self.record_ranked(entry).await.0
    }

    /// Like [`record`](Self::record), also returning the 1-based rank of
    /// `entry`, or `None` if it fell past the ledger capacity.
    ///
    /// A new entry ranks after every stored entry it ties with.
    pub async fn record_ranked(&self, entry: ScoreEntry) -> (Vec<ScoreEntry>, Option<usize>) {
        let mut entries = self.load().await;
        rank_entries(&mut entries, usize::MAX);
        let idx = entries.partition_point(|e| e.rank_cmp(&entry) != Ordering::Greater);
        entries.insert(idx, entry);
        entries.truncate(self.capacity);
        self.save(&entries).await;
        let rank = (idx < self.capacity).then_some(idx + 1);
        (entries, rank)
    }

    /// Leading entries for display.
    pub async fn top(&self) -> Vec<ScoreEntry> {
        let mut entries = self.load().await;
        entries.truncate(self.leaderboard_size);
        entries
    }

    /// Forget every stored score. Best effort.
    pub async fn clear(&self) {
        if let Err(err) = self.store.remove(HIGH_SCORES_KEY).await {
            tracing::warn!(error = %err, "failed to clear high scores");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use quiz_core::model::TopicFilter;
    use quiz_core::time::fixed_now;
    use storage::repository::{InMemoryRepository, StorageError};

    struct FailingStore;

    #[async_trait]
    impl KeyValueStore for FailingStore {
        async fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Connection("unavailable".into()))
        }

        async fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Connection("unavailable".into()))
        }

        async fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Connection("unavailable".into()))
        }
    }

    fn entry(correct: u32, total: u32) -> ScoreEntry {
        ScoreEntry::new(correct, total, &TopicFilter::all(), fixed_now())
    }

    fn ledger(repo: &InMemoryRepository) -> LedgerService {
        LedgerService::new(Arc::new(repo.clone()), &QuizSettings::default())
    }

    #[tokio::test]
    async fn record_keeps_entries_ranked() {
        let repo = InMemoryRepository::new();
        let ledger = ledger(&repo);

        ledger.record(entry(8, 10)).await;
        ledger.record(entry(19, 20)).await;
        ledger.record(entry(7, 10)).await;

        let percents: Vec<_> = ledger.load().await.iter().map(|e| e.percent).collect();
        assert_eq!(percents, [95, 80, 70]);
    }

    #[tokio::test]
    async fn ties_prefer_shorter_quizzes() {
        let repo = InMemoryRepository::new();
        let ledger = ledger(&repo);

        ledger.record(entry(8, 10)).await;
        ledger.record(entry(4, 5)).await;

        let totals: Vec<_> = ledger.load().await.iter().map(|e| e.total).collect();
        assert_eq!(totals, [5, 10]);
    }

    #[tokio::test]
    async fn rank_counts_identical_entries_already_stored() {
        let repo = InMemoryRepository::new();
        let ledger = ledger(&repo);

        let (_, first) = ledger.record_ranked(entry(3, 4)).await;
        let (written, second) = ledger.record_ranked(entry(3, 4)).await;
        assert_eq!(first, Some(1));
        assert_eq!(second, Some(2));
        assert_eq!(written.len(), 2);

        let (_, better) = ledger.record_ranked(entry(4, 4)).await;
        assert_eq!(better, Some(1));
    }

    #[tokio::test]
    async fn rank_is_none_past_capacity() {
        let repo = InMemoryRepository::new();
        let settings = QuizSettings::new(10, 2, 2).unwrap();
        let ledger = LedgerService::new(Arc::new(repo.clone()), &settings);
        ledger.record(entry(9, 10)).await;
        ledger.record(entry(8, 10)).await;

        let (written, rank) = ledger.record_ranked(entry(8, 10)).await;
        assert_eq!(rank, None);
        let percents: Vec<_> = written.iter().map(|e| e.percent).collect();
        assert_eq!(percents, [90, 80]);
    }

    #[tokio::test]
    async fn ledger_is_capped_and_top_is_limited() {
        let repo = InMemoryRepository::new();
        let ledger = ledger(&repo);
        for correct in 0..=60 {
            ledger.record(entry(correct, 60)).await;
        }
        let all = ledger.load().await;
        assert_eq!(all.len(), 50);
        assert_eq!(all[0].correct, 60);

        let top = ledger.top().await;
        assert_eq!(top.len(), 10);
        assert_eq!(top[9].correct, 51);
    }

    #[tokio::test]
    async fn corrupt_value_reads_as_empty() {
        let repo = InMemoryRepository::new();
        repo.set(HIGH_SCORES_KEY, "{not json").await.unwrap();
        let ledger = ledger(&repo);

        assert!(ledger.try_load().await.is_err());
        assert!(ledger.load().await.is_empty());

        let written = ledger.record(entry(1, 2)).await;
        assert_eq!(written.len(), 1);
        assert_eq!(ledger.load().await, written);
    }

    #[tokio::test]
    async fn storage_failures_are_swallowed() {
        let ledger = LedgerService::new(Arc::new(FailingStore), &QuizSettings::default());
        assert!(ledger.load().await.is_empty());
        let written = ledger.record(entry(3, 4)).await;
        assert_eq!(written.len(), 1);
        ledger.clear().await;
        assert!(ledger.top().await.is_empty());
    }

    #[tokio::test]
    async fn clear_removes_scores() {
        let repo = InMemoryRepository::new();
        let ledger = ledger(&repo);
        ledger.record(entry(1, 1)).await;
        ledger.clear().await;
        assert!(ledger.load().await.is_empty());
        assert_eq!(repo.get(HIGH_SCORES_KEY).await.unwrap(), None);
    }
}
