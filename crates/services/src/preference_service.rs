use std::sync::Arc;

use quiz_core::model::TopicFilter;
use storage::repository::KeyValueStore;

use crate::error::LedgerError;

/// Storage key holding the JSON list of preferred topics.
pub const TOPICS_KEY: &str = "quizTopics";

/// Remembers which topics the user wants to be quizzed on.
#[derive(Clone)]
pub struct TopicPreferenceService {
    store: Arc<dyn KeyValueStore>,
}

impl TopicPreferenceService {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Read the saved filter.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError` if storage fails or the value is malformed.
    pub async fn try_load(&self) -> Result<TopicFilter, LedgerError> {
        let Some(raw) = self.store.get(TOPICS_KEY).await? else {
            return Ok(TopicFilter::all());
        };
        Ok(serde_json::from_str(&raw)?)
    }

    /// Saved filter, or the unrestricted filter if none can be read.
    pub async fn load(&self) -> TopicFilter {
        match self.try_load().await {
            Ok(filter) => filter,
            Err(err) => {
                tracing::warn!(error = %err, "topic preference unreadable; using all topics");
                TopicFilter::all()
            }
        }
    }

    /// Persist `filter`. Best effort.
    pub async fn save(&self, filter: &TopicFilter) {
        let raw = match serde_json::to_string(filter) {
            Ok(raw) => raw,
            Err(err) => {
                tracing::warn!(error = %err, "failed to encode topic preference");
                return;
            }
        };
        if let Err(err) = self.store.set(TOPICS_KEY, &raw).await {
            tracing::warn!(error = %err, "failed to save topic preference");
        }
    }

    /// Drop the saved filter. Best effort.
    pub async fn clear(&self) {
        if let Err(err) = self.store.remove(TOPICS_KEY).await {
            tracing::warn!(error = %err, "failed to clear topic preference");
        }
    }
}
