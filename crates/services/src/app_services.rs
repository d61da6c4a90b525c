use std::sync::Arc;

use quiz_core::model::{QuestionBank, QuizSettings};
use storage::repository::Storage;

use crate::Clock;
use crate::error::AppServicesError;
use crate::ledger_service::LedgerService;
use crate::preference_service::TopicPreferenceService;
use crate::sessions::QuizLoopService;

/// Assembles app-facing services over one storage backend.
#[derive(Clone)]
pub struct AppServices {
    quiz_loop: Arc<QuizLoopService>,
    ledger: Arc<LedgerService>,
    preferences: Arc<TopicPreferenceService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the database cannot be opened or migrated.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        bank: QuestionBank,
        settings: QuizSettings,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::from_storage(&storage, clock, bank, settings))
    }

    /// Build services over process-local storage.
    #[must_use]
    pub fn in_memory(clock: Clock, bank: QuestionBank, settings: QuizSettings) -> Self {
        Self::from_storage(&Storage::in_memory(), clock, bank, settings)
    }

    #[must_use]
    pub fn from_storage(
        storage: &Storage,
        clock: Clock,
        bank: QuestionBank,
        settings: QuizSettings,
    ) -> Self {
        let ledger = LedgerService::new(Arc::clone(&storage.kv), &settings);
        let preferences = TopicPreferenceService::new(Arc::clone(&storage.kv));
        let quiz_loop = QuizLoopService::new(
            clock,
            Arc::new(bank),
            settings,
            ledger.clone(),
            preferences.clone(),
        );

        Self {
            quiz_loop: Arc::new(quiz_loop),
            ledger: Arc::new(ledger),
            preferences: Arc::new(preferences),
        }
    }

    #[must_use]
    pub fn quiz_loop(&self) -> Arc<QuizLoopService> {
        Arc::clone(&self.quiz_loop)
    }

    #[must_use]
    pub fn ledger(&self) -> Arc<LedgerService> {
        Arc::clone(&self.ledger)
    }

    #[must_use]
    pub fn preferences(&self) -> Arc<TopicPreferenceService> {
        Arc::clone(&self.preferences)
    }
}
