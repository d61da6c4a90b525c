use std::sync::Arc;

use rand::Rng;

use quiz_core::model::{QuestionBank, QuizSettings, ScoreEntry, TopicFilter};

use super::service::QuizSession;
use crate::Clock;
use crate::error::SessionError;
use crate::ledger_service::LedgerService;
use crate::preference_service::TopicPreferenceService;

/// What a successful submission produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub score: u32,
    pub total: u32,
    pub percent: u32,
    pub entry: ScoreEntry,
    /// 1-based position in the ledger after recording, if the entry was kept.
    pub rank: Option<usize>,
}

/// Drives a quiz from topic selection to a recorded score.
#[derive(Clone)]
pub struct QuizLoopService {
    clock: Clock,
    bank: Arc<QuestionBank>,
    settings: QuizSettings,
    ledger: LedgerService,
    preferences: TopicPreferenceService,
}

impl QuizLoopService {
    #[must_use]
    pub fn new(
        clock: Clock,
        bank: Arc<QuestionBank>,
        settings: QuizSettings,
        ledger: LedgerService,
        preferences: TopicPreferenceService,
    ) -> Self {
        Self {
            clock,
            bank,
            settings,
            ledger,
            preferences,
        }
    }

    #[must_use]
    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    #[must_use]
    pub fn settings(&self) -> &QuizSettings {
        &self.settings
    }

    /// Start a session on the saved topic preference.
    pub async fn start_session(&self) -> QuizSession {
        let topics = self.preferences.load().await;
        let mut rng = rand::rng();
        self.start_session_with(topics, &mut rng)
    }

    /// Start a session on explicit topics with a caller-supplied rng.
    pub fn start_session_with<R: Rng + ?Sized>(
        &self,
        topics: TopicFilter,
        rng: &mut R,
    ) -> QuizSession {
        let session = QuizSession::start(
            &self.bank,
            topics,
            self.settings.quiz_length(),
            rng,
            self.clock.now(),
        );
        if session.fell_back() {
            tracing::warn!(
                topics = %session.topics().label(),
                "no questions for requested topics; using all topics"
            );
        }
        session
    }

    /// Fresh session with the same topics and length as `session`.
    #[must_use]
    pub fn restart(&self, session: &QuizSession) -> QuizSession {
        let mut rng = rand::rng();
        session.restart(&self.bank, &mut rng, self.clock.now())
    }

    /// Grade `session` and record the score.
    ///
    /// Ledger failures are logged by the ledger and do not fail the submission.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the session cannot be submitted; nothing is
    /// recorded in that case.
    pub async fn submit(&self, session: &mut QuizSession) -> Result<SubmitOutcome, SessionError> {
        session.submit(self.clock.now())?;
        let result = session.result().ok_or(SessionError::Empty)?;
        let entry = result.to_score_entry();

        let (_, rank) = self.ledger.record_ranked(entry.clone()).await;

        Ok(SubmitOutcome {
            score: result.correct,
            total: result.total,
            percent: result.percent,
            entry,
            rank,
        })
    }
}
