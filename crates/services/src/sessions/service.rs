use chrono::{DateTime, Utc};
use rand::Rng;
use std::collections::HashMap;
use std::fmt;

use quiz_core::grader::calculate_score;
use quiz_core::model::{QuestionBank, QuestionId, RecordedAnswer, TopicFilter};

use super::plan::{QuestionSelector, SelectedQuestion};
use super::progress::SessionProgress;
use super::review::{QuestionReview, SessionResult};
use crate::error::SessionError;

//
// ─── STATE ─────────────────────────────────────────────────────────────────────
//

/// Where a session stands in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No questions could be selected.
    Empty,
    /// Before the last question.
    InProgress,
    /// On the last question, not yet submitted.
    AtLastQuestion,
    /// Submitted and graded. Terminal.
    Complete,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One run of the quiz, from start to submission.
///
/// The question order is fixed when the session starts. Answers can be
/// recorded for any question in the order until the session is submitted.
pub struct QuizSession {
    order: Vec<SelectedQuestion>,
    current: usize,
    answers: HashMap<QuestionId, RecordedAnswer>,
    score: u32,
    topics: TopicFilter,
    length: usize,
    fell_back: bool,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl QuizSession {
    /// Select questions and open a fresh session.
    ///
    /// Never fails: an empty bank or pool yields a session in `SessionState::Empty`.
    pub fn start<R: Rng + ?Sized>(
        bank: &QuestionBank,
        topics: TopicFilter,
        length: usize,
        rng: &mut R,
        started_at: DateTime<Utc>,
    ) -> Self {
        let plan = QuestionSelector::new(bank, &topics, length).select(rng);
        tracing::debug!(
            questions = plan.total(),
            topics = %topics.label(),
            "quiz session started"
        );
        Self {
            order: plan.questions,
            current: 0,
            answers: HashMap::new(),
            score: 0,
            topics,
            length,
            fell_back: plan.fell_back,
            started_at,
            completed_at: None,
        }
    }

    /// Start over with the same bank, topics and length; the order is redrawn.
    #[must_use]
    pub fn restart<R: Rng + ?Sized>(
        &self,
        bank: &QuestionBank,
        rng: &mut R,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self::start(bank, self.topics.clone(), self.length, rng, started_at)
    }

    #[must_use]
    pub fn topics(&self) -> &TopicFilter {
        &self.topics
    }

    /// Length requested at start; the actual order may be shorter.
    #[must_use]
    pub fn requested_length(&self) -> usize {
        self.length
    }

    #[must_use]
    pub fn fell_back(&self) -> bool {
        self.fell_back
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    #[must_use]
    pub fn questions(&self) -> &[SelectedQuestion] {
        &self.order
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&SelectedQuestion> {
        self.order.get(self.current)
    }

    #[must_use]
    pub fn answer_for(&self, id: QuestionId) -> Option<&RecordedAnswer> {
        self.answers.get(&id)
    }

    #[must_use]
    pub fn answers(&self) -> &HashMap<QuestionId, RecordedAnswer> {
        &self.answers
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.completed_at.is_some()
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        if self.is_complete() {
            SessionState::Complete
        } else if self.order.is_empty() {
            SessionState::Empty
        } else if self.current + 1 >= self.order.len() {
            SessionState::AtLastQuestion
        } else {
            SessionState::InProgress
        }
    }

    /// Whether `id` has a recorded, non-blank answer.
    #[must_use]
    pub fn is_answered(&self, id: QuestionId) -> bool {
        self.answers
            .get(&id)
            .is_some_and(RecordedAnswer::is_answered)
    }

    #[must_use]
    pub fn current_answered(&self) -> bool {
        self.current_question().is_some_and(|q| self.is_answered(q.id()))
    }

    /// True when `advance` would succeed.
    #[must_use]
    pub fn can_advance(&self) -> bool {
        self.state() == SessionState::InProgress && self.current_answered()
    }

    /// True when `submit` would succeed.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        self.state() == SessionState::AtLastQuestion && self.current_answered()
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        SessionProgress {
            position: (self.current + 1).min(self.order.len()),
            total: self.order.len(),
            answered: self
                .order
                .iter()
                .filter(|q| self.is_answered(q.id()))
                .count(),
            is_complete: self.is_complete(),
        }
    }

    /// Record (or replace) the answer for a question in this session.
    ///
    /// Text answers are trimmed before they are stored. The value's shape is
    /// not checked against the question kind; grading treats a mismatch as
    /// incorrect.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` after submission and
    /// `SessionError::UnknownQuestion` if `id` is not in the order.
    pub fn record_answer(
        &mut self,
        id: QuestionId,
        answer: RecordedAnswer,
    ) -> Result<(), SessionError> {
        if self.is_complete() {
            return Err(SessionError::Completed);
        }
        if !self.order.iter().any(|q| q.id() == id) {
            return Err(SessionError::UnknownQuestion(id));
        }
        self.answers.insert(id, answer.normalized());
        Ok(())
    }

    /// Record an answer for the current question and return its id.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` when there is no current question, or
    /// any error from `record_answer`.
    pub fn record_current(&mut self, answer: RecordedAnswer) -> Result<QuestionId, SessionError> {
        let id = self.current_question().ok_or(SessionError::Empty)?.id();
        self.record_answer(id, answer)?;
        Ok(id)
    }

    /// Move to the next question.
    ///
    /// # Errors
    ///
    /// Leaves the session unchanged and returns why it is not ready:
    /// `Completed`, `Empty`, `AtLastQuestion` or `Unanswered`.
    pub fn advance(&mut self) -> Result<&SelectedQuestion, SessionError> {
        match self.state() {
            SessionState::Complete => return Err(SessionError::Completed),
            SessionState::Empty => return Err(SessionError::Empty),
            SessionState::AtLastQuestion => return Err(SessionError::AtLastQuestion),
            SessionState::InProgress => {}
        }
        if !self.current_answered() {
            return Err(SessionError::Unanswered);
        }

        self.current += 1;
        tracing::debug!(index = self.current, "advanced to next question");
        self.order
            .get(self.current)
            .ok_or(SessionError::AtLastQuestion)
    }

    /// Grade every question and complete the session.
    ///
    /// `completed_at` should come from the services layer clock.
    ///
    /// # Errors
    ///
    /// Leaves the session unchanged and returns `Completed`, `Empty`,
    /// `NotAtLastQuestion` or `Unanswered` when submission is not allowed.
    /// A second submit reports `Completed` and keeps the first score.
    pub fn submit(&mut self, completed_at: DateTime<Utc>) -> Result<u32, SessionError> {
        match self.state() {
            SessionState::Complete => return Err(SessionError::Completed),
            SessionState::Empty => return Err(SessionError::Empty),
            SessionState::InProgress => return Err(SessionError::NotAtLastQuestion),
            SessionState::AtLastQuestion => {}
        }
        if !self.current_answered() {
            return Err(SessionError::Unanswered);
        }

        let questions = self.order.iter().map(SelectedQuestion::question);
        self.score = calculate_score(questions, &self.answers);
        self.completed_at = Some(completed_at);
        tracing::info!(
            score = self.score,
            total = self.order.len(),
            topics = %self.topics.label(),
            "quiz session completed"
        );
        Ok(self.score)
    }

    /// Number of correct answers; `None` until the session is complete.
    #[must_use]
    pub fn score(&self) -> Option<u32> {
        self.is_complete().then_some(self.score)
    }

    /// Final outcome; `None` until the session is complete.
    #[must_use]
    pub fn result(&self) -> Option<SessionResult> {
        let completed_at = self.completed_at?;
        let total = u32::try_from(self.order.len()).unwrap_or(u32::MAX);
        Some(SessionResult::new(
            self.score,
            total,
            self.topics.clone(),
            completed_at,
        ))
    }

    /// Per-question review rows; `None` until the session is complete.
    #[must_use]
    pub fn review(&self) -> Option<Vec<QuestionReview>> {
        if !self.is_complete() {
            return None;
        }
        Some(
            self.order
                .iter()
                .map(|q| QuestionReview::new(q.question(), self.answers.get(&q.id())))
                .collect(),
        )
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("order_len", &self.order.len())
            .field("current", &self.current)
            .field("answers_len", &self.answers.len())
            .field("topics", &self.topics)
            .field("started_at", &self.started_at)
            .field("completed_at", &self.completed_at)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
