use chrono::{DateTime, Utc};

use quiz_core::grader::grade;
use quiz_core::model::{
    BOOLEAN_CHOICES, Question, QuestionId, QuestionKind, RecordedAnswer, ScoreEntry, Topic,
    TopicFilter, boolean_from_index, index_from_boolean, percent,
};

/// Final outcome of a completed session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionResult {
    pub correct: u32,
    pub total: u32,
    pub percent: u32,
    pub topics: TopicFilter,
    pub completed_at: DateTime<Utc>,
}

impl SessionResult {
    #[must_use]
    pub fn new(correct: u32, total: u32, topics: TopicFilter, completed_at: DateTime<Utc>) -> Self {
        Self {
            correct,
            total,
            percent: percent(correct, total),
            topics,
            completed_at,
        }
    }

    /// Ledger row for this result, dated at completion.
    #[must_use]
    pub fn to_score_entry(&self) -> ScoreEntry {
        ScoreEntry::new(self.correct, self.total, &self.topics, self.completed_at)
    }
}

/// One row of the post-quiz review list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionReview {
    pub question_id: QuestionId,
    pub topic: Topic,
    pub prompt: String,
    /// What the user answered, as display text; `None` when blank.
    pub your_answer: Option<String>,
    pub correct_answer: String,
    pub correct: bool,
    pub explanation: String,
}

impl QuestionReview {
    #[must_use]
    pub fn new(question: &Question, answer: Option<&RecordedAnswer>) -> Self {
        Self {
            question_id: question.id(),
            topic: question.topic().clone(),
            prompt: question.prompt().to_owned(),
            your_answer: describe_answer(question, answer),
            correct_answer: describe_expected(question),
            correct: grade(question, answer),
            explanation: question.explanation().to_owned(),
        }
    }
}

fn boolean_label(value: bool) -> &'static str {
    BOOLEAN_CHOICES[index_from_boolean(value)].0
}

/// Render a recorded answer the way the user saw it.
#[must_use]
pub fn describe_answer(question: &Question, answer: Option<&RecordedAnswer>) -> Option<String> {
    let answer = answer?;
    match question.kind() {
        QuestionKind::MultipleChoice { choices, .. } => choices.get(answer.as_choice()?).cloned(),
        QuestionKind::Boolean { .. } => {
            let value = boolean_from_index(answer.as_choice()?);
            Some(boolean_label(value).to_owned())
        }
        QuestionKind::Fill { .. } => match answer.as_text() {
            Some(text) if !text.is_empty() => Some(text.to_owned()),
            _ => None,
        },
    }
}

fn describe_expected(question: &Question) -> String {
    match question.kind() {
        QuestionKind::MultipleChoice { choices, answer } => {
            choices.get(*answer).cloned().unwrap_or_default()
        }
        QuestionKind::Boolean { answer } => boolean_label(*answer).to_owned(),
        QuestionKind::Fill { answer } => answer.clone(),
    }
}
