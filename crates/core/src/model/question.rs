use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::QuestionId;
use crate::model::topic::Topic;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question {id} has an empty prompt")]
    EmptyPrompt { id: QuestionId },

    #[error("question {id} needs at least 2 choices, got {len}")]
    TooFewChoices { id: QuestionId, len: usize },

    #[error("question {id} answer index {answer} is out of range for {len} choices")]
    AnswerOutOfRange {
        id: QuestionId,
        answer: usize,
        len: usize,
    },

    #[error("question {id} choice order is not a permutation of its choices")]
    InvalidPermutation { id: QuestionId },

    #[error("duplicate question id {0} in bank")]
    DuplicateId(QuestionId),
}

//
// ─── QUESTION KIND ─────────────────────────────────────────────────────────────
//

/// Type-specific payload of a question, tagged by `"type"` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum QuestionKind {
    /// Pick one of `choices`; `answer` is the 0-based index of the correct one.
    #[serde(rename = "mcq")]
    MultipleChoice { choices: Vec<String>, answer: usize },
    /// True/false statement.
    #[serde(rename = "boolean")]
    Boolean { answer: bool },
    /// Free text, compared case-insensitively.
    #[serde(rename = "fill")]
    Fill { answer: String },
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A single quiz question as stored in the bank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    id: QuestionId,
    topic: Topic,
    #[serde(rename = "question")]
    prompt: String,
    #[serde(default)]
    explanation: String,
    #[serde(flatten)]
    kind: QuestionKind,
}

impl Question {
    /// Creates a validated question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the prompt is blank or a multiple-choice
    /// payload has fewer than two choices or an out-of-range answer.
    pub fn new(
        id: QuestionId,
        topic: Topic,
        prompt: impl Into<String>,
        explanation: impl Into<String>,
        kind: QuestionKind,
    ) -> Result<Self, QuestionError> {
        let question = Self {
            id,
            topic,
            prompt: prompt.into(),
            explanation: explanation.into(),
            kind,
        };
        question.validate()?;
        Ok(question)
    }

    /// Check invariants on a question that may have come from deserialization.
    ///
    /// # Errors
    ///
    /// Returns the first `QuestionError` found.
    pub fn validate(&self) -> Result<(), QuestionError> {
        if self.prompt.trim().is_empty() {
            return Err(QuestionError::EmptyPrompt { id: self.id });
        }
        if let QuestionKind::MultipleChoice { choices, answer } = &self.kind {
            if choices.len() < 2 {
                return Err(QuestionError::TooFewChoices {
                    id: self.id,
                    len: choices.len(),
                });
            }
            if *answer >= choices.len() {
                return Err(QuestionError::AnswerOutOfRange {
                    id: self.id,
                    answer: *answer,
                    len: choices.len(),
                });
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn topic(&self) -> &Topic {
        &self.topic
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    #[must_use]
    pub fn kind(&self) -> &QuestionKind {
        &self.kind
    }

    /// Choices for multiple-choice questions, `None` otherwise.
    #[must_use]
    pub fn choices(&self) -> Option<&[String]> {
        match &self.kind {
            QuestionKind::MultipleChoice { choices, .. } => Some(choices),
            _ => None,
        }
    }

    /// Returns a copy with choices reordered so that position `i` holds the
    /// original choice `order[i]`; the answer index follows its choice.
    ///
    /// Non multiple-choice questions are returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::InvalidPermutation` if `order` is not a
    /// permutation of `0..choices.len()`.
    pub fn with_choice_order(&self, order: &[usize]) -> Result<Self, QuestionError> {
        let QuestionKind::MultipleChoice { choices, answer } = &self.kind else {
            return Ok(self.clone());
        };

        let mut seen = vec![false; choices.len()];
        for &idx in order {
            match seen.get_mut(idx) {
                Some(slot) if !*slot => *slot = true,
                _ => return Err(QuestionError::InvalidPermutation { id: self.id }),
            }
        }
        if order.len() != choices.len() {
            return Err(QuestionError::InvalidPermutation { id: self.id });
        }

        let permuted: Vec<String> = order.iter().map(|&idx| choices[idx].clone()).collect();
        let new_answer = order
            .iter()
            .position(|&idx| idx == *answer)
            .ok_or(QuestionError::InvalidPermutation { id: self.id })?;

        Ok(Self {
            kind: QuestionKind::MultipleChoice {
                choices: permuted,
                answer: new_answer,
            },
            ..self.clone()
        })
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
