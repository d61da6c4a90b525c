use std::collections::HashSet;

use crate::model::ids::QuestionId;
use crate::model::question::{Question, QuestionError};
use crate::model::topic::Topic;

/// Immutable, validated catalog of questions.
///
/// Ids are unique and every question passes `Question::validate`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    /// Build a bank from raw questions.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::DuplicateId` when two questions share an id,
    /// or the validation error of the first invalid question.
    pub fn new(questions: Vec<Question>) -> Result<Self, QuestionError> {
        let mut ids = HashSet::with_capacity(questions.len());
        for question in &questions {
            question.validate()?;
            if !ids.insert(question.id()) {
                return Err(QuestionError::DuplicateId(question.id()));
            }
        }
        Ok(Self { questions })
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: QuestionId) -> Option<&Question> {
        self.questions.iter().find(|q| q.id() == id)
    }

    /// Distinct topics in order of first appearance.
    #[must_use]
    pub fn topics(&self) -> Vec<Topic> {
        let mut out: Vec<Topic> = Vec::new();
        for question in &self.questions {
            if !out.contains(question.topic()) {
                out.push(question.topic().clone());
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::QuestionKind;

    fn question(id: u64, topic: &str) -> Question {
        Question::new(
            QuestionId::new(id),
            Topic::new(topic).unwrap(),
            format!("Q{id}"),
            "",
            QuestionKind::Boolean { answer: true },
        )
        .unwrap()
    }

    #[test]
    fn topics_in_first_appearance_order() {
        let bank = QuestionBank::new(vec![
            question(1, "music"),
            question(2, "coding"),
            question(3, "music"),
        ])
        .unwrap();
        let names: Vec<_> = bank
            .topics()
            .iter()
            .map(|t| t.as_str().to_owned())
            .collect();
        assert_eq!(names, ["music", "coding"]);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let err = QuestionBank::new(vec![question(1, "a"), question(1, "b")]).unwrap_err();
        assert_eq!(err, QuestionError::DuplicateId(QuestionId::new(1)));
    }

    #[test]
    fn lookup_by_id() {
        let bank = QuestionBank::new(vec![question(5, "a")]).unwrap();
        assert!(bank.get(QuestionId::new(5)).is_some());
        assert!(bank.get(QuestionId::new(6)).is_none());
        assert!(!bank.is_empty());
        assert!(QuestionBank::empty().is_empty());
    }
}
