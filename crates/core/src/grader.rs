//! Answer grading.
//!
//! Grading is a pure function of the question and the recorded answer. Text
//! answers are compared case-insensitively and are *not* trimmed here; any
//! trimming happens when the answer is recorded.

use std::collections::HashMap;

use crate::model::{Question, QuestionId, QuestionKind, RecordedAnswer, boolean_from_index};

/// Returns true when `answer` is correct for `question`.
///
/// A missing answer, or one whose shape does not fit the question kind, is
/// never correct.
#[must_use]
pub fn grade(question: &Question, answer: Option<&RecordedAnswer>) -> bool {
    let Some(given) = answer else { return false; };

    match question.kind() {
        QuestionKind::MultipleChoice { answer, .. } => given.as_choice() == Some(*answer),
        QuestionKind::Boolean { answer } => {
            given.as_choice().map(boolean_from_index) == Some(*answer)
        }
        QuestionKind::Fill { answer } => match given.as_text() {
            Some(text) => text.to_lowercase() == answer.to_lowercase(),
            None => false,
        },
    }
}

/// Count correct answers over `questions`, looking each one up in `answers`.
#[must_use]
pub fn calculate_score<'a>(
    questions: impl IntoIterator<Item = &'a Question>,
    answers: &HashMap<QuestionId, RecordedAnswer>,
) -> u32 {
    questions
        .into_iter()
        .filter(|q| grade(q, answers.get(&q.id())))
        .fold(0_u32, |acc, _| acc.saturating_add(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Topic;

    fn question(id: u64, kind: QuestionKind) -> Question {
        Question::new(
            QuestionId::new(id),
            Topic::new("t").unwrap(),
            "Q",
            "E",
            kind,
        )
        .unwrap()
    }

    fn abc(answer: usize) -> Question {
        question(
            1,
            QuestionKind::MultipleChoice {
                choices: vec!["a".into(), "b".into(), "c".into()],
                answer,
            },
        )
    }

    #[test]
    fn mcq_matches_index() {
        let q = abc(1);
        assert!(grade(&q, Some(&RecordedAnswer::Choice(1))));
        assert!(!grade(&q, Some(&RecordedAnswer::Choice(0))));
    }

    #[test]
    fn boolean_uses_true_false_index_convention() {
        let q = question(2, QuestionKind::Boolean { answer: true });
        assert!(grade(&q, Some(&RecordedAnswer::Choice(0))));
        assert!(!grade(&q, Some(&RecordedAnswer::Choice(1))));

        let q = question(3, QuestionKind::Boolean { answer: false });
        assert!(grade(&q, Some(&RecordedAnswer::Choice(1))));
        assert!(!grade(&q, Some(&RecordedAnswer::Choice(0))));
    }

    #[test]
    fn fill_is_case_insensitive_but_not_trimmed() {
        let q = question(
            4,
            QuestionKind::Fill {
                answer: "China".into(),
            },
        );
        assert!(grade(&q, Some(&RecordedAnswer::Text("china".into()))));
        assert!(grade(&q, Some(&RecordedAnswer::Text("CHINA".into()))));
        assert!(!grade(&q, Some(&RecordedAnswer::Text("  China".into()))));
    }

    #[test]
    fn absent_or_mismatched_answers_are_wrong() {
        let q = abc(0);
        assert!(!grade(&q, None));
        assert!(!grade(&q, Some(&RecordedAnswer::Text("a".into()))));

        let fill = question(5, QuestionKind::Fill { answer: "0".into() });
        assert!(!grade(&fill, Some(&RecordedAnswer::Choice(0))));
    }

    #[test]
    fn score_counts_correct_answers_only() {
        let questions = vec![
            abc(2),
            question(2, QuestionKind::Boolean { answer: false }),
            question(
                3,
                QuestionKind::Fill {
                    answer: "let".into(),
                },
            ),
        ];
        let mut answers = HashMap::new();
        answers.insert(QuestionId::new(1), RecordedAnswer::Choice(2));
        answers.insert(QuestionId::new(3), RecordedAnswer::Text("LET".into()));

        assert_eq!(calculate_score(&questions, &answers), 2);
        assert_eq!(calculate_score(&questions, &HashMap::new()), 0);
    }
}
