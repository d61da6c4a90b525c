use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::{HashSet, VecDeque};

use quiz_core::model::{Question, QuestionBank, QuestionId, Topic, TopicFilter};

/// A bank question as it appears in a session.
///
/// Multiple-choice questions may have their choices reordered, with the
/// answer index following the correct choice. Everything else is untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedQuestion(Question);

impl SelectedQuestion {
    #[must_use]
    pub fn question(&self) -> &Question {
        &self.0
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.0.id()
    }

    #[must_use]
    pub fn into_question(self) -> Question {
        self.0
    }
}

/// Selection result for a session build.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionPlan {
    pub questions: Vec<SelectedQuestion>,
    /// Topics that were balanced across, in round-robin order.
    pub topics: Vec<Topic>,
    /// True when the requested topics matched nothing and the whole bank was used.
    pub fell_back: bool,
}

impl SelectionPlan {
    fn empty() -> Self {
        Self {
            questions: Vec::new(),
            topics: Vec::new(),
            fell_back: false,
        }
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

/// Fisher-Yates over a copy of `items`; the input is left untouched.
pub fn shuffled<T: Clone, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut out = items.to_vec();
    out.shuffle(rng);
    out
}

/// Picks a topic-balanced, shuffled subset of the bank.
pub struct QuestionSelector<'a> {
    bank: &'a QuestionBank,
    topics: &'a TopicFilter,
    length: usize,
    shuffle_choices: bool,
}

impl<'a> QuestionSelector<'a> {
    #[must_use]
    pub fn new(bank: &'a QuestionBank, topics: &'a TopicFilter, length: usize) -> Self {
        Self {
            bank,
            topics,
            length,
            shuffle_choices: true,
        }
    }

    /// Enable or disable reordering of multiple-choice options.
    #[must_use]
    pub fn with_shuffle_choices(mut self, shuffle: bool) -> Self {
        self.shuffle_choices = shuffle;
        self
    }

    /// Build the ordered question list for a session.
    ///
    /// - An unrestricted filter balances across every topic in the bank.
    /// - A filter that matches no question falls back to the whole bank.
    /// - The result holds `min(length, pool size)` distinct questions.
    pub fn select<R: Rng + ?Sized>(self, rng: &mut R) -> SelectionPlan {
        if self.bank.is_empty() || self.length == 0 {
            return SelectionPlan::empty();
        }

        let requested = if self.topics.is_unrestricted() {
            self.bank.topics()
        } else {
            self.topics.topics().to_vec()
        };

        let mut fell_back = false;
        let mut buckets = partition(self.bank, &requested, rng);
        if buckets.is_empty() {
            tracing::warn!(
                topics = %self.topics.label(),
                "no questions match the requested topics; using the whole bank"
            );
            fell_back = true;
            buckets = partition(self.bank, &self.bank.topics(), rng);
        }

        let topics: Vec<Topic> = buckets.iter().map(|(topic, _)| topic.clone()).collect();
        let picked = balance(
            buckets.into_iter().map(|(_, b)| b).collect(),
            self.length,
            rng,
        );

        let questions: Vec<SelectedQuestion> = picked
            .into_iter()
            .map(|q| {
                if self.shuffle_choices {
                    randomize_choices(q, rng)
                } else {
                    SelectedQuestion(q.clone())
                }
            })
            .collect();

        tracing::debug!(
            requested = %self.topics.label(),
            length = self.length,
            selected = questions.len(),
            fell_back,
            "selected quiz questions"
        );

        SelectionPlan {
            questions,
            topics,
            fell_back,
        }
    }
}

/// Split the bank into independently shuffled per-topic queues.
///
/// Topics without questions are dropped; each queue holds borrowed copies so
/// the bank itself is never reordered.
fn partition<'q, R: Rng + ?Sized>(
    bank: &'q QuestionBank,
    topics: &[Topic],
    rng: &mut R,
) -> Vec<(Topic, VecDeque<&'q Question>)> {
    topics
        .iter()
        .filter_map(|topic| {
            let items: Vec<&Question> = bank
                .questions()
                .iter()
                .filter(|q| q.topic() == topic)
                .collect();
            if items.is_empty() {
                return None;
            }
            let queue: VecDeque<&Question> = shuffled(&items, rng).into();
            Some((topic.clone(), queue))
        })
        .collect()
}

fn balance<'q, R: Rng + ?Sized>(
    mut buckets: Vec<VecDeque<&'q Question>>,
    length: usize,
    rng: &mut R,
) -> Vec<&'q Question> {
    if buckets.is_empty() {
        return Vec::new();
    }

    let pool: Vec<&Question> = buckets.iter().flat_map(|b| b.iter().copied()).collect();
    let base = length / buckets.len();
    let mut selection: Vec<&Question> = Vec::with_capacity(length.min(pool.len()));

    for bucket in &mut buckets {
        let take = base.min(bucket.len());
        selection.extend(bucket.drain(..take));
    }

    // Round-robin the remainder. Each step adds at most one question and the
    // length is checked first, so this never overshoots.
    let mut cursor = 0;
    while selection.len() < length && buckets.iter().any(|b| !b.is_empty()) {
        let slot = cursor % buckets.len();
        if let Some(question) = buckets[slot].pop_front() {
            selection.push(question);
        }
        cursor += 1;
    }

    if selection.len() < length {
        let chosen: HashSet<QuestionId> = selection.iter().map(|q| q.id()).collect();
        let remaining: Vec<&Question> = pool
            .iter()
            .copied()
            .filter(|q| !chosen.contains(&q.id()))
            .collect();
        let deficit = length - selection.len();
        selection.extend(shuffled(&remaining, rng).into_iter().take(deficit));
    }

    let mut out = shuffled(&selection, rng);
    out.truncate(length);
    out
}

fn randomize_choices<R: Rng + ?Sized>(question: &Question, rng: &mut R) -> SelectedQuestion {
    let Some(choices) = question.choices() else {
        return SelectedQuestion(question.clone());
    };
    let identity: Vec<usize> = (0..choices.len()).collect();
    let order = shuffled(&identity, rng);
    match question.with_choice_order(&order) {
        Ok(reordered) => SelectedQuestion(reordered),
        Err(err) => {
            tracing::warn!(id = %question.id(), error = %err, "keeping original choice order");
            SelectedQuestion(question.clone())
        }
    }
}
