/// Labels shown for a boolean question, in presentation order.
///
/// Index 0 is "True" and index 1 is "False". `boolean_from_index` is the only
/// place that turns a recorded index back into a truth value.
pub const BOOLEAN_CHOICES: [(&str, bool); 2] = [("True", true), ("False", false)];

/// Index the presentation layer uses for "True".
pub const TRUE_INDEX: usize = 0;

/// Map a recorded boolean choice index to its truth value.
///
/// Only `TRUE_INDEX` reads as `true`; every other index reads as `false`.
#[must_use]
pub fn boolean_from_index(index: usize) -> bool {
    index == TRUE_INDEX
}

/// Inverse of `boolean_from_index` for the two canonical labels.
#[must_use]
pub fn index_from_boolean(value: bool) -> usize {
    BOOLEAN_CHOICES
        .iter()
        .position(|(_, v)| *v == value)
        .unwrap_or(TRUE_INDEX)
}

/// Raw answer captured by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RecordedAnswer {
    /// Selected option index (multiple choice, or boolean-as-index).
    Choice(usize),
    /// Typed text for fill-in-the-blank questions.
    Text(String),
}

impl RecordedAnswer {
    /// Normalize at recording time: text answers are trimmed.
    #[must_use]
    pub fn normalized(self) -> Self {
        match self {
            RecordedAnswer::Text(text) => RecordedAnswer::Text(text.trim().to_string()),
            choice @ RecordedAnswer::Choice(_) => choice,
        }
    }

    /// Whether this value counts as an answer for navigation gating.
    #[must_use]
    pub fn is_answered(&self) -> bool {
        match self {
            RecordedAnswer::Choice(_) => true,
            RecordedAnswer::Text(text) => !text.trim().is_empty(),
        }
    }

    #[must_use]
    pub fn as_choice(&self) -> Option<usize> {
        match self {
            RecordedAnswer::Choice(idx) => Some(*idx),
            RecordedAnswer::Text(_) => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            RecordedAnswer::Text(text) => Some(text),
            RecordedAnswer::Choice(_) => None,
        }
    }
}
