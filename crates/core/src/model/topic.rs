use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TopicError {
    #[error("topic cannot be empty")]
    EmptyName,
}

/// Validated topic tag (trimmed, non-empty).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Topic(String);

impl Topic {
    /// Create a validated topic.
    ///
    /// # Errors
    ///
    /// Returns `TopicError::EmptyName` if the name is empty after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, TopicError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TopicError::EmptyName);
        }
        Ok(Self(trimmed.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for Topic {
    type Error = TopicError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Topic> for String {
    fn from(topic: Topic) -> Self {
        topic.0
    }
}

/// Ordered, de-duplicated set of topics a session is restricted to.
///
/// An empty filter means every topic in the bank is eligible.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Topic>", into = "Vec<Topic>")]
pub struct TopicFilter(Vec<Topic>);

impl TopicFilter {
    /// Build a filter, dropping repeated topics while keeping first-seen order.
    #[must_use]
    pub fn new(topics: impl IntoIterator<Item = Topic>) -> Self {
        let mut out: Vec<Topic> = Vec::new();
        for topic in topics {
            if !out.contains(&topic) {
                out.push(topic);
            }
        }
        Self(out)
    }

    #[must_use]
    pub fn all() -> Self {
        Self(Vec::new())
    }

    /// Parse a comma-separated list such as `"coding, music"`.
    ///
    /// Blank segments are skipped, so `""` yields the unrestricted filter.
    #[must_use]
    pub fn parse_list(raw: &str) -> Self {
        Self::new(raw.split(',').filter_map(|part| Topic::new(part).ok()))
    }

    #[must_use]
    pub fn topics(&self) -> &[Topic] {
        &self.0
    }

    #[must_use]
    pub fn is_unrestricted(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn contains(&self, topic: &Topic) -> bool {
        self.0.contains(topic)
    }

    /// Label stored with score entries: `"a,b"` or `"all"`.
    #[must_use]
    pub fn label(&self) -> String {
        if self.0.is_empty() {
            return "all".to_string();
        }
        self.0
            .iter()
            .map(Topic::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl From<Vec<Topic>> for TopicFilter {
    fn from(topics: Vec<Topic>) -> Self {
        Self::new(topics)
    }
}

impl From<TopicFilter> for Vec<Topic> {
    fn from(filter: TopicFilter) -> Self {
        filter.0
    }
}

impl FromIterator<Topic> for TopicFilter {
    fn from_iter<I: IntoIterator<Item = Topic>>(iter: I) -> Self {
        Self::new(iter)
    }
}
