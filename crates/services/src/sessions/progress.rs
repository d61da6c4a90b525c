/// Aggregated view of session progress, useful for the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionProgress {
    /// 1-based position of the current question; 0 for an empty session.
    pub position: usize,
    pub total: usize,
    pub answered: usize,
    pub is_complete: bool,
}

impl SessionProgress {
    /// "Question X of Y" label.
    #[must_use]
    pub fn label(&self) -> String {
        format!("Question {} of {}", self.position, self.total)
    }
}
