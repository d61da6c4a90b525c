use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("quiz length must be > 0")]
    InvalidQuizLength,

    #[error("ledger capacity must be > 0")]
    InvalidLedgerCapacity,

    #[error("leaderboard size must be > 0")]
    InvalidLeaderboardSize,
}

/// Tunables for a quiz run and its high-score ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizSettings {
    quiz_length: usize,
    ledger_capacity: usize,
    leaderboard_size: usize,
}

impl QuizSettings {
    pub const DEFAULT_QUIZ_LENGTH: usize = 10;
    pub const DEFAULT_LEDGER_CAPACITY: usize = 50;
    pub const DEFAULT_LEADERBOARD_SIZE: usize = 10;

    /// Creates validated settings.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` if any value is zero.
    pub fn new(
        quiz_length: usize,
        ledger_capacity: usize,
        leaderboard_size: usize,
    ) -> Result<Self, SettingsError> {
        if quiz_length == 0 {
            return Err(SettingsError::InvalidQuizLength);
        }
        if ledger_capacity == 0 {
            return Err(SettingsError::InvalidLedgerCapacity);
        }
        if leaderboard_size == 0 {
            return Err(SettingsError::InvalidLeaderboardSize);
        }
        Ok(Self {
            quiz_length,
            ledger_capacity,
            leaderboard_size,
        })
    }

    /// Defaults with a different quiz length.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::InvalidQuizLength` if `quiz_length` is zero.
    pub fn with_quiz_length(quiz_length: usize) -> Result<Self, SettingsError> {
        Self::new(
            quiz_length,
            Self::DEFAULT_LEDGER_CAPACITY,
            Self::DEFAULT_LEADERBOARD_SIZE,
        )
    }

    #[must_use]
    pub fn quiz_length(&self) -> usize {
        self.quiz_length
    }

    #[must_use]
    pub fn ledger_capacity(&self) -> usize {
        self.ledger_capacity
    }

    #[must_use]
    pub fn leaderboard_size(&self) -> usize {
        self.leaderboard_size
    }
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            quiz_length: Self::DEFAULT_QUIZ_LENGTH,
            ledger_capacity: Self::DEFAULT_LEDGER_CAPACITY,
            leaderboard_size: Self::DEFAULT_LEADERBOARD_SIZE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_published_limits() {
        let settings = QuizSettings::default();
        assert_eq!(settings.quiz_length(), 10);
        assert_eq!(settings.ledger_capacity(), 50);
        assert_eq!(settings.leaderboard_size(), 10);
    }

    #[test]
    fn zero_values_are_rejected() {
        assert_eq!(
            QuizSettings::with_quiz_length(0).unwrap_err(),
            SettingsError::InvalidQuizLength
        );
        assert_eq!(
            QuizSettings::new(5, 0, 10).unwrap_err(),
            SettingsError::InvalidLedgerCapacity
        );
        assert_eq!(
            QuizSettings::new(5, 50, 0).unwrap_err(),
            SettingsError::InvalidLeaderboardSize
        );
    }
}
