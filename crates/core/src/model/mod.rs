mod answer;
mod bank;
mod ids;
mod question;
mod score;
mod settings;
mod topic;

pub use answer::{
    BOOLEAN_CHOICES, RecordedAnswer, TRUE_INDEX, boolean_from_index, index_from_boolean,
};
pub use bank::QuestionBank;
pub use ids::{ParseIdError, QuestionId};
pub use question::{Question, QuestionError, QuestionKind};
pub use score::{ScoreEntry, percent, rank_entries};
pub use settings::{QuizSettings, SettingsError};
pub use topic::{Topic, TopicError, TopicFilter};
