#![forbid(unsafe_code)]

pub mod app_services;
pub mod error;
pub mod ledger_service;
pub mod preference_service;
pub mod sessions;

pub use quiz_core::Clock;
pub use sessions as session;

pub use app_services::AppServices;
pub use error::{AppServicesError, LedgerError, SessionError};
pub use ledger_service::{HIGH_SCORES_KEY, LedgerService};
pub use preference_service::{TOPICS_KEY, TopicPreferenceService};

pub use sessions::{
    QuestionReview, QuestionSelector, QuizLoopService, QuizSession, SelectedQuestion,
    SelectionPlan, SessionProgress, SessionResult, SessionState, SubmitOutcome,
};
