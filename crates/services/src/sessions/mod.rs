mod plan;
mod progress;
mod review;
mod service;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use plan::{QuestionSelector, SelectedQuestion, SelectionPlan, shuffled};
pub use progress::SessionProgress;
pub use review::{QuestionReview, SessionResult, describe_answer};
pub use service::{QuizSession, SessionState};
pub use workflow::{QuizLoopService, SubmitOutcome};
