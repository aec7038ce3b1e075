pub mod question;
pub mod score;
pub mod session;
pub mod turn;
pub mod user;

pub use question::{Difficulty, Question};
pub use score::{DetailedFeedback, Score};
pub use session::{InterviewSession, SessionSource, SessionStatus};
pub use test::{Test, TestType};
pub use turn::{InterviewTurn, TurnEvaluation};
pub use user::{User, UserRole};
