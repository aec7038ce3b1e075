pub mod question_repository;
pub mod score_repository;
pub mod session_repository;
pub mod test_repository;
pub mod turn_repository;
pub mod user_repository;

pub use question_repository::{MongoQuestionRepository, QuestionRepository};
pub use score_repository::{MongoScoreRepository, ScoreRepository};
pub use session_repository::{MongoSessionRepository, SessionRepository};
pub use test_repository::{MongoTestRepository, TestRepository};
pub use turn_repository::{MongoTurnRepository, TurnRepository};
pub use user_repository::{MongoUserRepository, UserRepository};
