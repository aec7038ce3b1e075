pub mod evaluation_service;
pub mod question_service;
pub mod score_service;
pub mod session_service;
pub mod test_service;
pub mod user_service;

pub use evaluation_service::{AnswerEvaluator, EvaluationContext, EvaluationService};
pub use question_service::QuestionService;
pub use score_service::ScoreService;
pub use session_service::{QuestionSelectionPolicy, SessionService, MAX_ADHOC_QUESTIONS};
pub use test_service::TestService;
pub use user_service::UserService;
