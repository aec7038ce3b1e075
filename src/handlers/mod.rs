pub mod auth_handler;
pub mod health_handler;
pub mod question_handler;
pub mod session_handler;
pub mod test_handler;

pub use auth_handler::{current_user, login, register};
pub use health_handler::health_check;
pub use question_handler::{create_question, get_question, list_questions};
pub use session_handler::{
    get_session, get_session_history, get_session_score, get_session_turns, quit_session,
    start_session, submit_answer,
};
pub use test_handler::{create_test, get_test, list_tests};
