use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use validator::Validate;

use crate::models::domain::{Difficulty, TestType};

static USERNAME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9_]+$").expect("USERNAME_REGEX is a valid regex pattern")
});

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(
        length(min = 3, max = 50),
        regex(path = *USERNAME_REGEX, message = "Username must be alphanumeric with underscores")
    )]
    pub username: String,

    #[validate(length(min = 8, max = 128))]
    pub password: String,

    #[validate(length(min = 1, max = 100))]
    pub full_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub username: String,

    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateQuestionRequest {
    #[validate(length(min = 1))]
    pub topic_id: String,

    #[validate(length(min = 1, max = 2000))]
    pub question_text: String,

    pub difficulty: Difficulty,

    pub expected_key_points: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTestRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    pub description: Option<String>,

    #[validate(length(min = 1))]
    pub question_ids: Vec<String>,

    #[validate(range(min = 1, max = 480))]
    pub duration_minutes: i32,

    pub test_type: TestType,
}

/// Exactly one of `test_id` / `topic_id` must be set; checked in the
/// session service since `validator` cannot express the exclusion.
#[derive(Debug, Clone, Deserialize)]
pub struct StartSessionRequest {
    pub test_id: Option<String>,
    pub topic_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SubmitAnswerRequest {
    #[validate(length(min = 1))]
    pub session_id: String,

    #[validate(length(min = 1, max = 20000))]
    pub answer: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListQuestionsQuery {
    pub topic_id: Option<String>,
}
