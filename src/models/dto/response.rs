use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::domain::{
    Difficulty, InterviewSession, InterviewTurn, Question, Score, User, UserRole,
};

/// User shape exposed by the API; never carries the password hash.
#[derive(Debug, Clone, Serialize)]
pub struct UserDto {
    pub id: String,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    pub role: UserRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        UserDto {
            id: user.id,
            username: user.username,
            full_name: user.full_name,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserDto,
}

/// Just enough of a question to show alongside a recorded turn.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionRef {
    pub id: String,
    pub question_text: String,
    pub difficulty: Difficulty,
}

impl From<Question> for QuestionRef {
    fn from(question: Question) -> Self {
        QuestionRef {
            id: question.id,
            question_text: question.question_text,
            difficulty: question.difficulty,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SessionStarted {
    pub session: InterviewSession,
    pub current_question: Question,
}

#[derive(Debug, Serialize)]
pub struct SessionDetail {
    #[serde(flatten)]
    pub session: InterviewSession,
    pub turns: Vec<InterviewTurn>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_question: Option<Question>,
    pub total_questions: usize,
}

#[derive(Debug, Serialize)]
pub struct AnswerOutcome {
    pub turn: InterviewTurn,
    pub completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<Score>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_question: Option<Question>,
}

#[derive(Debug, Serialize)]
pub struct SessionSummary {
    #[serde(flatten)]
    pub session: InterviewSession,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<Score>,
    pub total_questions: usize,
}

#[derive(Debug, Serialize)]
pub struct TurnDetail {
    #[serde(flatten)]
    pub turn: InterviewTurn,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<QuestionRef>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_dto_never_exposes_password_hash() {
        let user = User::test_user("johndoe");
        let dto: UserDto = user.into();

        let json = serde_json::to_string(&dto).unwrap();

        assert!(json.contains("johndoe"));
        assert!(!json.contains("password"));
        assert!(!json.contains("argon2"));
    }

    #[test]
    fn test_session_detail_flattens_session_fields() {
        let session = InterviewSession::new(
            "user-1",
            crate::models::domain::SessionSource::Test("test-1".to_string()),
            vec!["q-1".to_string()],
        );

        let detail = SessionDetail {
            session,
            turns: vec![],
            current_question: None,
            total_questions: 1,
        };

        let json = serde_json::to_value(&detail).unwrap();

        assert_eq!(json["status"], "in_progress");
        assert_eq!(json["total_questions"], 1);
        assert!(json.get("current_question").is_none());
    }
}
