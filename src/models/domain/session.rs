use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One user's run through a fixed question sequence.
///
/// Invariants:
/// - `0 <= current_question_index <= question_ids.len()`
/// - `status == Completed` iff `completed_at` is set iff the index
///   equals `question_ids.len()`
/// - a session never returns to `InProgress` once it has left it
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct InterviewSession {
    pub id: String,
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic_id: Option<String>,
    pub status: SessionStatus,
    pub current_question_index: i32,
    pub question_ids: Vec<String>,
    pub started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    InProgress,
    Completed,
    Abandoned,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::InProgress => "in_progress",
            SessionStatus::Completed => "completed",
            SessionStatus::Abandoned => "abandoned",
        }
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What a session was created from. Exactly one of test/topic.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionSource {
    Test(String),
    Topic(String),
}

impl InterviewSession {
    pub fn new(user_id: &str, source: SessionSource, question_ids: Vec<String>) -> Self {
        let (test_id, topic_id) = match source {
            SessionSource::Test(id) => (Some(id), None),
            SessionSource::Topic(id) => (None, Some(id)),
        };

        InterviewSession {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            test_id,
            topic_id,
            status: SessionStatus::InProgress,
            current_question_index: 0,
            question_ids,
            started_at: Utc::now(),
            completed_at: None,
        }
    }

    pub fn total_questions(&self) -> usize {
        self.question_ids.len()
    }

    pub fn is_active(&self) -> bool {
        self.status == SessionStatus::InProgress
    }

    /// The question id awaiting an answer; `None` once all questions
    /// are answered.
    pub fn current_question_id(&self) -> Option<&str> {
        self.question_ids
            .get(self.current_question_index as usize)
            .map(String::as_str)
    }

    /// True when answering the question at `current_question_index`
    /// would exhaust the snapshot.
    pub fn on_last_question(&self) -> bool {
        (self.current_question_index as usize) + 1 == self.question_ids.len()
    }
}
