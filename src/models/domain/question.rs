use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A question in the bank. Sessions snapshot question ids at creation,
/// so a question must never be mutated once it can be referenced.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Question {
    pub id: String,
    pub topic_id: String,
    pub question_text: String,
    pub difficulty: Difficulty,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_key_points: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Question {
    pub fn new(
        topic_id: &str,
        question_text: &str,
        difficulty: Difficulty,
        expected_key_points: Option<Vec<String>>,
    ) -> Self {
        Question {
            id: Uuid::new_v4().to_string(),
            topic_id: topic_id.to_string(),
            question_text: question_text.to_string(),
            difficulty,
            expected_key_points,
            created_at: Some(Utc::now()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_round_trip_serialization() {
        for difficulty in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
            let json = serde_json::to_string(&difficulty).expect("difficulty should serialize");
            let parsed: Difficulty =
                serde_json::from_str(&json).expect("difficulty should deserialize");
            assert_eq!(difficulty, parsed);
        }
    }

    #[test]
    fn test_difficulty_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Difficulty::Medium).unwrap(), "\"medium\"");
    }

    #[test]
    fn test_question_without_key_points_omits_field() {
        let question = Question::new("topic-1", "What is ownership?", Difficulty::Easy, None);
        let json = serde_json::to_string(&question).unwrap();

        assert!(!json.contains("expected_key_points"));
    }
}
