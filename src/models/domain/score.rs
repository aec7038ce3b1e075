use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The session-level aggregate of all turn evaluations. Written once at
/// completion and treated as a cached projection of the turns; it is
/// never patched independently.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Score {
    pub id: String,
    pub session_id: String,
    pub user_id: String,
    pub grammar_score: i32,
    pub technical_score: i32,
    pub depth_score: i32,
    pub communication_score: i32,
    pub total_score: i32,
    pub grade: String,
    pub detailed_feedback: DetailedFeedback,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct DetailedFeedback {
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub recommendations: Vec<String>,
}

impl Score {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        session_id: &str,
        user_id: &str,
        grammar_score: i32,
        technical_score: i32,
        depth_score: i32,
        communication_score: i32,
        total_score: i32,
        grade: &str,
        detailed_feedback: DetailedFeedback,
    ) -> Self {
        Score {
            id: Uuid::new_v4().to_string(),
            session_id: session_id.to_string(),
            user_id: user_id.to_string(),
            grammar_score,
            technical_score,
            depth_score,
            communication_score,
            total_score,
            grade: grade.to_string(),
            detailed_feedback,
            created_at: Some(Utc::now()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_round_trip_serialization() {
        let score = Score::new(
            "s-1",
            "u-1",
            80,
            90,
            70,
            85,
            84,
            "B",
            DetailedFeedback {
                strengths: vec!["depth".to_string()],
                improvements: vec![],
                recommendations: vec!["practice aloud".to_string()],
            },
        );

        let json = serde_json::to_string(&score).expect("score should serialize");
        let parsed: Score = serde_json::from_str(&json).expect("score should deserialize");

        assert_eq!(parsed.total_score, 84);
        assert_eq!(parsed.grade, "B");
        assert_eq!(parsed.detailed_feedback.strengths, vec!["depth"]);
    }
}
