use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One question-answer-evaluation triple within a session. Created
/// exactly once per question (`turn_number` is unique per session) and
/// never mutated afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct InterviewTurn {
    pub id: String,
    pub session_id: String,
    pub question_id: String,
    pub turn_number: i32,
    pub user_answer: String,
    pub ai_response: String,
    pub evaluation: TurnEvaluation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// The four-category scored judgment of one answer, already clamped to
/// [0, 100] by the evaluation client before it reaches storage.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct TurnEvaluation {
    pub grammar: i32,
    pub technical: i32,
    pub depth: i32,
    pub communication: i32,
    pub feedback: String,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub areas_to_improve: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

impl InterviewTurn {
    pub fn new(
        session_id: &str,
        question_id: &str,
        turn_number: i32,
        user_answer: &str,
        ai_response: &str,
        evaluation: TurnEvaluation,
    ) -> Self {
        InterviewTurn {
            id: Uuid::new_v4().to_string(),
            session_id: session_id.to_string(),
            question_id: question_id.to_string(),
            turn_number,
            user_answer: user_answer.to_string(),
            ai_response: ai_response.to_string(),
            evaluation,
            created_at: Some(Utc::now()),
        }
    }
}

#[cfg(test)]
impl TurnEvaluation {
    pub fn test_scores(grammar: i32, technical: i32, depth: i32, communication: i32) -> Self {
        TurnEvaluation {
            grammar,
            technical,
            depth,
            communication,
            feedback: "Solid answer.".to_string(),
            ..TurnEvaluation::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_round_trip_preserves_evaluation() {
        let evaluation = TurnEvaluation {
            grammar: 80,
            technical: 90,
            depth: 70,
            communication: 85,
            feedback: "Good coverage of the basics.".to_string(),
            strengths: vec!["clear structure".to_string()],
            areas_to_improve: vec!["more examples".to_string()],
            recommendations: vec!["read the async book".to_string()],
        };

        let turn = InterviewTurn::new("s-1", "q-1", 0, "my answer", "thanks", evaluation);

        let json = serde_json::to_string(&turn).expect("turn should serialize");
        let parsed: InterviewTurn = serde_json::from_str(&json).expect("turn should deserialize");

        assert_eq!(parsed.turn_number, 0);
        assert_eq!(parsed.evaluation.technical, 90);
        assert_eq!(parsed.evaluation.strengths, vec!["clear structure"]);
    }

    #[test]
    fn test_missing_feedback_lists_deserialize_as_empty() {
        let json = r#"{
            "grammar": 50, "technical": 60, "depth": 70, "communication": 80,
            "feedback": "ok"
        }"#;

        let evaluation: TurnEvaluation = serde_json::from_str(json).unwrap();

        assert!(evaluation.strengths.is_empty());
        assert!(evaluation.areas_to_improve.is_empty());
        assert!(evaluation.recommendations.is_empty());
    }
}
