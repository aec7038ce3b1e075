use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    config::Config,
    constants::prompts::INTERVIEWER_SYSTEM_PROMPT,
    errors::{AppError, AppResult},
    models::domain::TurnEvaluation,
};

const DEFAULT_FEEDBACK: &str = "No feedback provided.";
const DEFAULT_INTERVIEWER_REPLY: &str = "Thank you for your answer.";

/// Prior-performance context sent alongside each answer so the model
/// can calibrate its interviewer reply.
#[derive(Debug, Clone, Default)]
pub struct EvaluationContext {
    pub username: String,
    pub past_total_scores: Vec<i32>,
}

/// A fully normalized judgment of one answer: scores clamped to
/// [0, 100], feedback and interviewer text non-empty, lists present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterviewEvaluation {
    pub grammar: i32,
    pub technical: i32,
    pub depth: i32,
    pub communication: i32,
    pub feedback: String,
    pub interviewer_text: String,
    pub strengths: Vec<String>,
    pub areas_to_improve: Vec<String>,
    pub recommendations: Vec<String>,
}

impl InterviewEvaluation {
    pub fn into_turn_evaluation(self) -> TurnEvaluation {
        TurnEvaluation {
            grammar: self.grammar,
            technical: self.technical,
            depth: self.depth,
            communication: self.communication,
            feedback: self.feedback,
            strengths: self.strengths,
            areas_to_improve: self.areas_to_improve,
            recommendations: self.recommendations,
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AnswerEvaluator: Send + Sync {
    async fn evaluate(
        &self,
        question_text: &str,
        answer_text: &str,
        context: &EvaluationContext,
    ) -> AppResult<InterviewEvaluation>;
}

#[derive(Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f64,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

/// Talks to the configured chat-completion endpoint and turns its reply
/// into an `InterviewEvaluation`. All tolerance for sloppy model output
/// (fenced JSON, missing fields, out-of-range scores) lives here;
/// callers only ever see a normalized evaluation or a typed error.
pub struct EvaluationService {
    client: reqwest::Client,
    endpoint: String,
    api_key: SecretString,
    model: String,
}

impl EvaluationService {
    pub fn new(config: &Config) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.llm_timeout_secs))
            .build()
            .map_err(|e| AppError::InternalError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: config.llm_endpoint.clone(),
            api_key: config.llm_api_key.clone(),
            model: config.llm_model.clone(),
        })
    }

    fn build_user_prompt(
        question_text: &str,
        answer_text: &str,
        context: &EvaluationContext,
    ) -> String {
        let history = if context.past_total_scores.is_empty() {
            "No history".to_string()
        } else {
            context
                .past_total_scores
                .iter()
                .map(|s| s.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        };

        format!(
            "Candidate: {}. Previous total scores: {}\n\n\
             Interview Question: {}\n\n\
             Candidate's Answer: {}\n\n\
             Please evaluate this answer and provide your feedback.",
            context.username, history, question_text, answer_text
        )
    }

    /// Models sometimes wrap the JSON in a markdown code fence even
    /// when told not to.
    fn strip_code_fences(content: &str) -> &str {
        let trimmed = content.trim();

        let Some(rest) = trimmed.strip_prefix("```") else {
            return trimmed;
        };

        // Drop the info string ("json") up to the first newline.
        let body = match rest.find('\n') {
            Some(i) => &rest[i + 1..],
            None => rest,
        };

        body.strip_suffix("```").unwrap_or(body).trim()
    }

    fn clamped_score(payload: &Value, key: &str) -> i32 {
        payload
            .get(key)
            .and_then(Value::as_f64)
            .map(|v| v.round() as i32)
            .unwrap_or(0)
            .clamp(0, 100)
    }

    fn string_list(payload: &Value, key: &str) -> Vec<String> {
        payload
            .get(key)
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    fn text_field(payload: &Value, key: &str) -> Option<String> {
        payload
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }

    /// One validated deserialization step: either a normalized
    /// evaluation or an `EvaluationParse` error, never a partially
    /// checked payload.
    pub fn parse_evaluation(content: &str) -> AppResult<InterviewEvaluation> {
        let unwrapped = Self::strip_code_fences(content);

        let payload: Value = serde_json::from_str(unwrapped).map_err(|e| {
            AppError::EvaluationParse(format!("Evaluation is not valid JSON: {}", e))
        })?;

        if !payload.is_object() {
            return Err(AppError::EvaluationParse(
                "Evaluation is not a JSON object".to_string(),
            ));
        }

        let feedback =
            Self::text_field(&payload, "feedback").unwrap_or_else(|| DEFAULT_FEEDBACK.to_string());
        let interviewer_text = Self::text_field(&payload, "interviewer_text")
            .unwrap_or_else(|| {
                if feedback == DEFAULT_FEEDBACK {
                    DEFAULT_INTERVIEWER_REPLY.to_string()
                } else {
                    feedback.clone()
                }
            });

        Ok(InterviewEvaluation {
            grammar: Self::clamped_score(&payload, "grammar"),
            technical: Self::clamped_score(&payload, "technical"),
            depth: Self::clamped_score(&payload, "depth"),
            communication: Self::clamped_score(&payload, "communication"),
            feedback,
            interviewer_text,
            strengths: Self::string_list(&payload, "strengths"),
            areas_to_improve: Self::string_list(&payload, "areasToImprove"),
            recommendations: Self::string_list(&payload, "recommendations"),
        })
    }
}

#[async_trait]
impl AnswerEvaluator for EvaluationService {
    async fn evaluate(
        &self,
        question_text: &str,
        answer_text: &str,
        context: &EvaluationContext,
    ) -> AppResult<InterviewEvaluation> {
        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: INTERVIEWER_SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: Self::build_user_prompt(question_text, answer_text, context),
                },
            ],
            max_tokens: 1024,
            temperature: 0.3,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key.expose_secret()))
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AppError::EvaluationUpstream("Evaluation request timed out".to_string())
                } else {
                    AppError::EvaluationUpstream(format!("Evaluation request failed: {}", e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::EvaluationUpstream(format!(
                "Evaluation service returned {}",
                status
            )));
        }

        let completion: ChatCompletionResponse = response.json().await.map_err(|e| {
            AppError::EvaluationUpstream(format!("Failed to read evaluation response: {}", e))
        })?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .unwrap_or_default();

        if content.trim().is_empty() {
            return Err(AppError::EvaluationUpstream(
                "Evaluation service returned empty content".to_string(),
            ));
        }

        Self::parse_evaluation(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_complete_evaluation() {
        let content = r#"{
            "grammar": 82, "technical": 91, "depth": 74, "communication": 88,
            "feedback": "Strong answer overall.",
            "interviewer_text": "Great, let's move on.",
            "strengths": ["clear examples"],
            "areasToImprove": ["edge cases"],
            "recommendations": ["review error handling"]
        }"#;

        let evaluation = EvaluationService::parse_evaluation(content).unwrap();

        assert_eq!(evaluation.grammar, 82);
        assert_eq!(evaluation.technical, 91);
        assert_eq!(evaluation.feedback, "Strong answer overall.");
        assert_eq!(evaluation.interviewer_text, "Great, let's move on.");
        assert_eq!(evaluation.areas_to_improve, vec!["edge cases"]);
    }

    #[test]
    fn test_out_of_range_scores_are_clamped() {
        let content = r#"{"grammar": 150, "technical": -20, "depth": 100.4, "communication": 55}"#;

        let evaluation = EvaluationService::parse_evaluation(content).unwrap();

        assert_eq!(evaluation.grammar, 100);
        assert_eq!(evaluation.technical, 0);
        assert_eq!(evaluation.depth, 100);
        assert_eq!(evaluation.communication, 55);
    }

    #[test]
    fn test_missing_fields_get_defaults() {
        let content = r#"{"technical": 70}"#;

        let evaluation = EvaluationService::parse_evaluation(content).unwrap();

        assert_eq!(evaluation.grammar, 0);
        assert_eq!(evaluation.feedback, DEFAULT_FEEDBACK);
        assert_eq!(evaluation.interviewer_text, DEFAULT_INTERVIEWER_REPLY);
        assert!(evaluation.strengths.is_empty());
        assert!(evaluation.recommendations.is_empty());
    }

    #[test]
    fn test_interviewer_text_falls_back_to_feedback() {
        let content = r#"{"technical": 70, "feedback": "Needs more depth."}"#;

        let evaluation = EvaluationService::parse_evaluation(content).unwrap();

        assert_eq!(evaluation.interviewer_text, "Needs more depth.");
    }

    #[test]
    fn test_fenced_payload_is_unwrapped() {
        let content = "```json\n{\"grammar\": 60, \"technical\": 70, \"depth\": 50, \"communication\": 65}\n```";

        let evaluation = EvaluationService::parse_evaluation(content).unwrap();

        assert_eq!(evaluation.grammar, 60);
        assert_eq!(evaluation.communication, 65);
    }

    #[test]
    fn test_bare_fence_without_language_tag() {
        let content = "```\n{\"technical\": 42}\n```";

        let evaluation = EvaluationService::parse_evaluation(content).unwrap();

        assert_eq!(evaluation.technical, 42);
    }

    #[test]
    fn test_malformed_list_defaults_to_empty() {
        let content = r#"{"technical": 70, "strengths": "not a list"}"#;

        let evaluation = EvaluationService::parse_evaluation(content).unwrap();

        assert!(evaluation.strengths.is_empty());
    }

    #[test]
    fn test_unparsable_content_is_a_parse_error() {
        let result = EvaluationService::parse_evaluation("I think the answer was fine.");

        assert!(matches!(result, Err(AppError::EvaluationParse(_))));
    }

    #[test]
    fn test_non_object_json_is_a_parse_error() {
        let result = EvaluationService::parse_evaluation("[1, 2, 3]");

        assert!(matches!(result, Err(AppError::EvaluationParse(_))));
    }

    #[test]
    fn test_user_prompt_includes_score_history() {
        let context = EvaluationContext {
            username: "johndoe".to_string(),
            past_total_scores: vec![72, 85],
        };

        let prompt = EvaluationService::build_user_prompt("Q?", "A.", &context);

        assert!(prompt.contains("johndoe"));
        assert!(prompt.contains("72, 85"));
    }

    #[test]
    fn test_user_prompt_without_history() {
        let context = EvaluationContext {
            username: "newbie".to_string(),
            past_total_scores: vec![],
        };

        let prompt = EvaluationService::build_user_prompt("Q?", "A.", &context);

        assert!(prompt.contains("No history"));
    }
}
