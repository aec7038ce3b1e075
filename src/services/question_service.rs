use std::sync::Arc;

use crate::{
    errors::{AppError, AppResult},
    models::{domain::Question, dto::request::CreateQuestionRequest},
    repositories::QuestionRepository,
};

pub struct QuestionService {
    repository: Arc<dyn QuestionRepository>,
}

impl QuestionService {
    pub fn new(repository: Arc<dyn QuestionRepository>) -> Self {
        Self { repository }
    }

    pub async fn create_question(&self, request: CreateQuestionRequest) -> AppResult<Question> {
        let question = Question::new(
            &request.topic_id,
            &request.question_text,
            request.difficulty,
            request.expected_key_points,
        );

        self.repository.create(question).await
    }

    pub async fn get_question(&self, id: &str) -> AppResult<Question> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Question with id '{}' not found", id)))
    }

    pub async fn list_questions(&self, topic_id: Option<&str>) -> AppResult<Vec<Question>> {
        match topic_id {
            Some(topic_id) => self.repository.find_by_topic(topic_id).await,
            None => self.repository.find_all().await,
        }
    }
}
