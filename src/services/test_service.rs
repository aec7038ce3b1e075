use std::sync::Arc;

use crate::{
    errors::{AppError, AppResult},
    models::{domain::Test, dto::request::CreateTestRequest},
    repositories::{QuestionRepository, TestRepository},
};

pub struct TestService {
    repository: Arc<dyn TestRepository>,
    questions: Arc<dyn QuestionRepository>,
}

impl TestService {
    pub fn new(repository: Arc<dyn TestRepository>, questions: Arc<dyn QuestionRepository>) -> Self {
        Self {
            repository,
            questions,
        }
    }

    /// Every referenced question must exist at creation time; sessions
    /// snapshot these ids and answer-time lookups should not start out
    /// broken.
    pub async fn create_test(&self, request: CreateTestRequest) -> AppResult<Test> {
        for question_id in &request.question_ids {
            if self.questions.find_by_id(question_id).await?.is_none() {
                return Err(AppError::ValidationError(format!(
                    "Question with id '{}' does not exist",
                    question_id
                )));
            }
        }

        let test = Test::new(
            &request.name,
            request.description,
            request.question_ids,
            request.duration_minutes,
            request.test_type,
        );

        self.repository.create(test).await
    }

    pub async fn get_test(&self, id: &str) -> AppResult<Test> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Test with id '{}' not found", id)))
    }

    pub async fn list_tests(&self) -> AppResult<Vec<Test>> {
        self.repository.find_all().await
    }
}
