use std::sync::Arc;

use crate::{
    config::Config,
    db::Database,
    errors::AppResult,
    repositories::{
        MongoQuestionRepository, MongoScoreRepository, MongoSessionRepository,
        MongoTestRepository, MongoTurnRepository, MongoUserRepository, QuestionRepository,
        ScoreRepository, SessionRepository, TestRepository, TurnRepository, UserRepository,
    },
    services::{
        evaluation_service::EvaluationService, question_service::QuestionService,
        session_service::SessionService, test_service::TestService, user_service::UserService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService>,
    pub question_service: Arc<QuestionService>,
    pub test_service: Arc<TestService>,
    pub session_service: Arc<SessionService>,
    pub database: Database,
    pub config: Arc<Config>,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let database = Database::connect(&config).await?;

        let user_repository = Arc::new(MongoUserRepository::new(&database));
        user_repository.ensure_indexes().await?;
        let user_service = Arc::new(UserService::new(user_repository));

        let question_repository: Arc<dyn QuestionRepository> =
            Arc::new(MongoQuestionRepository::new(&database));
        question_repository.ensure_indexes().await?;
        let question_service = Arc::new(QuestionService::new(question_repository.clone()));

        let test_repository: Arc<dyn TestRepository> =
            Arc::new(MongoTestRepository::new(&database));
        test_repository.ensure_indexes().await?;
        let test_service = Arc::new(TestService::new(
            test_repository.clone(),
            question_repository.clone(),
        ));

        let session_repository: Arc<dyn SessionRepository> =
            Arc::new(MongoSessionRepository::new(&database));
        session_repository.ensure_indexes().await?;

        let turn_repository: Arc<dyn TurnRepository> =
            Arc::new(MongoTurnRepository::new(&database));
        turn_repository.ensure_indexes().await?;

        let score_repository: Arc<dyn ScoreRepository> =
            Arc::new(MongoScoreRepository::new(&database));
        score_repository.ensure_indexes().await?;

        let evaluator = Arc::new(EvaluationService::new(&config)?);

        let session_service = Arc::new(SessionService::new(
            session_repository,
            turn_repository,
            score_repository,
            question_repository,
            test_repository,
            evaluator,
        ));

        Ok(Self {
            user_service,
            question_service,
            test_service,
            session_service,
            database,
            config: Arc::new(config),
        })
    }
}
