use std::sync::Arc;

use chrono::Utc;
use rand::seq::SliceRandom;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{InterviewSession, InterviewTurn, Score, SessionSource, SessionStatus},
        dto::{
            request::{StartSessionRequest, SubmitAnswerRequest},
            response::{
                AnswerOutcome, QuestionRef, SessionDetail, SessionStarted, SessionSummary,
                TurnDetail,
            },
        },
    },
    repositories::{
        QuestionRepository, ScoreRepository, SessionRepository, TestRepository, TurnRepository,
    },
    services::{
        evaluation_service::{AnswerEvaluator, EvaluationContext},
        score_service::ScoreService,
    },
};

/// Cap on the number of questions drawn for a topic-derived ad hoc
/// session.
pub const MAX_ADHOC_QUESTIONS: usize = 5;

/// How the question snapshot of a new session is chosen: a test's full
/// list in its stored order, or a bounded random draw from a topic's
/// pool.
#[derive(Debug, Clone)]
pub enum QuestionSelectionPolicy {
    Fixed(Vec<String>),
    RandomSubset { pool: Vec<String>, max: usize },
}

impl QuestionSelectionPolicy {
    pub fn select(self) -> Vec<String> {
        match self {
            QuestionSelectionPolicy::Fixed(ids) => ids,
            QuestionSelectionPolicy::RandomSubset { mut pool, max } => {
                pool.shuffle(&mut rand::thread_rng());
                pool.truncate(max);
                pool
            }
        }
    }
}

/// Owns the interview session lifecycle: question sequencing, turn
/// recording, completion detection and status transitions. The only
/// component allowed to write sessions, turns or scores.
pub struct SessionService {
    sessions: Arc<dyn SessionRepository>,
    turns: Arc<dyn TurnRepository>,
    scores: Arc<dyn ScoreRepository>,
    questions: Arc<dyn QuestionRepository>,
    tests: Arc<dyn TestRepository>,
    evaluator: Arc<dyn AnswerEvaluator>,
}

impl SessionService {
    pub fn new(
        sessions: Arc<dyn SessionRepository>,
        turns: Arc<dyn TurnRepository>,
        scores: Arc<dyn ScoreRepository>,
        questions: Arc<dyn QuestionRepository>,
        tests: Arc<dyn TestRepository>,
        evaluator: Arc<dyn AnswerEvaluator>,
    ) -> Self {
        Self {
            sessions,
            turns,
            scores,
            questions,
            tests,
            evaluator,
        }
    }

    pub async fn start(
        &self,
        user_id: &str,
        request: StartSessionRequest,
    ) -> AppResult<SessionStarted> {
        let (source, policy) = match (request.test_id, request.topic_id) {
            (Some(test_id), None) => {
                let test = self.tests.find_by_id(&test_id).await?.ok_or_else(|| {
                    AppError::NotFound(format!("Test with id '{}' not found", test_id))
                })?;

                (
                    SessionSource::Test(test_id),
                    QuestionSelectionPolicy::Fixed(test.question_ids),
                )
            }
            (None, Some(topic_id)) => {
                let pool: Vec<String> = self
                    .questions
                    .find_by_topic(&topic_id)
                    .await?
                    .into_iter()
                    .map(|q| q.id)
                    .collect();

                (
                    SessionSource::Topic(topic_id),
                    QuestionSelectionPolicy::RandomSubset {
                        pool,
                        max: MAX_ADHOC_QUESTIONS,
                    },
                )
            }
            _ => {
                return Err(AppError::ValidationError(
                    "Provide exactly one of test_id or topic_id".to_string(),
                ))
            }
        };

        let question_ids = policy.select();
        if question_ids.is_empty() {
            let detail = match &source {
                SessionSource::Test(id) => format!("test '{}' has no questions", id),
                SessionSource::Topic(id) => format!("no questions found for topic '{}'", id),
            };
            return Err(AppError::NoQuestionsAvailable(detail));
        }

        // Resolve the opening question before writing anything so a
        // stale snapshot cannot produce an unanswerable session.
        let current_question = self
            .questions
            .find_by_id(&question_ids[0])
            .await?
            .ok_or_else(|| {
                AppError::QuestionNotFound(format!(
                    "Question '{}' no longer exists",
                    question_ids[0]
                ))
            })?;

        let session = self
            .sessions
            .create(InterviewSession::new(user_id, source, question_ids))
            .await?;

        log::info!(
            "Started session '{}' for user '{}' with {} questions",
            session.id,
            user_id,
            session.total_questions()
        );

        Ok(SessionStarted {
            session,
            current_question,
        })
    }

    /// One full answer turn: evaluate, record, then advance or finish.
    ///
    /// Nothing is written before the evaluation succeeds, and every
    /// write after the turn insert compensates by deleting the turn
    /// (and score) on failure, so callers can always retry against an
    /// unchanged session.
    pub async fn submit_answer(
        &self,
        user_id: &str,
        username: &str,
        request: SubmitAnswerRequest,
    ) -> AppResult<AnswerOutcome> {
        let session = self.load_owned_session(user_id, &request.session_id).await?;

        if !session.is_active() {
            return Err(AppError::SessionNotActive(format!(
                "Session '{}' is {}",
                session.id, session.status
            )));
        }

        let index = session.current_question_index;
        let question_id = session
            .current_question_id()
            .ok_or_else(|| {
                AppError::InternalError(format!(
                    "Active session '{}' has no current question",
                    session.id
                ))
            })?
            .to_string();

        let question = self
            .questions
            .find_by_id(&question_id)
            .await?
            .ok_or_else(|| {
                AppError::QuestionNotFound(format!("Question '{}' no longer exists", question_id))
            })?;

        let past_total_scores = self
            .scores
            .find_by_user(user_id)
            .await?
            .iter()
            .map(|s| s.total_score)
            .collect();

        let context = EvaluationContext {
            username: username.to_string(),
            past_total_scores,
        };

        let evaluation = self
            .evaluator
            .evaluate(&question.question_text, &request.answer, &context)
            .await?;

        let ai_response = evaluation.interviewer_text.clone();
        let turn = self
            .turns
            .create(InterviewTurn::new(
                &session.id,
                &question.id,
                index,
                &request.answer,
                &ai_response,
                evaluation.into_turn_evaluation(),
            ))
            .await?;

        if session.on_last_question() {
            self.finalize(&session, index, turn).await
        } else {
            match self.sessions.advance_progress(&session.id, index).await {
                Ok(true) => {}
                Ok(false) => {
                    self.rollback_turn(&turn.id).await;
                    return Err(AppError::Conflict(format!(
                        "Session '{}' was modified concurrently",
                        session.id
                    )));
                }
                Err(e) => {
                    self.rollback_turn(&turn.id).await;
                    return Err(e);
                }
            }

            let next_question = self
                .questions
                .find_by_id(&session.question_ids[(index + 1) as usize])
                .await?;

            Ok(AnswerOutcome {
                turn,
                completed: false,
                score: None,
                next_question,
            })
        }
    }

    /// Final turn: aggregate, persist the score, then flip the session
    /// to completed. The score is written before the status flip so a
    /// completed session is never visible without one.
    async fn finalize(
        &self,
        session: &InterviewSession,
        index: i32,
        turn: InterviewTurn,
    ) -> AppResult<AnswerOutcome> {
        let all_turns = match self.turns.find_by_session(&session.id).await {
            Ok(turns) => turns,
            Err(e) => {
                self.rollback_turn(&turn.id).await;
                return Err(e);
            }
        };

        let score = match ScoreService::aggregate(&session.id, &session.user_id, &all_turns) {
            Ok(score) => score,
            Err(e) => {
                self.rollback_turn(&turn.id).await;
                return Err(e);
            }
        };

        let score = match self.scores.create(score).await {
            Ok(score) => score,
            Err(e) => {
                self.rollback_turn(&turn.id).await;
                return Err(e);
            }
        };

        match self.sessions.complete(&session.id, index, Utc::now()).await {
            Ok(true) => {
                log::info!(
                    "Session '{}' completed with total score {} ({})",
                    session.id,
                    score.total_score,
                    score.grade
                );

                Ok(AnswerOutcome {
                    turn,
                    completed: true,
                    score: Some(score),
                    next_question: None,
                })
            }
            Ok(false) => {
                self.rollback_score(&score.id).await;
                self.rollback_turn(&turn.id).await;
                Err(AppError::Conflict(format!(
                    "Session '{}' was modified concurrently",
                    session.id
                )))
            }
            Err(e) => {
                self.rollback_score(&score.id).await;
                self.rollback_turn(&turn.id).await;
                Err(e)
            }
        }
    }

    pub async fn quit(&self, user_id: &str, session_id: &str) -> AppResult<InterviewSession> {
        let session = self.load_owned_session(user_id, session_id).await?;

        if !session.is_active() || !self.sessions.abandon(&session.id).await? {
            return Err(AppError::SessionNotActive(format!(
                "Session '{}' already ended",
                session.id
            )));
        }

        log::info!("Session '{}' abandoned by user '{}'", session.id, user_id);

        self.sessions
            .find_by_id(session_id)
            .await?
            .ok_or_else(|| {
                AppError::InternalError(format!("Session '{}' disappeared during quit", session_id))
            })
    }

    pub async fn get_session(
        &self,
        user_id: &str,
        session_id: &str,
    ) -> AppResult<SessionDetail> {
        let session = self.load_owned_session(user_id, session_id).await?;

        let turns = self.turns.find_by_session(&session.id).await?;
        let current_question = match session.current_question_id() {
            Some(question_id) if session.is_active() => {
                self.questions.find_by_id(question_id).await?
            }
            _ => None,
        };

        let total_questions = session.total_questions();

        Ok(SessionDetail {
            session,
            turns,
            current_question,
            total_questions,
        })
    }

    pub async fn get_turns(
        &self,
        user_id: &str,
        session_id: &str,
    ) -> AppResult<Vec<TurnDetail>> {
        let session = self.load_owned_session(user_id, session_id).await?;
        let turns = self.turns.find_by_session(&session.id).await?;

        let mut details = Vec::with_capacity(turns.len());
        for turn in turns {
            let question = self
                .questions
                .find_by_id(&turn.question_id)
                .await?
                .map(QuestionRef::from);
            details.push(TurnDetail { turn, question });
        }

        Ok(details)
    }

    pub async fn get_score(&self, user_id: &str, session_id: &str) -> AppResult<Score> {
        let session = self.load_owned_session(user_id, session_id).await?;

        self.scores
            .find_by_session(&session.id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("No score recorded for session '{}'", session_id))
            })
    }

    /// The caller's completed sessions with their scores, newest first.
    pub async fn history(&self, user_id: &str) -> AppResult<Vec<SessionSummary>> {
        let sessions = self.sessions.find_by_user(user_id).await?;

        let mut summaries = Vec::new();
        for session in sessions
            .into_iter()
            .filter(|s| s.status == SessionStatus::Completed)
        {
            let score = self.scores.find_by_session(&session.id).await?;
            let total_questions = session.total_questions();
            summaries.push(SessionSummary {
                session,
                score,
                total_questions,
            });
        }

        Ok(summaries)
    }

    async fn load_owned_session(
        &self,
        user_id: &str,
        session_id: &str,
    ) -> AppResult<InterviewSession> {
        let session = self.sessions.find_by_id(session_id).await?.ok_or_else(|| {
            AppError::NotFound(format!("Session with id '{}' not found", session_id))
        })?;

        if session.user_id != user_id {
            return Err(AppError::Forbidden(
                "Session belongs to another user".to_string(),
            ));
        }

        Ok(session)
    }

    async fn rollback_turn(&self, turn_id: &str) {
        if let Err(e) = self.turns.delete(turn_id).await {
            log::error!(
                "Failed to roll back turn '{}' after submission error: {}",
                turn_id,
                e
            );
        }
    }

    async fn rollback_score(&self, score_id: &str) {
        if let Err(e) = self.scores.delete(score_id).await {
            log::error!(
                "Failed to roll back score '{}' after submission error: {}",
                score_id,
                e
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::domain::{Difficulty, Question, Test, TestType},
        services::evaluation_service::MockAnswerEvaluator,
        test_utils::fakes::{
            InMemoryQuestionRepository, InMemoryScoreRepository, InMemorySessionRepository,
            InMemoryTestRepository, InMemoryTurnRepository,
        },
    };

    #[test]
    fn test_fixed_policy_preserves_order() {
        let policy = QuestionSelectionPolicy::Fixed(vec![
            "q-1".to_string(),
            "q-2".to_string(),
            "q-3".to_string(),
        ]);

        assert_eq!(policy.select(), vec!["q-1", "q-2", "q-3"]);
    }

    #[test]
    fn test_random_subset_caps_at_max() {
        let pool: Vec<String> = (0..20).map(|i| format!("q-{}", i)).collect();
        let policy = QuestionSelectionPolicy::RandomSubset {
            pool: pool.clone(),
            max: MAX_ADHOC_QUESTIONS,
        };

        let selected = policy.select();

        assert_eq!(selected.len(), MAX_ADHOC_QUESTIONS);
        for id in &selected {
            assert!(pool.contains(id));
        }
    }

    #[test]
    fn test_random_subset_smaller_pool_returns_everything() {
        let policy = QuestionSelectionPolicy::RandomSubset {
            pool: vec!["q-1".to_string(), "q-2".to_string()],
            max: MAX_ADHOC_QUESTIONS,
        };

        let mut selected = policy.select();
        selected.sort();

        assert_eq!(selected, vec!["q-1", "q-2"]);
    }

    struct Harness {
        service: SessionService,
        sessions: Arc<InMemorySessionRepository>,
        turns: Arc<InMemoryTurnRepository>,
        scores: Arc<InMemoryScoreRepository>,
    }

    fn harness(evaluator: MockAnswerEvaluator, questions: Vec<Question>, test: Test) -> Harness {
        let sessions = Arc::new(InMemorySessionRepository::default());
        let turns = Arc::new(InMemoryTurnRepository::default());
        let scores = Arc::new(InMemoryScoreRepository::default());
        let question_repo = Arc::new(InMemoryQuestionRepository::with_questions(questions));
        let test_repo = Arc::new(InMemoryTestRepository::with_tests(vec![test]));

        let service = SessionService::new(
            sessions.clone(),
            turns.clone(),
            scores.clone(),
            question_repo,
            test_repo,
            Arc::new(evaluator),
        );

        Harness {
            service,
            sessions,
            turns,
            scores,
        }
    }

    fn two_question_fixture() -> (Vec<Question>, Test) {
        let questions = vec![
            Question::new("topic-1", "What is borrowing?", Difficulty::Easy, None),
            Question::new("topic-1", "Explain lifetimes.", Difficulty::Hard, None),
        ];
        let test = Test::new(
            "Rust basics",
            None,
            questions.iter().map(|q| q.id.clone()).collect(),
            30,
            TestType::Test,
        );
        (questions, test)
    }

    #[actix_web::test]
    async fn test_evaluation_failure_leaves_no_side_effects() {
        let mut evaluator = MockAnswerEvaluator::new();
        evaluator.expect_evaluate().returning(|_, _, _| {
            Err(AppError::EvaluationUpstream("model unavailable".to_string()))
        });

        let (questions, test) = two_question_fixture();
        let test_id = test.id.clone();
        let h = harness(evaluator, questions, test);

        let started = h
            .service
            .start(
                "user-1",
                StartSessionRequest {
                    test_id: Some(test_id),
                    topic_id: None,
                },
            )
            .await
            .unwrap();

        let result = h
            .service
            .submit_answer(
                "user-1",
                "johndoe",
                SubmitAnswerRequest {
                    session_id: started.session.id.clone(),
                    answer: "my answer".to_string(),
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::EvaluationUpstream(_))));

        let session = h.sessions.find_by_id(&started.session.id).await.unwrap().unwrap();
        assert_eq!(session.current_question_index, 0);
        assert_eq!(session.status, SessionStatus::InProgress);
        assert!(h.turns.find_by_session(&session.id).await.unwrap().is_empty());
        assert!(h.scores.find_by_session(&session.id).await.unwrap().is_none());
    }

    #[actix_web::test]
    async fn test_foreign_session_is_forbidden() {
        let mut evaluator = MockAnswerEvaluator::new();
        evaluator.expect_evaluate().never();

        let (questions, test) = two_question_fixture();
        let test_id = test.id.clone();
        let h = harness(evaluator, questions, test);

        let started = h
            .service
            .start(
                "user-1",
                StartSessionRequest {
                    test_id: Some(test_id),
                    topic_id: None,
                },
            )
            .await
            .unwrap();

        let result = h
            .service
            .submit_answer(
                "intruder",
                "intruder",
                SubmitAnswerRequest {
                    session_id: started.session.id.clone(),
                    answer: "my answer".to_string(),
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
        assert!(h
            .turns
            .find_by_session(&started.session.id)
            .await
            .unwrap()
            .is_empty());
    }

    #[actix_web::test]
    async fn test_start_requires_exactly_one_source() {
        let (questions, test) = two_question_fixture();
        let h = harness(MockAnswerEvaluator::new(), questions, test);

        let neither = h
            .service
            .start(
                "user-1",
                StartSessionRequest {
                    test_id: None,
                    topic_id: None,
                },
            )
            .await;

        assert!(matches!(neither, Err(AppError::ValidationError(_))));
    }

    #[actix_web::test]
    async fn test_start_unknown_test_is_not_found() {
        let (questions, test) = two_question_fixture();
        let h = harness(MockAnswerEvaluator::new(), questions, test);

        let result = h
            .service
            .start(
                "user-1",
                StartSessionRequest {
                    test_id: Some("missing".to_string()),
                    topic_id: None,
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[actix_web::test]
    async fn test_start_empty_topic_has_no_questions() {
        let (questions, test) = two_question_fixture();
        let h = harness(MockAnswerEvaluator::new(), questions, test);

        let result = h
            .service
            .start(
                "user-1",
                StartSessionRequest {
                    test_id: None,
                    topic_id: Some("deserted-topic".to_string()),
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::NoQuestionsAvailable(_))));
    }
}
