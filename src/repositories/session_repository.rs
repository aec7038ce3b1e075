use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{
    db::Database,
    errors::AppResult,
    models::domain::{InterviewSession, SessionStatus},
};

/// Session lifecycle storage. The three transition methods are
/// compare-and-swap updates: they only match a document that is still
/// `in_progress` (and, for progress updates, still at the expected
/// index), and return `false` when another writer got there first.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn create(&self, session: InterviewSession) -> AppResult<InterviewSession>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<InterviewSession>>;
    async fn find_by_user(&self, user_id: &str) -> AppResult<Vec<InterviewSession>>;
    async fn advance_progress(&self, id: &str, expected_index: i32) -> AppResult<bool>;
    async fn complete(
        &self,
        id: &str,
        expected_index: i32,
        completed_at: DateTime<Utc>,
    ) -> AppResult<bool>;
    async fn abandon(&self, id: &str) -> AppResult<bool>;
    async fn ensure_indexes(&self) -> AppResult<()>;
}

pub struct MongoSessionRepository {
    collection: Collection<InterviewSession>,
}

impl MongoSessionRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("interview_sessions");
        Self { collection }
    }
}

#[async_trait]
impl SessionRepository for MongoSessionRepository {
    async fn create(&self, session: InterviewSession) -> AppResult<InterviewSession> {
        self.collection.insert_one(&session).await?;
        Ok(session)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<InterviewSession>> {
        let session = self.collection.find_one(doc! { "id": id }).await?;
        Ok(session)
    }

    async fn find_by_user(&self, user_id: &str) -> AppResult<Vec<InterviewSession>> {
        let sessions = self
            .collection
            .find(doc! { "user_id": user_id })
            .sort(doc! { "started_at": -1 })
            .await?
            .try_collect()
            .await?;
        Ok(sessions)
    }

    async fn advance_progress(&self, id: &str, expected_index: i32) -> AppResult<bool> {
        let result = self
            .collection
            .update_one(
                doc! {
                    "id": id,
                    "status": SessionStatus::InProgress.as_str(),
                    "current_question_index": expected_index,
                },
                doc! { "$set": { "current_question_index": expected_index + 1 } },
            )
            .await?;

        Ok(result.matched_count == 1)
    }

    async fn complete(
        &self,
        id: &str,
        expected_index: i32,
        completed_at: DateTime<Utc>,
    ) -> AppResult<bool> {
        let result = self
            .collection
            .update_one(
                doc! {
                    "id": id,
                    "status": SessionStatus::InProgress.as_str(),
                    "current_question_index": expected_index,
                },
                doc! { "$set": {
                    "status": SessionStatus::Completed.as_str(),
                    "current_question_index": expected_index + 1,
                    "completed_at": completed_at.to_rfc3339(),
                } },
            )
            .await?;

        Ok(result.matched_count == 1)
    }

    async fn abandon(&self, id: &str) -> AppResult<bool> {
        let result = self
            .collection
            .update_one(
                doc! {
                    "id": id,
                    "status": SessionStatus::InProgress.as_str(),
                },
                doc! { "$set": { "status": SessionStatus::Abandoned.as_str() } },
            )
            .await?;

        Ok(result.matched_count == 1)
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for interview_sessions collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        let user_index = IndexModel::builder()
            .keys(doc! { "user_id": 1, "started_at": -1 })
            .options(
                IndexOptions::builder()
                    .name("user_started".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(user_index).await?;

        Ok(())
    }
}
