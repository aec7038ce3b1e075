use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{
    db::Database,
    errors::{AppError, AppResult},
    models::domain::Score,
};

#[async_trait]
pub trait ScoreRepository: Send + Sync {
    async fn create(&self, score: Score) -> AppResult<Score>;
    async fn find_by_session(&self, session_id: &str) -> AppResult<Option<Score>>;
    /// Newest first; feeds the evaluation context's score history.
    async fn find_by_user(&self, user_id: &str) -> AppResult<Vec<Score>>;
    /// Compensation hook for a completion that failed after the score
    /// was written.
    async fn delete(&self, id: &str) -> AppResult<()>;
    async fn ensure_indexes(&self) -> AppResult<()>;
}

pub struct MongoScoreRepository {
    collection: Collection<Score>,
}

impl MongoScoreRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("scores");
        Self { collection }
    }
}

#[async_trait]
impl ScoreRepository for MongoScoreRepository {
    async fn create(&self, score: Score) -> AppResult<Score> {
        self.collection.insert_one(&score).await?;
        Ok(score)
    }

    async fn find_by_session(&self, session_id: &str) -> AppResult<Option<Score>> {
        let score = self
            .collection
            .find_one(doc! { "session_id": session_id })
            .await?;
        Ok(score)
    }

    async fn find_by_user(&self, user_id: &str) -> AppResult<Vec<Score>> {
        let scores = self
            .collection
            .find(doc! { "user_id": user_id })
            .sort(doc! { "created_at": -1 })
            .await?
            .try_collect()
            .await?;
        Ok(scores)
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        let result = self.collection.delete_one(doc! { "id": id }).await?;

        if result.deleted_count == 0 {
            return Err(AppError::NotFound(format!(
                "Score with id '{}' not found",
                id
            )));
        }

        Ok(())
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for scores collection");

        let session_index = IndexModel::builder()
            .keys(doc! { "session_id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("session_unique".to_string())
                    .build(),
            )
            .build();

        let user_index = IndexModel::builder()
            .keys(doc! { "user_id": 1, "created_at": -1 })
            .options(
                IndexOptions::builder()
                    .name("user_created".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(session_index).await?;
        self.collection.create_index(user_index).await?;

        Ok(())
    }
}
