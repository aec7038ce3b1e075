use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::doc,
    error::{ErrorKind, WriteFailure},
    options::IndexOptions,
    Collection, IndexModel,
};

use crate::{
    db::Database,
    errors::{AppError, AppResult},
    models::domain::InterviewTurn,
};

const DUPLICATE_KEY_CODE: i32 = 11000;

#[async_trait]
pub trait TurnRepository: Send + Sync {
    /// Fails with `Conflict` if a turn with the same
    /// `(session_id, turn_number)` already exists.
    async fn create(&self, turn: InterviewTurn) -> AppResult<InterviewTurn>;
    /// Turns sorted by ascending `turn_number`.
    async fn find_by_session(&self, session_id: &str) -> AppResult<Vec<InterviewTurn>>;
    /// Compensation hook for a submission that failed after the turn
    /// was written.
    async fn delete(&self, id: &str) -> AppResult<()>;
    async fn ensure_indexes(&self) -> AppResult<()>;
}

pub struct MongoTurnRepository {
    collection: Collection<InterviewTurn>,
}

impl MongoTurnRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("interview_turns");
        Self { collection }
    }
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        *err.kind,
        ErrorKind::Write(WriteFailure::WriteError(ref write_error))
            if write_error.code == DUPLICATE_KEY_CODE
    )
}

#[async_trait]
impl TurnRepository for MongoTurnRepository {
    async fn create(&self, turn: InterviewTurn) -> AppResult<InterviewTurn> {
        match self.collection.insert_one(&turn).await {
            Ok(_) => Ok(turn),
            Err(e) if is_duplicate_key(&e) => Err(AppError::Conflict(format!(
                "Turn {} already recorded for session '{}'",
                turn.turn_number, turn.session_id
            ))),
            Err(e) => Err(e.into()),
        }
    }

    async fn find_by_session(&self, session_id: &str) -> AppResult<Vec<InterviewTurn>> {
        let turns = self
            .collection
            .find(doc! { "session_id": session_id })
            .sort(doc! { "turn_number": 1 })
            .await?
            .try_collect()
            .await?;
        Ok(turns)
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        let result = self.collection.delete_one(doc! { "id": id }).await?;

        if result.deleted_count == 0 {
            return Err(AppError::NotFound(format!("Turn with id '{}' not found", id)));
        }

        Ok(())
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for interview_turns collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        // One turn per question per session; concurrent submissions for
        // the same index lose here rather than racing.
        let session_turn_index = IndexModel::builder()
            .keys(doc! { "session_id": 1, "turn_number": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("session_turn_unique".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(session_turn_index).await?;

        Ok(())
    }
}
