use std::sync::Arc;

use actix_web::{get, post, web, HttpResponse};
use validator::Validate;

use crate::{
    app_state::AppState,
    auth::{require_admin, AuthenticatedUser},
    errors::AppError,
    models::dto::request::{CreateQuestionRequest, ListQuestionsQuery},
};

#[post("/api/questions")]
pub async fn create_question(
    state: web::Data<Arc<AppState>>,
    request: web::Json<CreateQuestionRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_admin(&auth.0)?;
    request.validate()?;

    let question = state
        .question_service
        .create_question(request.into_inner())
        .await?;

    Ok(HttpResponse::Created().json(question))
}

#[get("/api/questions/{id}")]
pub async fn get_question(
    state: web::Data<Arc<AppState>>,
    id: web::Path<String>,
    _auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let question = state.question_service.get_question(&id).await?;

    Ok(HttpResponse::Ok().json(question))
}

#[get("/api/questions")]
pub async fn list_questions(
    state: web::Data<Arc<AppState>>,
    web::Query(params): web::Query<ListQuestionsQuery>,
    _auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let questions = state
        .question_service
        .list_questions(params.topic_id.as_deref())
        .await?;

    Ok(HttpResponse::Ok().json(questions))
}
