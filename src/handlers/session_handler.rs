use std::sync::Arc;

use actix_web::{get, post, web, HttpResponse};
use validator::Validate;

use crate::{
    app_state::AppState,
    auth::AuthenticatedUser,
    errors::AppError,
    models::dto::request::{StartSessionRequest, SubmitAnswerRequest},
};

#[post("/api/sessions/start")]
pub async fn start_session(
    state: web::Data<Arc<AppState>>,
    request: web::Json<StartSessionRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let started = state
        .session_service
        .start(&auth.0.sub, request.into_inner())
        .await?;

    Ok(HttpResponse::Created().json(started))
}

#[get("/api/sessions/history")]
pub async fn get_session_history(
    state: web::Data<Arc<AppState>>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let summaries = state.session_service.history(&auth.0.sub).await?;

    Ok(HttpResponse::Ok().json(summaries))
}

#[post("/api/sessions/answer")]
pub async fn submit_answer(
    state: web::Data<Arc<AppState>>,
    request: web::Json<SubmitAnswerRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    request.validate()?;

    let outcome = state
        .session_service
        .submit_answer(&auth.0.sub, &auth.0.username, request.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(outcome))
}

#[get("/api/sessions/{id}")]
pub async fn get_session(
    state: web::Data<Arc<AppState>>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let detail = state.session_service.get_session(&auth.0.sub, &id).await?;

    Ok(HttpResponse::Ok().json(detail))
}

#[get("/api/sessions/{id}/turns")]
pub async fn get_session_turns(
    state: web::Data<Arc<AppState>>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let turns = state.session_service.get_turns(&auth.0.sub, &id).await?;

    Ok(HttpResponse::Ok().json(turns))
}

#[post("/api/sessions/{id}/quit")]
pub async fn quit_session(
    state: web::Data<Arc<AppState>>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let session = state.session_service.quit(&auth.0.sub, &id).await?;

    Ok(HttpResponse::Ok().json(session))
}

#[get("/api/sessions/{id}/score")]
pub async fn get_session_score(
    state: web::Data<Arc<AppState>>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let score = state.session_service.get_score(&auth.0.sub, &id).await?;

    Ok(HttpResponse::Ok().json(score))
}
