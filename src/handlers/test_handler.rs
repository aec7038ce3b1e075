use std::sync::Arc;

use actix_web::{get, post, web, HttpResponse};
use validator::Validate;

use crate::{
    app_state::AppState,
    auth::{require_admin, AuthenticatedUser},
    errors::AppError,
    models::dto::request::CreateTestRequest,
};

#[post("/api/tests")]
pub async fn create_test(
    state: web::Data<Arc<AppState>>,
    request: web::Json<CreateTestRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_admin(&auth.0)?;
    request.validate()?;

    let test = state.test_service.create_test(request.into_inner()).await?;

    Ok(HttpResponse::Created().json(test))
}

#[get("/api/tests")]
pub async fn list_tests(
    state: web::Data<Arc<AppState>>,
    _auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let tests = state.test_service.list_tests().await?;

    Ok(HttpResponse::Ok().json(tests))
}

#[get("/api/tests/{id}")]
pub async fn get_test(
    state: web::Data<Arc<AppState>>,
    id: web::Path<String>,
    _auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let test = state.test_service.get_test(&id).await?;

    Ok(HttpResponse::Ok().json(test))
}
