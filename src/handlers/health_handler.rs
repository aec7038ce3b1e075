use std::sync::Arc;

use actix_web::{get, web, HttpResponse};
use serde_json::json;

use crate::{app_state::AppState, errors::AppError};

#[get("/health")]
pub async fn health_check(state: web::Data<Arc<AppState>>) -> Result<HttpResponse, AppError> {
    state.database.health_check().await?;

    Ok(HttpResponse::Ok().json(json!({ "status": "ok" })))
}
