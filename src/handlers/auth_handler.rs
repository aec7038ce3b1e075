use std::sync::Arc;

use actix_web::{get, post, web, HttpResponse};
use validator::Validate;

use crate::{
    app_state::AppState,
    auth::{AuthenticatedUser, JwtService},
    errors::AppError,
    models::dto::{
        request::{LoginRequest, RegisterRequest},
        response::{AuthResponse, UserDto},
    },
};

#[post("/api/auth/register")]
pub async fn register(
    state: web::Data<Arc<AppState>>,
    jwt_service: web::Data<JwtService>,
    request: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    request.validate()?;

    let user = state.user_service.register(request.into_inner()).await?;
    let token = jwt_service.create_token(&user)?;

    Ok(HttpResponse::Created().json(AuthResponse {
        token,
        user: user.into(),
    }))
}

#[post("/api/auth/login")]
pub async fn login(
    state: web::Data<Arc<AppState>>,
    jwt_service: web::Data<JwtService>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    request.validate()?;

    let user = state.user_service.login(request.into_inner()).await?;
    let token = jwt_service.create_token(&user)?;

    Ok(HttpResponse::Ok().json(AuthResponse {
        token,
        user: user.into(),
    }))
}

#[get("/api/auth/me")]
pub async fn current_user(
    state: web::Data<Arc<AppState>>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let user = state.user_service.get_user(&auth.0.sub).await?;

    Ok(HttpResponse::Ok().json(UserDto::from(user)))
}
