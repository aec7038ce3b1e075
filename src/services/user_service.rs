use std::sync::Arc;

use crate::{
    auth::{hash_password, verify_password},
    errors::{AppError, AppResult},
    models::{domain::User, dto::request::{LoginRequest, RegisterRequest}},
    repositories::UserRepository,
};

pub struct UserService {
    repository: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    pub async fn register(&self, request: RegisterRequest) -> AppResult<User> {
        if self
            .repository
            .find_by_username(&request.username)
            .await?
            .is_some()
        {
            return Err(AppError::AlreadyExists(format!(
                "Username '{}' is taken",
                request.username
            )));
        }

        let password_hash = hash_password(&request.password)?;
        let user = User::new(&request.username, &password_hash, request.full_name);

        log::info!("Registered user '{}'", user.username);

        self.repository.create(user).await
    }

    pub async fn login(&self, request: LoginRequest) -> AppResult<User> {
        // Same error for unknown user and bad password; don't leak
        // which usernames exist.
        let invalid =
            || AppError::Unauthorized("Invalid username or password".to_string());

        let user = self
            .repository
            .find_by_username(&request.username)
            .await?
            .ok_or_else(invalid)?;

        if !verify_password(&request.password, &user.password_hash)? {
            return Err(invalid());
        }

        Ok(user)
    }

    pub async fn get_user(&self, id: &str) -> AppResult<User> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User with id '{}' not found", id)))
    }
}
