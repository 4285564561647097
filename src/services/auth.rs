use std::sync::Arc;

use crate::{
    error::AppError,
    models::user::{NewUser, RegisterRequest, Role, User},
    repository::UserRepository,
    utils::hash::{hash_password, verify_password},
};

/// Registration and credential checks.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// The user if the credentials match, `None` for an unknown user or wrong password.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<Option<User>, AppError> {
        let Some(user) = self.users.find_by_username(username).await? else {
            tracing::debug!(%username, "authentication failed: unknown user");
            return Ok(None);
        };

        if verify_password(password, &user.password)? {
            Ok(Some(user))
        } else {
            tracing::debug!(%username, "authentication failed: wrong password");
            Ok(None)
        }
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<bool, AppError> {
        Ok(self.authenticate(username, password).await?.is_some())
    }

    /// Creates the account. An existing username is a `BadRequest`.
    pub async fn register(&self, request: RegisterRequest) -> Result<User, AppError> {
        if self.users.find_by_username(&request.username).await?.is_some() {
            return Err(AppError::BadRequest(format!(
                "User '{}' already exists",
                request.username
            )));
        }

        let password_hash = hash_password(&request.password)?;
        let user = self
            .users
            .create(NewUser {
                username: request.username,
                password_hash,
                first_name: request.first_name,
                last_name: request.last_name,
                phone: request.phone,
                role: request.role,
            })
            .await?;

        tracing::info!(username = %user.username, role = user.role().as_str(), "user registered");
        Ok(user)
    }

    /// Creates the configured admin account unless the username already exists.
    pub async fn ensure_admin(&self, username: &str, password: &str) -> Result<(), AppError> {
        if self.users.find_by_username(username).await?.is_some() {
            return Ok(());
        }

        tracing::info!("Seeding admin user: {}", username);
        self.users
            .create(NewUser {
                username: username.to_string(),
                password_hash: hash_password(password)?,
                first_name: "Admin".to_string(),
                last_name: "Admin".to_string(),
                phone: "+70000000000".to_string(),
                role: Role::Admin,
            })
            .await?;
        Ok(())
    }
}
