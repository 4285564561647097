use std::sync::Arc;

use crate::{
    error::AppError,
    models::user::{NewPasswordRequest, UpdateUserRequest, User, UserResponse},
    repository::UserRepository,
    services::{images::ImageStore, janitor::ImageJanitor},
    utils::{
        hash::{hash_password, verify_password},
        multipart::UploadedFile,
    },
};

/// Profile operations for the authenticated user.
#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
    images: ImageStore,
    janitor: ImageJanitor,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>, images: ImageStore, janitor: ImageJanitor) -> Self {
        Self {
            users,
            images,
            janitor,
        }
    }

    async fn require(&self, username: &str) -> Result<User, AppError> {
        self.users
            .find_by_username(username)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    pub async fn get_me(&self, username: &str) -> Result<UserResponse, AppError> {
        Ok(self.require(username).await?.into())
    }

    pub async fn update_me(
        &self,
        username: &str,
        update: UpdateUserRequest,
    ) -> Result<UpdateUserRequest, AppError> {
        let user = self.require(username).await?;
        self.users
            .update_profile(user.id, &update.first_name, &update.last_name, &update.phone)
            .await?;
        Ok(update)
    }

    /// Stores the new avatar, then hands the previous file to the janitor.
    pub async fn update_avatar(&self, username: &str, image: UploadedFile) -> Result<(), AppError> {
        let user = self.require(username).await?;
        let path = self
            .images
            .save(image.file_name.as_deref(), &image.bytes)
            .await?;
        self.users.update_image(user.id, &path).await?;

        if let Some(old) = user.image {
            self.janitor.schedule(old);
        }
        Ok(())
    }

    /// Requires the current password; a mismatch is `Forbidden`.
    pub async fn set_password(
        &self,
        username: &str,
        request: NewPasswordRequest,
    ) -> Result<(), AppError> {
        let user = self.require(username).await?;
        if !verify_password(&request.current_password, &user.password)? {
            tracing::warn!(%username, "password change refused: current password mismatch");
            return Err(AppError::Forbidden("Current password is incorrect".to_string()));
        }

        let hash = hash_password(&request.new_password)?;
        self.users.update_password(user.id, &hash).await
    }
}
