use std::sync::Arc;

use crate::{
    error::AppError,
    models::comment::{CommentResponse, CommentsResponse, CreateOrUpdateCommentRequest, NewComment},
    repository::{AdRepository, CommentRepository, UserRepository},
};

#[derive(Clone)]
pub struct CommentService {
    comments: Arc<dyn CommentRepository>,
    ads: Arc<dyn AdRepository>,
    users: Arc<dyn UserRepository>,
}

fn comment_not_found() -> AppError {
    AppError::NotFound("Comment not found".to_string())
}

impl CommentService {
    pub fn new(
        comments: Arc<dyn CommentRepository>,
        ads: Arc<dyn AdRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            comments,
            ads,
            users,
        }
    }

    async fn require_ad(&self, ad_id: i32) -> Result<(), AppError> {
        match self.ads.find_by_id(ad_id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::NotFound("Ad not found".to_string())),
        }
    }

    /// Comments of an ad, newest first.
    pub async fn list(&self, ad_id: i32) -> Result<CommentsResponse, AppError> {
        self.require_ad(ad_id).await?;
        Ok(self.comments.list_by_ad(ad_id).await?.into())
    }

    pub async fn add(
        &self,
        username: &str,
        ad_id: i32,
        request: CreateOrUpdateCommentRequest,
    ) -> Result<CommentResponse, AppError> {
        let author = self
            .users
            .find_by_username(username)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
        self.require_ad(ad_id).await?;

        let comment = self
            .comments
            .create(NewComment::now(ad_id, author.id, request.text))
            .await?;
        tracing::debug!(ad_id, comment_id = comment.id, %username, "comment added");
        Ok(comment.into())
    }

    /// Replaces the text only.
    pub async fn update(
        &self,
        ad_id: i32,
        comment_id: i32,
        request: CreateOrUpdateCommentRequest,
    ) -> Result<CommentResponse, AppError> {
        let comment = self
            .comments
            .update_text(ad_id, comment_id, &request.text)
            .await?
            .ok_or_else(comment_not_found)?;
        Ok(comment.into())
    }

    pub async fn delete(&self, ad_id: i32, comment_id: i32) -> Result<(), AppError> {
        if self.comments.delete(ad_id, comment_id).await? {
            Ok(())
        } else {
            Err(comment_not_found())
        }
    }

    /// `true` when the comment is missing or authored by `username`.
    pub async fn is_owner(&self, username: &str, ad_id: i32, comment_id: i32) -> Result<bool, AppError> {
        Ok(self
            .comments
            .find(ad_id, comment_id)
            .await?
            .is_none_or(|comment| comment.author_username == username))
    }
}
