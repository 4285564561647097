use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Represents a row of the 'comments' table joined with its author.
#[derive(Debug, Clone, FromRow)]
pub struct Comment {
    pub id: i32,
    pub ad_id: i32,
    pub author_id: i32,
    pub author_username: String,
    pub author_first_name: String,
    pub author_image: Option<String>,
    pub text: String,
    /// Epoch milliseconds, set once at creation.
    pub created_at: i64,
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub ad_id: i32,
    pub author_id: i32,
    pub text: String,
    pub created_at: i64,
}

impl NewComment {
    /// Stamps the creation time with the current wall clock.
    pub fn now(ad_id: i32, author_id: i32, text: String) -> Self {
        Self {
            ad_id,
            author_id,
            text,
            created_at: chrono::Utc::now().timestamp_millis(),
        }
    }
}

/// DTO for creating or editing a comment.
#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreateOrUpdateCommentRequest {
    #[validate(length(min = 8, max = 64, message = "Comment must be between 8 and 64 characters"))]
    pub text: String,
}

/// DTO for displaying a comment with author info.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub author: i32,
    pub author_image: Option<String>,
    pub author_first_name: String,
    pub created_at: i64,
    pub pk: i32,
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CommentsResponse {
    pub count: usize,
    pub results: Vec<CommentResponse>,
}

impl From<Comment> for CommentResponse {
    fn from(comment: Comment) -> Self {
        Self {
            author: comment.author_id,
            author_image: comment.author_image,
            author_first_name: comment.author_first_name,
            created_at: comment.created_at,
            pk: comment.id,
            text: comment.text,
        }
    }
}

impl From<Vec<Comment>> for CommentsResponse {
    fn from(comments: Vec<Comment>) -> Self {
        let results: Vec<CommentResponse> =
            comments.into_iter().map(CommentResponse::from).collect();
        Self {
            count: results.len(),
            results,
        }
    }
}
