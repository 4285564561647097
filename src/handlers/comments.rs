// src/handlers/comments.rs

use axum::{Json, extract::State};

use crate::{
    error::{AppError, ErrorBody},
    models::comment::{CommentResponse, CommentsResponse, CreateOrUpdateCommentRequest},
    services::{access::authorize, comments::CommentService},
    utils::{basic_auth::AuthUser, path::Path, validation::ValidJson},
};

#[utoipa::path(
    get,
    path = "/ads/{id}/comments",
    tag = "Comments",
    security(("basicAuth" = [])),
    params(("id" = i32, Path, description = "Ad id")),
    responses(
        (status = 200, description = "Comments of the ad, newest first", body = CommentsResponse),
        (status = 404, description = "No such ad", body = ErrorBody)
    )
)]
pub async fn list_comments(
    State(comments): State<CommentService>,
    _user: AuthUser,
    Path(ad_id): Path<i32>,
) -> Result<Json<CommentsResponse>, AppError> {
    Ok(Json(comments.list(ad_id).await?))
}

#[utoipa::path(
    post,
    path = "/ads/{id}/comments",
    tag = "Comments",
    security(("basicAuth" = [])),
    params(("id" = i32, Path, description = "Ad id")),
    request_body = CreateOrUpdateCommentRequest,
    responses(
        (status = 200, description = "Comment added", body = CommentResponse),
        (status = 400, description = "Invalid text", body = ErrorBody),
        (status = 404, description = "No such ad", body = ErrorBody)
    )
)]
pub async fn add_comment(
    State(comments): State<CommentService>,
    user: AuthUser,
    Path(ad_id): Path<i32>,
    ValidJson(payload): ValidJson<CreateOrUpdateCommentRequest>,
) -> Result<Json<CommentResponse>, AppError> {
    Ok(Json(comments.add(&user.username, ad_id, payload).await?))
}

#[utoipa::path(
    patch,
    path = "/ads/{id}/comments/{comment_id}",
    tag = "Comments",
    security(("basicAuth" = [])),
    params(
        ("id" = i32, Path, description = "Ad id"),
        ("comment_id" = i32, Path, description = "Comment id")
    ),
    request_body = CreateOrUpdateCommentRequest,
    responses(
        (status = 200, description = "Comment text replaced", body = CommentResponse),
        (status = 403, description = "Not the author", body = ErrorBody),
        (status = 404, description = "No such comment", body = ErrorBody)
    )
)]
pub async fn update_comment(
    State(comments): State<CommentService>,
    user: AuthUser,
    Path((ad_id, comment_id)): Path<(i32, i32)>,
    ValidJson(payload): ValidJson<CreateOrUpdateCommentRequest>,
) -> Result<Json<CommentResponse>, AppError> {
    authorize(&user, comments.is_owner(&user.username, ad_id, comment_id)).await?;
    Ok(Json(comments.update(ad_id, comment_id, payload).await?))
}

#[utoipa::path(
    delete,
    path = "/ads/{id}/comments/{comment_id}",
    tag = "Comments",
    security(("basicAuth" = [])),
    params(
        ("id" = i32, Path, description = "Ad id"),
        ("comment_id" = i32, Path, description = "Comment id")
    ),
    responses(
        (status = 200, description = "Comment removed"),
        (status = 403, description = "Not the author", body = ErrorBody),
        (status = 404, description = "No such comment", body = ErrorBody)
    )
)]
pub async fn delete_comment(
    State(comments): State<CommentService>,
    user: AuthUser,
    Path((ad_id, comment_id)): Path<(i32, i32)>,
) -> Result<(), AppError> {
    authorize(&user, comments.is_owner(&user.username, ad_id, comment_id)).await?;
    comments.delete(ad_id, comment_id).await
}
