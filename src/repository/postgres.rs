//! PostgreSQL repositories.
//!
//! Every method is a single statement, so each call is atomic on its own.
//! Joins are explicit; nothing is lazily loaded.

use async_trait::async_trait;
use sqlx::PgPool;

use super::{AdRepository, CommentRepository, UserRepository};
use crate::{
    error::AppError,
    models::{
        ad::{Ad, AdDetails, NewAd, UpdateAdRequest},
        comment::{Comment, NewComment},
        user::{NewUser, User},
    },
};

const USER_COLUMNS: &str =
    "id, username, password, first_name, last_name, phone, authority, image";

const AD_COLUMNS: &str = "id, author_id, title, description, price, image";

const AD_DETAILS_SELECT: &str = r#"
    SELECT
        a.id, a.author_id,
        u.username AS author_username,
        u.first_name AS author_first_name,
        u.last_name AS author_last_name,
        u.phone AS author_phone,
        a.title, a.description, a.price, a.image
    FROM ads a
    JOIN users u ON u.id = a.author_id
"#;

/// Selects from a relation aliased `c` that has the comments columns.
const COMMENT_SELECT: &str = r#"
    SELECT
        c.id, c.ad_id, c.author_id,
        u.username AS author_username,
        u.first_name AS author_first_name,
        u.image AS author_image,
        c.text, c.created_at
"#;

#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE username = $1");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn create(&self, user: NewUser) -> Result<User, AppError> {
        let sql = format!(
            r#"
            INSERT INTO users (username, password, first_name, last_name, phone, authority)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {USER_COLUMNS}
            "#
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(&user.username)
            .bind(&user.password_hash)
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(&user.phone)
            .bind(user.role.authority())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db) if db.is_unique_violation() => {
                    AppError::BadRequest(format!("User '{}' already exists", user.username))
                }
                _ => {
                    tracing::error!("Failed to register user: {:?}", e);
                    AppError::from(e)
                }
            })
    }

    async fn update_profile(
        &self,
        id: i32,
        first_name: &str,
        last_name: &str,
        phone: &str,
    ) -> Result<(), AppError> {
        sqlx::query("UPDATE users SET first_name = $1, last_name = $2, phone = $3 WHERE id = $4")
            .bind(first_name)
            .bind(last_name)
            .bind(phone)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn update_password(&self, id: i32, password_hash: &str) -> Result<(), AppError> {
        sqlx::query("UPDATE users SET password = $1 WHERE id = $2")
            .bind(password_hash)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn update_image(&self, id: i32, image: &str) -> Result<(), AppError> {
        sqlx::query("UPDATE users SET image = $1 WHERE id = $2")
            .bind(image)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[derive(Clone)]
pub struct PgAdRepository {
    pool: PgPool,
}

impl PgAdRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AdRepository for PgAdRepository {
    async fn list(&self) -> Result<Vec<Ad>, AppError> {
        let sql = format!("SELECT {AD_COLUMNS} FROM ads ORDER BY id");
        let ads = sqlx::query_as::<_, Ad>(&sql).fetch_all(&self.pool).await?;
        Ok(ads)
    }

    async fn list_by_author(&self, author_id: i32) -> Result<Vec<Ad>, AppError> {
        let sql = format!("SELECT {AD_COLUMNS} FROM ads WHERE author_id = $1 ORDER BY id");
        let ads = sqlx::query_as::<_, Ad>(&sql)
            .bind(author_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(ads)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Ad>, AppError> {
        let sql = format!("SELECT {AD_COLUMNS} FROM ads WHERE id = $1");
        let ad = sqlx::query_as::<_, Ad>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(ad)
    }

    async fn find_details(&self, id: i32) -> Result<Option<AdDetails>, AppError> {
        let sql = format!("{AD_DETAILS_SELECT} WHERE a.id = $1");
        let ad = sqlx::query_as::<_, AdDetails>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(ad)
    }

    async fn create(&self, ad: NewAd) -> Result<Ad, AppError> {
        let sql = format!(
            r#"
            INSERT INTO ads (author_id, title, description, price, image)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {AD_COLUMNS}
            "#
        );
        let ad = sqlx::query_as::<_, Ad>(&sql)
            .bind(ad.author_id)
            .bind(&ad.title)
            .bind(&ad.description)
            .bind(ad.price)
            .bind(&ad.image)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create ad: {:?}", e);
                AppError::from(e)
            })?;
        Ok(ad)
    }

    async fn update_fields(&self, id: i32, changes: &UpdateAdRequest) -> Result<Option<Ad>, AppError> {
        let sql = format!(
            r#"
            UPDATE ads SET
                title = COALESCE($1, title),
                description = COALESCE($2, description),
                price = COALESCE($3, price)
            WHERE id = $4
            RETURNING {AD_COLUMNS}
            "#
        );
        let ad = sqlx::query_as::<_, Ad>(&sql)
            .bind(changes.title.as_deref())
            .bind(changes.description.as_deref())
            .bind(changes.price)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(ad)
    }

    async fn update_image(&self, id: i32, image: &str) -> Result<Option<Ad>, AppError> {
        let sql = format!("UPDATE ads SET image = $1 WHERE id = $2 RETURNING {AD_COLUMNS}");
        let ad = sqlx::query_as::<_, Ad>(&sql)
            .bind(image)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(ad)
    }

    async fn delete(&self, id: i32) -> Result<bool, AppError> {
        // comments go with it through ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM ads WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[derive(Clone)]
pub struct PgCommentRepository {
    pool: PgPool,
}

impl PgCommentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentRepository for PgCommentRepository {
    async fn list_by_ad(&self, ad_id: i32) -> Result<Vec<Comment>, AppError> {
        let sql = format!(
            r#"
            {COMMENT_SELECT}
            FROM comments c
            JOIN users u ON u.id = c.author_id
            WHERE c.ad_id = $1
            ORDER BY c.created_at DESC, c.id DESC
            "#
        );
        let comments = sqlx::query_as::<_, Comment>(&sql)
            .bind(ad_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(comments)
    }

    async fn find(&self, ad_id: i32, comment_id: i32) -> Result<Option<Comment>, AppError> {
        let sql = format!(
            r#"
            {COMMENT_SELECT}
            FROM comments c
            JOIN users u ON u.id = c.author_id
            WHERE c.ad_id = $1 AND c.id = $2
            "#
        );
        let comment = sqlx::query_as::<_, Comment>(&sql)
            .bind(ad_id)
            .bind(comment_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(comment)
    }

    async fn create(&self, comment: NewComment) -> Result<Comment, AppError> {
        let sql = format!(
            r#"
            WITH c AS (
                INSERT INTO comments (ad_id, author_id, text, created_at)
                VALUES ($1, $2, $3, $4)
                RETURNING id, ad_id, author_id, text, created_at
            )
            {COMMENT_SELECT}
            FROM c
            JOIN users u ON u.id = c.author_id
            "#
        );
        let comment = sqlx::query_as::<_, Comment>(&sql)
            .bind(comment.ad_id)
            .bind(comment.author_id)
            .bind(&comment.text)
            .bind(comment.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create comment: {:?}", e);
                AppError::from(e)
            })?;
        Ok(comment)
    }

    async fn update_text(
        &self,
        ad_id: i32,
        comment_id: i32,
        text: &str,
    ) -> Result<Option<Comment>, AppError> {
        let sql = format!(
            r#"
            WITH c AS (
                UPDATE comments SET text = $1
                WHERE ad_id = $2 AND id = $3
                RETURNING id, ad_id, author_id, text, created_at
            )
            {COMMENT_SELECT}
            FROM c
            JOIN users u ON u.id = c.author_id
            "#
        );
        let comment = sqlx::query_as::<_, Comment>(&sql)
            .bind(text)
            .bind(ad_id)
            .bind(comment_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(comment)
    }

    async fn delete(&self, ad_id: i32, comment_id: i32) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM comments WHERE ad_id = $1 AND id = $2")
            .bind(ad_id)
            .bind(comment_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
