//! Persistence ports.
//!
//! Services talk to these traits only. `postgres` is the production backend,
//! `memory` keeps everything in process for tests and local development.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;

use crate::{
    error::AppError,
    models::{
        ad::{Ad, AdDetails, NewAd, UpdateAdRequest},
        comment::{Comment, NewComment},
        user::{NewUser, User},
    },
};

pub mod memory;
pub mod postgres;

pub use memory::MemoryRepository;
pub use postgres::{PgAdRepository, PgCommentRepository, PgUserRepository};

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError>;
    /// Fails with `BadRequest` when the username is taken.
    async fn create(&self, user: NewUser) -> Result<User, AppError>;
    async fn update_profile(
        &self,
        id: i32,
        first_name: &str,
        last_name: &str,
        phone: &str,
    ) -> Result<(), AppError>;
    async fn update_password(&self, id: i32, password_hash: &str) -> Result<(), AppError>;
    async fn update_image(&self, id: i32, image: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait AdRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Ad>, AppError>;
    async fn list_by_author(&self, author_id: i32) -> Result<Vec<Ad>, AppError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<Ad>, AppError>;
    /// The ad joined with its author.
    async fn find_details(&self, id: i32) -> Result<Option<AdDetails>, AppError>;
    async fn create(&self, ad: NewAd) -> Result<Ad, AppError>;
    /// Applies the fields present in `changes`. `None` when the ad does not exist.
    async fn update_fields(&self, id: i32, changes: &UpdateAdRequest) -> Result<Option<Ad>, AppError>;
    async fn update_image(&self, id: i32, image: &str) -> Result<Option<Ad>, AppError>;
    /// Removes the ad and, by cascade, its comments. `false` if it did not exist.
    async fn delete(&self, id: i32) -> Result<bool, AppError>;
}

#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Newest first.
    async fn list_by_ad(&self, ad_id: i32) -> Result<Vec<Comment>, AppError>;
    async fn find(&self, ad_id: i32, comment_id: i32) -> Result<Option<Comment>, AppError>;
    async fn create(&self, comment: NewComment) -> Result<Comment, AppError>;
    async fn update_text(
        &self,
        ad_id: i32,
        comment_id: i32,
        text: &str,
    ) -> Result<Option<Comment>, AppError>;
    async fn delete(&self, ad_id: i32, comment_id: i32) -> Result<bool, AppError>;
}

/// The set of repositories a running application is wired with.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub ads: Arc<dyn AdRepository>,
    pub comments: Arc<dyn CommentRepository>,
}

impl Repositories {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(PgUserRepository::new(pool.clone())),
            ads: Arc::new(PgAdRepository::new(pool.clone())),
            comments: Arc::new(PgCommentRepository::new(pool)),
        }
    }

    pub fn in_memory() -> Self {
        let store = MemoryRepository::new();
        Self {
            users: Arc::new(store.clone()),
            ads: Arc::new(store.clone()),
            comments: Arc::new(store),
        }
    }
}
