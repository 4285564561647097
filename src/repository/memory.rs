//! In-memory repository.
//!
//! Implements every repository trait over plain maps behind one lock, with the
//! same semantics as the PostgreSQL schema: unique usernames, sequential ids,
//! and deletion of an ad cascading to its comments.

use std::{collections::BTreeMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{AdRepository, CommentRepository, UserRepository};
use crate::{
    error::AppError,
    models::{
        ad::{Ad, AdDetails, NewAd, UpdateAdRequest},
        comment::{Comment, NewComment},
        user::{NewUser, User},
    },
};

#[derive(Debug, Clone)]
struct CommentRow {
    id: i32,
    ad_id: i32,
    author_id: i32,
    text: String,
    created_at: i64,
}

#[derive(Default)]
struct MemoryData {
    users: BTreeMap<i32, User>,
    ads: BTreeMap<i32, Ad>,
    comments: BTreeMap<i32, CommentRow>,
    next_user_id: i32,
    next_ad_id: i32,
    next_comment_id: i32,
}

impl MemoryData {
    fn next_id(counter: &mut i32) -> i32 {
        *counter += 1;
        *counter
    }

    fn author(&self, id: i32) -> Result<&User, AppError> {
        self.users
            .get(&id)
            .ok_or_else(|| AppError::InternalServerError(format!("dangling author id {id}")))
    }

    fn comment_view(&self, row: &CommentRow) -> Result<Comment, AppError> {
        let author = self.author(row.author_id)?;
        Ok(Comment {
            id: row.id,
            ad_id: row.ad_id,
            author_id: row.author_id,
            author_username: author.username.clone(),
            author_first_name: author.first_name.clone(),
            author_image: author.image.clone(),
            text: row.text.clone(),
            created_at: row.created_at,
        })
    }

    fn find_comment(&self, ad_id: i32, comment_id: i32) -> Option<&CommentRow> {
        self.comments
            .get(&comment_id)
            .filter(|row| row.ad_id == ad_id)
    }
}

/// Cheap to clone; clones share the same data.
#[derive(Clone, Default)]
pub struct MemoryRepository {
    data: Arc<RwLock<MemoryData>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let data = self.data.read().await;
        Ok(data.users.values().find(|u| u.username == username).cloned())
    }

    async fn create(&self, user: NewUser) -> Result<User, AppError> {
        let mut data = self.data.write().await;
        if data.users.values().any(|u| u.username == user.username) {
            return Err(AppError::BadRequest(format!(
                "User '{}' already exists",
                user.username
            )));
        }

        let id = MemoryData::next_id(&mut data.next_user_id);
        let user = User {
            id,
            username: user.username,
            password: user.password_hash,
            first_name: user.first_name,
            last_name: user.last_name,
            phone: user.phone,
            authority: user.role.authority(),
            image: None,
        };
        data.users.insert(id, user.clone());
        Ok(user)
    }

    async fn update_profile(
        &self,
        id: i32,
        first_name: &str,
        last_name: &str,
        phone: &str,
    ) -> Result<(), AppError> {
        if let Some(user) = self.data.write().await.users.get_mut(&id) {
            user.first_name = first_name.to_string();
            user.last_name = last_name.to_string();
            user.phone = phone.to_string();
        }
        Ok(())
    }

    async fn update_password(&self, id: i32, password_hash: &str) -> Result<(), AppError> {
        if let Some(user) = self.data.write().await.users.get_mut(&id) {
            user.password = password_hash.to_string();
        }
        Ok(())
    }

    async fn update_image(&self, id: i32, image: &str) -> Result<(), AppError> {
        if let Some(user) = self.data.write().await.users.get_mut(&id) {
            user.image = Some(image.to_string());
        }
        Ok(())
    }
}

#[async_trait]
impl AdRepository for MemoryRepository {
    async fn list(&self) -> Result<Vec<Ad>, AppError> {
        Ok(self.data.read().await.ads.values().cloned().collect())
    }

    async fn list_by_author(&self, author_id: i32) -> Result<Vec<Ad>, AppError> {
        let data = self.data.read().await;
        Ok(data
            .ads
            .values()
            .filter(|ad| ad.author_id == author_id)
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Ad>, AppError> {
        Ok(self.data.read().await.ads.get(&id).cloned())
    }

    async fn find_details(&self, id: i32) -> Result<Option<AdDetails>, AppError> {
        let data = self.data.read().await;
        let Some(ad) = data.ads.get(&id) else {
            return Ok(None);
        };
        let author = data.author(ad.author_id)?;
        Ok(Some(AdDetails {
            id: ad.id,
            author_id: ad.author_id,
            author_username: author.username.clone(),
            author_first_name: author.first_name.clone(),
            author_last_name: author.last_name.clone(),
            author_phone: author.phone.clone(),
            title: ad.title.clone(),
            description: ad.description.clone(),
            price: ad.price,
            image: ad.image.clone(),
        }))
    }

    async fn create(&self, ad: NewAd) -> Result<Ad, AppError> {
        let mut data = self.data.write().await;
        data.author(ad.author_id)?;

        let id = MemoryData::next_id(&mut data.next_ad_id);
        let ad = Ad {
            id,
            author_id: ad.author_id,
            title: ad.title,
            description: ad.description,
            price: ad.price,
            image: ad.image,
        };
        data.ads.insert(id, ad.clone());
        Ok(ad)
    }

    async fn update_fields(&self, id: i32, changes: &UpdateAdRequest) -> Result<Option<Ad>, AppError> {
        let mut data = self.data.write().await;
        Ok(data.ads.get_mut(&id).map(|ad| {
            if let Some(title) = &changes.title {
                ad.title = title.clone();
            }
            if let Some(description) = &changes.description {
                ad.description = description.clone();
            }
            if let Some(price) = changes.price {
                ad.price = price;
            }
            ad.clone()
        }))
    }

    async fn update_image(&self, id: i32, image: &str) -> Result<Option<Ad>, AppError> {
        let mut data = self.data.write().await;
        Ok(data.ads.get_mut(&id).map(|ad| {
            ad.image = image.to_string();
            ad.clone()
        }))
    }

    async fn delete(&self, id: i32) -> Result<bool, AppError> {
        let mut data = self.data.write().await;
        if data.ads.remove(&id).is_none() {
            return Ok(false);
        }
        data.comments.retain(|_, row| row.ad_id != id);
        Ok(true)
    }
}

#[async_trait]
impl CommentRepository for MemoryRepository {
    async fn list_by_ad(&self, ad_id: i32) -> Result<Vec<Comment>, AppError> {
        let data = self.data.read().await;
        let mut rows: Vec<&CommentRow> = data
            .comments
            .values()
            .filter(|row| row.ad_id == ad_id)
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        rows.into_iter().map(|row| data.comment_view(row)).collect()
    }

    async fn find(&self, ad_id: i32, comment_id: i32) -> Result<Option<Comment>, AppError> {
        let data = self.data.read().await;
        data.find_comment(ad_id, comment_id)
            .map(|row| data.comment_view(row))
            .transpose()
    }

    async fn create(&self, comment: NewComment) -> Result<Comment, AppError> {
        let mut data = self.data.write().await;
        if !data.ads.contains_key(&comment.ad_id) {
            return Err(AppError::InternalServerError(format!(
                "dangling ad id {}",
                comment.ad_id
            )));
        }
        data.author(comment.author_id)?;

        let id = MemoryData::next_id(&mut data.next_comment_id);
        let row = CommentRow {
            id,
            ad_id: comment.ad_id,
            author_id: comment.author_id,
            text: comment.text,
            created_at: comment.created_at,
        };
        let view = data.comment_view(&row)?;
        data.comments.insert(id, row);
        Ok(view)
    }

    async fn update_text(
        &self,
        ad_id: i32,
        comment_id: i32,
        text: &str,
    ) -> Result<Option<Comment>, AppError> {
        let mut data = self.data.write().await;
        if data.find_comment(ad_id, comment_id).is_none() {
            return Ok(None);
        }
        let Some(row) = data.comments.get_mut(&comment_id) else {
            return Ok(None);
        };
        row.text = text.to_string();
        let row = row.clone();
        data.comment_view(&row).map(Some)
    }

    async fn delete(&self, ad_id: i32, comment_id: i32) -> Result<bool, AppError> {
        let mut data = self.data.write().await;
        if data.find_comment(ad_id, comment_id).is_none() {
            return Ok(false);
        }
        Ok(data.comments.remove(&comment_id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::Role;

    fn new_user(username: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            password_hash: "hash".to_string(),
            first_name: "Ivan".to_string(),
            last_name: "Petrov".to_string(),
            phone: "+79876543210".to_string(),
            role: Role::User,
        }
    }

    fn new_ad(author_id: i32) -> NewAd {
        NewAd {
            author_id,
            title: "Sell phone".to_string(),
            description: "Good condition".to_string(),
            price: 3000,
            image: "/images/x_phone.png".to_string(),
        }
    }

    #[tokio::test]
    async fn usernames_are_unique() {
        let repo = MemoryRepository::new();
        UserRepository::create(&repo, new_user("a@mail.ru")).await.unwrap();
        let err = UserRepository::create(&repo, new_user("a@mail.ru"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn deleting_an_ad_cascades_to_comments() {
        let repo = MemoryRepository::new();
        let user = UserRepository::create(&repo, new_user("a@mail.ru")).await.unwrap();
        let ad = AdRepository::create(&repo, new_ad(user.id)).await.unwrap();
        let comment = CommentRepository::create(
            &repo,
            NewComment::now(ad.id, user.id, "nice phone!".into()),
        )
        .await
        .unwrap();

        assert!(AdRepository::delete(&repo, ad.id).await.unwrap());
        assert!(CommentRepository::find(&repo, ad.id, comment.id)
            .await
            .unwrap()
            .is_none());
        assert!(CommentRepository::list_by_ad(&repo, ad.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn comments_are_listed_newest_first() {
        let repo = MemoryRepository::new();
        let user = UserRepository::create(&repo, new_user("a@mail.ru")).await.unwrap();
        let ad = AdRepository::create(&repo, new_ad(user.id)).await.unwrap();
        for (text, created_at) in [("first comment", 10), ("third comment", 30), ("second comment", 20)] {
            CommentRepository::create(
                &repo,
                NewComment {
                    ad_id: ad.id,
                    author_id: user.id,
                    text: text.into(),
                    created_at,
                },
            )
            .await
            .unwrap();
        }

        let texts: Vec<String> = CommentRepository::list_by_ad(&repo, ad.id)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.text)
            .collect();
        assert_eq!(texts, ["third comment", "second comment", "first comment"]);
    }

    #[tokio::test]
    async fn comment_lookup_requires_matching_ad() {
        let repo = MemoryRepository::new();
        let user = UserRepository::create(&repo, new_user("a@mail.ru")).await.unwrap();
        let first = AdRepository::create(&repo, new_ad(user.id)).await.unwrap();
        let second = AdRepository::create(&repo, new_ad(user.id)).await.unwrap();
        let comment = CommentRepository::create(
            &repo,
            NewComment::now(first.id, user.id, "nice phone!".into()),
        )
        .await
        .unwrap();

        assert!(CommentRepository::find(&repo, second.id, comment.id)
            .await
            .unwrap()
            .is_none());
        assert!(!CommentRepository::delete(&repo, second.id, comment.id)
            .await
            .unwrap());
    }
}
