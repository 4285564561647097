use std::sync::Arc;

use crate::{
    error::AppError,
    models::{
        ad::{
            Ad, AdResponse, AdsResponse, CreateAdRequest, ExtendedAdResponse, NewAd, UpdateAdRequest,
        },
        user::User,
    },
    repository::{AdRepository, UserRepository},
    services::images::ImageStore,
    utils::multipart::UploadedFile,
};

/// Ad lifecycle. Keeps each ad's image file in step with its row.
#[derive(Clone)]
pub struct AdService {
    ads: Arc<dyn AdRepository>,
    users: Arc<dyn UserRepository>,
    images: ImageStore,
}

fn ad_not_found() -> AppError {
    AppError::NotFound("Ad not found".to_string())
}

impl AdService {
    pub fn new(ads: Arc<dyn AdRepository>, users: Arc<dyn UserRepository>, images: ImageStore) -> Self {
        Self { ads, users, images }
    }

    async fn require_user(&self, username: &str) -> Result<User, AppError> {
        self.users
            .find_by_username(username)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    async fn require_ad(&self, id: i32) -> Result<Ad, AppError> {
        self.ads.find_by_id(id).await?.ok_or_else(ad_not_found)
    }

    pub async fn list(&self) -> Result<AdsResponse, AppError> {
        Ok(self.ads.list().await?.into())
    }

    pub async fn my_ads(&self, username: &str) -> Result<AdsResponse, AppError> {
        let user = self.require_user(username).await?;
        Ok(self.ads.list_by_author(user.id).await?.into())
    }

    pub async fn get(&self, id: i32) -> Result<ExtendedAdResponse, AppError> {
        let details = self.ads.find_details(id).await?.ok_or_else(ad_not_found)?;
        Ok(details.into())
    }

    pub async fn create(
        &self,
        username: &str,
        request: CreateAdRequest,
        image: UploadedFile,
    ) -> Result<AdResponse, AppError> {
        let author = self.require_user(username).await?;
        let image = self
            .images
            .save(image.file_name.as_deref(), &image.bytes)
            .await?;

        let ad = self
            .ads
            .create(NewAd {
                author_id: author.id,
                title: request.title,
                description: request.description,
                price: request.price,
                image,
            })
            .await?;

        tracing::info!(ad_id = ad.id, %username, "ad created");
        Ok(ad.into())
    }

    /// Title, description and price only, each when present; author and image
    /// stay as they are.
    pub async fn update(&self, id: i32, changes: UpdateAdRequest) -> Result<AdResponse, AppError> {
        let ad = self
            .ads
            .update_fields(id, &changes)
            .await?
            .ok_or_else(ad_not_found)?;
        Ok(ad.into())
    }

    /// Removes the row, then the image file. The row stays deleted if the file
    /// removal fails.
    pub async fn delete(&self, id: i32) -> Result<(), AppError> {
        let ad = self.require_ad(id).await?;
        if !self.ads.delete(id).await? {
            return Err(ad_not_found());
        }
        tracing::info!(ad_id = id, "ad deleted");

        self.images.delete(&ad.image).await
    }

    /// Swaps in a new image file and returns its bytes.
    pub async fn update_image(&self, id: i32, image: UploadedFile) -> Result<Vec<u8>, AppError> {
        let ad = self.require_ad(id).await?;
        let path = self
            .images
            .save(image.file_name.as_deref(), &image.bytes)
            .await?;

        if self.ads.update_image(id, &path).await?.is_none() {
            // deleted concurrently
            self.images.delete(&path).await?;
            return Err(ad_not_found());
        }

        self.images.delete(&ad.image).await?;
        self.images.get(&path).await
    }

    /// `true` when the ad is missing or authored by `username`.
    pub async fn is_owner(&self, username: &str, id: i32) -> Result<bool, AppError> {
        Ok(self
            .ads
            .find_details(id)
            .await?
            .is_none_or(|ad| ad.author_username == username))
    }
}
