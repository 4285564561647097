use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Represents the 'ads' table in the database.
#[derive(Debug, Clone, FromRow)]
pub struct Ad {
    pub id: i32,
    /// Owning user, fixed at creation.
    pub author_id: i32,
    pub title: String,
    pub description: String,
    pub price: i32,
    pub image: String,
}

/// An ad joined with its author's contact fields.
#[derive(Debug, Clone, FromRow)]
pub struct AdDetails {
    pub id: i32,
    pub author_id: i32,
    pub author_username: String,
    pub author_first_name: String,
    pub author_last_name: String,
    pub author_phone: String,
    pub title: String,
    pub description: String,
    pub price: i32,
    pub image: String,
}

#[derive(Debug, Clone)]
pub struct NewAd {
    pub author_id: i32,
    pub title: String,
    pub description: String,
    pub price: i32,
    pub image: String,
}

/// `properties` part of the create-ad multipart request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateAdRequest {
    #[validate(length(min = 4, max = 32, message = "Title length must be between 4 and 32 characters"))]
    pub title: String,

    #[validate(length(min = 8, max = 64, message = "Description length must be between 8 and 64 characters"))]
    pub description: String,

    #[validate(range(min = 0, max = 10_000_000, message = "Price must be between 0 and 10000000"))]
    pub price: i32,
}

/// DTO for editing an ad. Absent fields keep their current value; these are
/// the only mutable fields of an ad.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateAdRequest {
    #[validate(length(min = 4, max = 32, message = "Title length must be between 4 and 32 characters"))]
    pub title: Option<String>,

    #[validate(length(min = 8, max = 64, message = "Description length must be between 8 and 64 characters"))]
    pub description: Option<String>,

    #[validate(range(min = 0, max = 10_000_000, message = "Price must be between 0 and 10000000"))]
    pub price: Option<i32>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AdResponse {
    /// Author's user id.
    pub author: i32,
    pub image: String,
    pub pk: i32,
    pub price: i32,
    pub title: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AdsResponse {
    pub count: usize,
    pub results: Vec<AdResponse>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExtendedAdResponse {
    pub pk: i32,
    pub author_first_name: String,
    pub author_last_name: String,
    pub description: String,
    /// Author's login.
    pub email: String,
    pub image: String,
    pub phone: String,
    pub price: i32,
    pub title: String,
}

impl From<Ad> for AdResponse {
    fn from(ad: Ad) -> Self {
        Self {
            author: ad.author_id,
            image: ad.image,
            pk: ad.id,
            price: ad.price,
            title: ad.title,
        }
    }
}

impl From<Vec<Ad>> for AdsResponse {
    fn from(ads: Vec<Ad>) -> Self {
        let results: Vec<AdResponse> = ads.into_iter().map(AdResponse::from).collect();
        Self {
            count: results.len(),
            results,
        }
    }
}

impl From<AdDetails> for ExtendedAdResponse {
    fn from(ad: AdDetails) -> Self {
        Self {
            pk: ad.id,
            author_first_name: ad.author_first_name,
            author_last_name: ad.author_last_name,
            description: ad.description,
            email: ad.author_username,
            image: ad.image,
            phone: ad.author_phone,
            price: ad.price,
            title: ad.title,
        }
    }
}
