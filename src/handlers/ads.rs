// src/handlers/ads.rs

use axum::{
    Json,
    extract::{Multipart, State},
    http::{StatusCode, header},
    response::IntoResponse,
};

use crate::{
    error::{AppError, ErrorBody},
    models::ad::{AdResponse, AdsResponse, CreateAdRequest, ExtendedAdResponse, UpdateAdRequest},
    openapi::{CreateAdForm, ImageForm},
    services::{access::authorize, ads::AdService},
    utils::{
        basic_auth::AuthUser,
        multipart::{read_image, read_properties_and_image},
        path::Path,
        validation::ValidJson,
    },
};

/// Public listing of every ad.
#[utoipa::path(
    get,
    path = "/ads",
    tag = "Ads",
    responses((status = 200, description = "All ads", body = AdsResponse))
)]
pub async fn list_ads(State(ads): State<AdService>) -> Result<Json<AdsResponse>, AppError> {
    Ok(Json(ads.list().await?))
}

#[utoipa::path(
    get,
    path = "/ads/me",
    tag = "Ads",
    security(("basicAuth" = [])),
    responses(
        (status = 200, description = "Ads of the caller", body = AdsResponse),
        (status = 401, description = "Not authenticated", body = ErrorBody)
    )
)]
pub async fn my_ads(
    State(ads): State<AdService>,
    user: AuthUser,
) -> Result<Json<AdsResponse>, AppError> {
    Ok(Json(ads.my_ads(&user.username).await?))
}

#[utoipa::path(
    get,
    path = "/ads/{id}",
    tag = "Ads",
    security(("basicAuth" = [])),
    params(("id" = i32, Path, description = "Ad id")),
    responses(
        (status = 200, description = "Ad with its author's contacts", body = ExtendedAdResponse),
        (status = 401, description = "Not authenticated", body = ErrorBody),
        (status = 404, description = "No such ad", body = ErrorBody)
    )
)]
pub async fn get_ad(
    State(ads): State<AdService>,
    _user: AuthUser,
    Path(id): Path<i32>,
) -> Result<Json<ExtendedAdResponse>, AppError> {
    Ok(Json(ads.get(id).await?))
}

/// Multipart: a JSON `properties` part and an `image` file part.
#[utoipa::path(
    post,
    path = "/ads",
    tag = "Ads",
    security(("basicAuth" = [])),
    request_body(content = CreateAdForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Ad created", body = AdResponse),
        (status = 400, description = "Invalid properties or missing part", body = ErrorBody),
        (status = 401, description = "Not authenticated", body = ErrorBody)
    )
)]
pub async fn create_ad(
    State(ads): State<AdService>,
    user: AuthUser,
    multipart: Multipart,
) -> Result<(StatusCode, Json<AdResponse>), AppError> {
    let (properties, image) = read_properties_and_image::<CreateAdRequest>(multipart).await?;
    let ad = ads.create(&user.username, properties, image).await?;
    Ok((StatusCode::CREATED, Json(ad)))
}

/// Fields missing from the body keep their current value.
#[utoipa::path(
    patch,
    path = "/ads/{id}",
    tag = "Ads",
    security(("basicAuth" = [])),
    params(("id" = i32, Path, description = "Ad id")),
    request_body = UpdateAdRequest,
    responses(
        (status = 200, description = "Ad updated", body = AdResponse),
        (status = 400, description = "Invalid data", body = ErrorBody),
        (status = 403, description = "Not the author", body = ErrorBody),
        (status = 404, description = "No such ad", body = ErrorBody)
    )
)]
pub async fn update_ad(
    State(ads): State<AdService>,
    user: AuthUser,
    Path(id): Path<i32>,
    ValidJson(payload): ValidJson<UpdateAdRequest>,
) -> Result<Json<AdResponse>, AppError> {
    authorize(&user, ads.is_owner(&user.username, id)).await?;
    Ok(Json(ads.update(id, payload).await?))
}

#[utoipa::path(
    delete,
    path = "/ads/{id}",
    tag = "Ads",
    security(("basicAuth" = [])),
    params(("id" = i32, Path, description = "Ad id")),
    responses(
        (status = 204, description = "Ad, its comments and its image removed"),
        (status = 403, description = "Not the author", body = ErrorBody),
        (status = 404, description = "No such ad", body = ErrorBody)
    )
)]
pub async fn delete_ad(
    State(ads): State<AdService>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    authorize(&user, ads.is_owner(&user.username, id)).await?;
    ads.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Replaces the image and answers with the new file's raw bytes.
#[utoipa::path(
    patch,
    path = "/ads/{id}/image",
    tag = "Ads",
    security(("basicAuth" = [])),
    params(("id" = i32, Path, description = "Ad id")),
    request_body(content = ImageForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Raw bytes of the new image, as application/octet-stream"),
        (status = 403, description = "Not the author", body = ErrorBody),
        (status = 404, description = "No such ad", body = ErrorBody)
    )
)]
pub async fn update_ad_image(
    State(ads): State<AdService>,
    user: AuthUser,
    Path(id): Path<i32>,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    authorize(&user, ads.is_owner(&user.username, id)).await?;
    let image = read_image(multipart).await?;
    let bytes = ads.update_image(id, image).await?;
    Ok(([(header::CONTENT_TYPE, "application/octet-stream")], bytes))
}
