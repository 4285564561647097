// src/utils/multipart.rs

use axum::{body::Bytes, extract::Multipart};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::{error::AppError, utils::validation::validate};

/// A file part of a multipart request.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Client-supplied file name, if any.
    pub file_name: Option<String>,
    pub bytes: Bytes,
}

/// Reads the `image` file part, ignoring any other parts.
pub async fn read_image(mut multipart: Multipart) -> Result<UploadedFile, AppError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some("image") {
            let file_name = field.file_name().map(str::to_owned);
            let bytes = field.bytes().await?;
            return Ok(UploadedFile { file_name, bytes });
        }
    }
    Err(AppError::BadRequest("Required part 'image' is not present".to_string()))
}

/// Reads a JSON `properties` part plus an `image` file part, validating the properties.
pub async fn read_properties_and_image<T>(
    mut multipart: Multipart,
) -> Result<(T, UploadedFile), AppError>
where
    T: DeserializeOwned + Validate,
{
    let mut properties: Option<T> = None;
    let mut image: Option<UploadedFile> = None;

    while let Some(field) = multipart.next_field().await? {
        match field.name() {
            Some("properties") => {
                let raw = field.bytes().await?;
                let parsed: T = serde_json::from_slice(&raw)?;
                validate(&parsed)?;
                properties = Some(parsed);
            }
            Some("image") => {
                let file_name = field.file_name().map(str::to_owned);
                let bytes = field.bytes().await?;
                image = Some(UploadedFile { file_name, bytes });
            }
            _ => {}
        }
    }

    let properties = properties.ok_or_else(|| {
        AppError::BadRequest("Required part 'properties' is not present".to_string())
    })?;
    let image = image
        .ok_or_else(|| AppError::BadRequest("Required part 'image' is not present".to_string()))?;
    Ok((properties, image))
}
