//! Filesystem-backed image store.
//!
//! Files live flat in one directory and are addressed by their public URL path,
//! `/images/<uuid>_<original name>`, which is what the database stores.

use std::{io::ErrorKind, path::PathBuf};

use tokio::fs;
use uuid::Uuid;

use crate::error::AppError;

/// URL prefix under which the image directory is served.
pub const IMAGE_URL_PREFIX: &str = "/images/";

const FALLBACK_FILE_NAME: &str = "image";

/// Stored URLs go into `VARCHAR(255)` columns.
const MAX_URL_LEN: usize = 255;

/// Room left for the client's name after the prefix, a hyphenated UUID and `_`.
const MAX_NAME_LEN: usize = MAX_URL_LEN - IMAGE_URL_PREFIX.len() - 36 - 1;

#[derive(Debug, Clone)]
pub struct ImageStore {
    root: PathBuf,
}

impl ImageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Writes the bytes under a fresh unique name and returns its URL path.
    pub async fn save(&self, original_name: Option<&str>, bytes: &[u8]) -> Result<String, AppError> {
        fs::create_dir_all(&self.root).await?;

        let file_name = format!(
            "{}_{}",
            Uuid::new_v4(),
            sanitize_file_name(original_name.unwrap_or_default())
        );
        fs::write(self.root.join(&file_name), bytes).await?;

        tracing::debug!(file = %file_name, size = bytes.len(), "image saved");
        Ok(format!("{IMAGE_URL_PREFIX}{file_name}"))
    }

    pub async fn get(&self, url: &str) -> Result<Vec<u8>, AppError> {
        let path = self.resolve(url)?;
        fs::read(&path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => AppError::NotFound("Image not found".to_string()),
            _ => AppError::from(e),
        })
    }

    /// Removes the file. A file that is already gone is not an error.
    pub async fn delete(&self, url: &str) -> Result<(), AppError> {
        let path = self.resolve(url)?;
        match fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "image deleted");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Maps a URL path to a file inside the root. Never escapes the root.
    fn resolve(&self, url: &str) -> Result<PathBuf, AppError> {
        let name = url
            .strip_prefix(IMAGE_URL_PREFIX)
            .filter(|name| is_plain_file_name(name))
            .ok_or_else(|| AppError::BadRequest(format!("Invalid image path '{url}'")))?;
        Ok(self.root.join(name))
    }
}

fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\'])
}

/// Keeps only the last path component of a client-supplied name, cut to
/// [`MAX_NAME_LEN`] bytes on a char boundary.
fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default().trim();
    let base = truncate_on_char_boundary(base, MAX_NAME_LEN);
    if is_plain_file_name(base) {
        base.to_string()
    } else {
        FALLBACK_FILE_NAME.to_string()
    }
}

fn truncate_on_char_boundary(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
