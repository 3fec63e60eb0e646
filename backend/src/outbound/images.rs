//! Filesystem-backed `ImageStore`.
//!
//! Accepts `data:image/<ext>;base64,<data>` payloads, writes the decoded bytes
//! to `recipes/<uuid>.<ext>` under the media root and returns the public URL
//! of the file. Removal maps such a URL back to its file; anything else is
//! left alone.

use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use cap_std::ambient_authority;
use cap_std::fs::Dir;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::ports::{ImageStore, ImageStoreError};

const RECIPE_IMAGE_DIR: &str = "recipes";
const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "gif", "webp"];

/// Decoded image awaiting storage.
#[derive(Debug, PartialEq, Eq)]
struct DecodedImage {
    extension: &'static str,
    bytes: Vec<u8>,
}

/// Split and decode a `data:` URI.
fn decode_payload(payload: &str) -> Result<DecodedImage, ImageStoreError> {
    let (header, data) = payload
        .trim()
        .split_once(',')
        .ok_or_else(|| ImageStoreError::invalid_payload("expected a data URI"))?;
    let mime = header
        .strip_prefix("data:image/")
        .and_then(|rest| rest.strip_suffix(";base64"))
        .ok_or_else(|| {
            ImageStoreError::invalid_payload("expected a base64 data:image/<type> URI")
        })?;
    let extension = match mime.to_ascii_lowercase().as_str() {
        "jpeg" | "jpg" => "jpg",
        other => ALLOWED_EXTENSIONS
            .iter()
            .copied()
            .find(|allowed| *allowed == other)
            .ok_or_else(|| {
                ImageStoreError::invalid_payload(format!("unsupported image type: {other}"))
            })?,
    };
    let bytes = STANDARD
        .decode(data.trim())
        .map_err(|err| ImageStoreError::invalid_payload(format!("invalid base64: {err}")))?;
    if bytes.is_empty() {
        return Err(ImageStoreError::invalid_payload("image data is empty"));
    }
    Ok(DecodedImage { extension, bytes })
}

/// Writes recipe images below a media root directory.
#[derive(Debug, Clone)]
pub struct FsImageStore {
    media_root: PathBuf,
    media_url: String,
}

impl FsImageStore {
    /// `media_url` is the public prefix the media root is served under.
    pub fn new(media_root: impl Into<PathBuf>, media_url: impl Into<String>) -> Self {
        let media_url: String = media_url.into();
        Self {
            media_root: media_root.into(),
            media_url: media_url.trim_end_matches('/').to_owned(),
        }
    }

    fn write(media_root: &Path, file_name: &str, bytes: &[u8]) -> Result<(), ImageStoreError> {
        let storage = |err: std::io::Error| ImageStoreError::storage(err.to_string());
        let target = media_root.join(RECIPE_IMAGE_DIR);
        Dir::create_ambient_dir_all(&target, ambient_authority()).map_err(storage)?;
        let dir = Dir::open_ambient_dir(&target, ambient_authority()).map_err(storage)?;
        let mut file = dir.create(file_name).map_err(storage)?;
        file.write_all(bytes).map_err(storage)?;
        file.sync_all().map_err(storage)
    }

    /// File name behind a URL this store issued, if it is one.
    fn file_name_of<'a>(&self, reference: &'a str) -> Option<&'a str> {
        let name = reference
            .strip_prefix(self.media_url.as_str())?
            .strip_prefix('/')?
            .strip_prefix(RECIPE_IMAGE_DIR)?
            .strip_prefix('/')?;
        let plain = !name.is_empty() && !name.starts_with('.') && !name.contains(['/', '\\']);
        plain.then_some(name)
    }

    fn delete(media_root: &Path, file_name: &str) -> Result<(), ImageStoreError> {
        let target = media_root.join(RECIPE_IMAGE_DIR);
        let removed = Dir::open_ambient_dir(&target, ambient_authority())
            .and_then(|dir| dir.remove_file(file_name));
        match removed {
            Err(err) if err.kind() != ErrorKind::NotFound => {
                Err(ImageStoreError::storage(err.to_string()))
            }
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl ImageStore for FsImageStore {
    async fn store(&self, payload: String) -> Result<String, ImageStoreError> {
        let image = decode_payload(&payload)?;
        let file_name = format!("{}.{}", Uuid::new_v4(), image.extension);
        let media_root = self.media_root.clone();
        let name = file_name.clone();
        tokio::task::spawn_blocking(move || Self::write(&media_root, &name, &image.bytes))
            .await
            .map_err(|err| ImageStoreError::storage(err.to_string()))??;
        debug!(file = %file_name, "stored recipe image");
        Ok(format!("{}/{RECIPE_IMAGE_DIR}/{file_name}", self.media_url))
    }

    async fn remove(&self, reference: String) -> Result<(), ImageStoreError> {
        let Some(file_name) = self.file_name_of(&reference).map(str::to_owned) else {
            debug!(%reference, "image reference is not ours; skipping removal");
            return Ok(());
        };
        let media_root = self.media_root.clone();
        let name = file_name.clone();
        let result = tokio::task::spawn_blocking(move || Self::delete(&media_root, &name))
            .await
            .map_err(|err| ImageStoreError::storage(err.to_string()))
            .and_then(std::convert::identity);
        match &result {
            Ok(()) => debug!(file = %file_name, "removed recipe image"),
            Err(error) => warn!(file = %file_name, %error, "recipe image left behind"),
        }
        result
    }
}
