//! Property media upload handling
//!
//! Multipart fields are buffered and written to the upload directory under
//! generated filenames. Validation is by file extension only; the stored
//! path is the public URL under the static `/uploads` prefix.

use anyhow::Result;
use std::path::Path;
use uuid::Uuid;

use crate::models::property::{PropertyMedia, PropertyVideo};

/// Maximum number of images per listing
pub const MAX_IMAGES: usize = 10;
/// Request body cap for listing uploads (100 MB)
pub const MAX_UPLOAD_BYTES: usize = 100 * 1024 * 1024;

const IMAGE_EXTENSIONS: &[&str] = &["jpeg", "jpg", "png", "gif", "webp"];
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "webm", "avi", "mkv"];

/// Lowercased extension of a filename, if any
pub fn extension_of(filename: &str) -> Option<String> {
    let ext = filename.rsplit('.').next()?;
    if ext == filename {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Whether the filename carries an allowed image extension
pub fn is_allowed_image(filename: &str) -> bool {
    extension_of(filename)
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

/// Whether the filename carries an allowed video extension
pub fn is_allowed_video(filename: &str) -> bool {
    extension_of(filename)
        .map(|ext| VIDEO_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

fn generated_filename(original_name: &str) -> String {
    match extension_of(original_name) {
        Some(ext) => format!("{}.{}", Uuid::new_v4(), ext),
        None => Uuid::new_v4().to_string(),
    }
}

/// Write an uploaded image to `dir`, returning its stored reference
pub async fn save_image(dir: &Path, original_name: &str, bytes: &[u8]) -> Result<PropertyMedia> {
    let filename = generated_filename(original_name);
    tokio::fs::write(dir.join(&filename), bytes).await?;

    Ok(PropertyMedia {
        path: format!("/uploads/{}", filename),
        filename,
    })
}

/// Write an uploaded video to `dir`, returning its stored reference
pub async fn save_video(
    dir: &Path,
    original_name: &str,
    mime_type: &str,
    bytes: &[u8],
) -> Result<PropertyVideo> {
    let filename = generated_filename(original_name);
    tokio::fs::write(dir.join(&filename), bytes).await?;

    Ok(PropertyVideo {
        path: format!("/uploads/{}", filename),
        filename,
        original_name: original_name.to_string(),
        size: bytes.len() as u64,
        mime_type: mime_type.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_extensions_are_checked_case_insensitively() {
        assert!(is_allowed_image("house.jpg"));
        assert!(is_allowed_image("house.WEBP"));
        assert!(!is_allowed_image("house.mp4"));
        assert!(!is_allowed_image("house"));
        assert!(!is_allowed_image("house.exe"));
    }

    #[test]
    fn video_extensions_are_checked() {
        assert!(is_allowed_video("tour.mp4"));
        assert!(is_allowed_video("tour.MOV"));
        assert!(!is_allowed_video("tour.jpg"));
    }

    #[tokio::test]
    async fn save_image_writes_file_and_public_path() {
        let dir = tempfile::tempdir().unwrap();
        let stored = save_image(dir.path(), "front.png", b"not-a-real-png")
            .await
            .unwrap();

        assert!(stored.filename.ends_with(".png"));
        assert_eq!(stored.path, format!("/uploads/{}", stored.filename));

        let on_disk = tokio::fs::read(dir.path().join(&stored.filename))
            .await
            .unwrap();
        assert_eq!(on_disk, b"not-a-real-png");
    }

    #[tokio::test]
    async fn save_video_records_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let stored = save_video(dir.path(), "tour.mp4", "video/mp4", b"0000")
            .await
            .unwrap();

        assert_eq!(stored.original_name, "tour.mp4");
        assert_eq!(stored.size, 4);
        assert_eq!(stored.mime_type, "video/mp4");
        assert!(stored.filename.ends_with(".mp4"));
    }
}
