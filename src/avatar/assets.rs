//! Avatar image lookup

use std::path::{Path, PathBuf};

use crate::config::AvatarsConfig;
use crate::error::SceneError;

/// Resolves per-avatar image files (`avatar_1.png`, `avatar_2.png`, ...)
#[derive(Debug, Clone)]
pub struct AvatarAssets {
    /// Base directory for avatar images
    base_dir: PathBuf,
}

impl AvatarAssets {
    /// Create an asset resolver from configuration
    pub fn new(config: &AvatarsConfig) -> Self {
        let base_dir = if config.assets_dir.is_absolute() {
            config.assets_dir.clone()
        } else {
            std::env::current_dir()
                .unwrap_or_default()
                .join(&config.assets_dir)
        };

        Self { base_dir }
    }

    /// File name of the image for a zero-based avatar index
    pub fn file_name(index: usize) -> String {
        format!("avatar_{}.png", index + 1)
    }

    /// URL the page loads the image from
    pub fn url(index: usize) -> String {
        format!("/avatars/{}", index)
    }

    /// Get the base directory
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Where the image for an avatar lives, whether or not it exists
    pub fn path(&self, index: usize) -> PathBuf {
        self.base_dir.join(Self::file_name(index))
    }

    /// Path of an avatar image, if it exists on disk
    pub async fn get_path(&self, index: usize) -> Option<PathBuf> {
        let path = self.path(index);
        match tokio::fs::try_exists(&path).await {
            Ok(true) => Some(path),
            _ => None,
        }
    }

    /// Log which of the first `count` avatar images are missing
    pub async fn scan(&self, count: usize) -> usize {
        if !matches!(tokio::fs::try_exists(&self.base_dir).await, Ok(true)) {
            tracing::warn!(
                "Avatar assets directory does not exist: {}",
                self.base_dir.display()
            );
            return 0;
        }

        let mut found = 0;
        for index in 0..count {
            match self.get_path(index).await {
                Some(path) => {
                    tracing::debug!("Found avatar image: {}", path.display());
                    found += 1;
                }
                None => tracing::warn!(
                    "Avatar image not found: {}",
                    self.path(index).display()
                ),
            }
        }
        found
    }

    /// Read an avatar image
    pub async fn get_data(&self, index: usize) -> Result<Vec<u8>, SceneError> {
        let path = self
            .get_path(index)
            .await
            .ok_or_else(|| SceneError::AssetNotFound(Self::file_name(index)))?;

        tokio::fs::read(&path)
            .await
            .map_err(|e| SceneError::ImageLoad(format!("{}: {}", path.display(), e)))
    }

    /// Get the MIME type for an image based on extension
    pub fn mime_type(path: &Path) -> &'static str {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();

        match extension.to_lowercase().as_str() {
            "png" => "image/png",
            "jpg" | "jpeg" => "image/jpeg",
            "gif" => "image/gif",
            "webp" => "image/webp",
            "svg" => "image/svg+xml",
            _ => "application/octet-stream",
        }
    }
}
