use super::ImageSource;
use crate::error::{Result, VisionError};
use image::DynamicImage;
use std::path::{Path, PathBuf};

/// Photo decoded from disk on demand.
pub struct FileImage {
    path: PathBuf,
}

impl FileImage {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl ImageSource for FileImage {
    fn load(&self) -> Result<DynamicImage> {
        tracing::info!("Loading photo from {}", self.path.display());

        let image = image::open(&self.path).map_err(|source| VisionError::ImageLoad {
            path: self.path.clone(),
            source,
        })?;

        tracing::debug!("Decoded {}x{} photo", image.width(), image.height());
        Ok(image)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Photo that is already decoded.
pub struct MemoryImage {
    image: DynamicImage,
}

impl MemoryImage {
    pub fn new(image: DynamicImage) -> Self {
        Self { image }
    }
}

impl ImageSource for MemoryImage {
    fn load(&self) -> Result<DynamicImage> {
        Ok(self.image.clone())
    }

    fn describe(&self) -> String {
        format!("in-memory {}x{}", self.image.width(), self.image.height())
    }
}
