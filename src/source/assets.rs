use super::AssetLoader;
use crate::error::{Result, VisionError};
use image::RgbaImage;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Cutouts stored as image files under a root directory.
pub struct DirectoryAssets {
    root: PathBuf,
}

impl DirectoryAssets {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }
}

impl AssetLoader for DirectoryAssets {
    fn load_asset(&self, reference: &str) -> Result<RgbaImage> {
        let path = self.root.join(reference);
        if !path.is_file() {
            return Err(VisionError::AssetNotFound(reference.to_string()));
        }

        let image = image::open(&path).map_err(|source| VisionError::AssetLoad {
            reference: reference.to_string(),
            source,
        })?;
        Ok(image.to_rgba8())
    }
}

/// In-memory blob store keyed by opaque asset id.
#[derive(Debug, Clone, Default)]
pub struct MemoryAssets {
    assets: HashMap<String, RgbaImage>,
}

impl MemoryAssets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn save(&mut self, reference: impl Into<String>, image: RgbaImage) {
        self.assets.insert(reference.into(), image);
    }

    pub fn get(&self, reference: &str) -> Option<&RgbaImage> {
        self.assets.get(reference)
    }

    pub fn delete(&mut self, reference: &str) -> Option<RgbaImage> {
        self.assets.remove(reference)
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

impl AssetLoader for MemoryAssets {
    fn load_asset(&self, reference: &str) -> Result<RgbaImage> {
        self.get(reference)
            .cloned()
            .ok_or_else(|| VisionError::AssetNotFound(reference.to_string()))
    }
}
