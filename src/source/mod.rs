mod assets;
mod file;

pub use assets::{DirectoryAssets, MemoryAssets};
pub use file::{FileImage, MemoryImage};

use crate::error::Result;
use image::{DynamicImage, RgbaImage};

/// Trait for room photo sources
pub trait ImageSource {
    /// Decode the full-resolution photo
    fn load(&self) -> Result<DynamicImage>;

    /// Human-readable origin, used in logs
    fn describe(&self) -> String;
}

/// Resolves a [`RoomObject`](crate::segmentation::RoomObject) asset
/// reference to its cutout stencil.
pub trait AssetLoader {
    fn load_asset(&self, reference: &str) -> Result<RgbaImage>;
}
