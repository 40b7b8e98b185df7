use super::types::{Mask, PixelBuffer};
use crate::error::{Result, VisionError};
use image::{imageops, DynamicImage, Rgba, RgbaImage};

/// Overlay color painted over floor pixels
pub const OVERLAY_COLOR: Rgba<u8> = Rgba([30, 144, 255, 160]);

/// Downscales source photos to the fixed processing width
pub struct Preprocessor {
    target_width: u32,
}

impl Preprocessor {
    pub fn new(target_width: u32) -> Self {
        Self { target_width }
    }

    /// Processing height for a source of the given size, preserving aspect ratio
    pub fn target_height(&self, source_width: u32, source_height: u32) -> u32 {
        let ratio = source_height as f64 / source_width as f64;
        (self.target_width as f64 * ratio).round() as u32
    }

    /// Build the RGBA pixel buffer one segmentation pass works on.
    pub fn prepare(&self, image: &DynamicImage) -> Result<PixelBuffer> {
        let _span = tracing::debug_span!("preprocess").entered();

        let (width, height) = (image.width(), image.height());
        if width == 0 || height == 0 {
            return Err(VisionError::EmptyImage);
        }

        let target_height = self.target_height(width, height);
        if target_height == 0 {
            return Err(VisionError::EmptyImage);
        }

        let rgba = image.to_rgba8();
        let buffer = if rgba.dimensions() != (self.target_width, target_height) {
            imageops::resize(
                &rgba,
                self.target_width,
                target_height,
                imageops::FilterType::Triangle,
            )
        } else {
            rgba
        };

        tracing::debug!(
            "Prepared {}x{} buffer from {}x{} source",
            self.target_width,
            target_height,
            width,
            height
        );
        Ok(buffer)
    }
}

/// Render a mask as a translucent blue layer, transparent off the floor.
pub fn mask_to_overlay(mask: &Mask) -> RgbaImage {
    let (width, height) = mask.dimensions();
    RgbaImage::from_fn(width, height, |x, y| {
        if mask.get(x, y) {
            OVERLAY_COLOR
        } else {
            Rgba([0, 0, 0, 0])
        }
    })
}
