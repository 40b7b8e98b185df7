use super::color::{ColorDistance, ColorSample};
use super::types::{PixelBuffer, RoomObject};
use crate::config::ForegroundConfig;
use image::{Rgba, RgbaImage};

/// Label given to every blob the extractor finds
pub const DETECTED_LABEL: &str = "Detected Item";

/// A detected foreground blob and the cutout carved from the photo.
#[derive(Debug, Clone)]
pub struct DetectedObject {
    pub object: RoomObject,
    pub cutout: RgbaImage,
}

/// Coarse single-blob detector.
///
/// Samples the assumed floor color at the bottom centre of the frame and
/// flags every pixel of the central band that contrasts strongly with it.
/// At most one object is produced per call.
#[derive(Debug, Clone)]
pub struct ForegroundExtractor {
    metric: ColorDistance,
    threshold: f32,
    min_area_fraction: f32,
}

impl ForegroundExtractor {
    pub fn new(config: &ForegroundConfig) -> Self {
        Self {
            metric: ColorDistance::new(config.luma_weight, config.chroma_weight),
            threshold: config.threshold,
            min_area_fraction: config.min_area_fraction,
        }
    }

    pub fn extract(&self, buffer: &PixelBuffer) -> Option<DetectedObject> {
        let _span = tracing::debug_span!("foreground_extract").entered();

        let (width, height) = buffer.dimensions();
        if width == 0 || height == 0 {
            return None;
        }

        let floor_x = (width as f32 * 0.5).floor() as u32;
        let floor_y = ((height as f32 * 0.9).floor() as u32).min(height - 1);
        let floor = ColorSample::from(buffer.get_pixel(floor_x, floor_y));

        let x_range = (width as f32 * 0.2).floor() as u32..(width as f32 * 0.8).floor() as u32;
        let y_range = (height as f32 * 0.3).floor() as u32..(height as f32 * 0.8).floor() as u32;

        let mut flagged = vec![false; width as usize * height as usize];
        let mut count = 0usize;
        let (mut min_x, mut max_x) = (width, 0);
        let (mut min_y, mut max_y) = (height, 0);

        for y in y_range {
            for x in x_range.clone() {
                let sample = ColorSample::from(buffer.get_pixel(x, y));
                if self.metric.distance(&floor, &sample) > self.threshold {
                    flagged[y as usize * width as usize + x as usize] = true;
                    count += 1;
                    min_x = min_x.min(x);
                    max_x = max_x.max(x);
                    min_y = min_y.min(y);
                    max_y = max_y.max(y);
                }
            }
        }

        let total = width as usize * height as usize;
        if count as f32 <= total as f32 * self.min_area_fraction {
            tracing::debug!("No foreground blob ({} contrasting pixels)", count);
            return None;
        }

        let obj_w = max_x - min_x + 1;
        let obj_h = max_y - min_y + 1;
        let cutout = RgbaImage::from_fn(obj_w, obj_h, |x, y| {
            let (sx, sy) = (min_x + x, min_y + y);
            if flagged[sy as usize * width as usize + sx as usize] {
                let p = buffer.get_pixel(sx, sy);
                Rgba([p[0], p[1], p[2], 255])
            } else {
                Rgba([0, 0, 0, 0])
            }
        });

        tracing::info!(
            "Detected foreground blob {}x{} at ({}, {}) with {} pixels",
            obj_w,
            obj_h,
            min_x,
            min_y,
            count
        );

        let object = RoomObject {
            id: format!("obj_{min_x}_{min_y}"),
            label: DETECTED_LABEL.to_string(),
            asset: format!("detected/{min_x}_{min_y}_{obj_w}x{obj_h}"),
            x: min_x as f32 / width as f32,
            y: min_y as f32 / height as f32,
            width: obj_w as f32 / width as f32,
            height: obj_h as f32 / height as f32,
            z_index: 10,
            is_visible: true,
        };

        Some(DetectedObject { object, cutout })
    }
}
