use image::RgbaImage;
use serde::{Deserialize, Serialize};

/// Downscaled RGBA copy of the room photo for one processing pass.
pub type PixelBuffer = RgbaImage;

/// Normalized point, both axes in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Absolute pixel for this point: truncate, then clamp into the buffer.
    ///
    /// Callers must ensure `width` and `height` are non-zero.
    pub fn to_pixel(self, width: u32, height: u32) -> (u32, u32) {
        let x = (self.x * width as f32).floor();
        let y = (self.y * height as f32).floor();
        let x = x.clamp(0.0, (width - 1) as f32) as u32;
        let y = y.clamp(0.0, (height - 1) as f32) as u32;
        (x, y)
    }
}

/// User hint points anchoring region growth.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeedHints {
    pub positive: Vec<Point>,
    pub negative: Vec<Point>,
}

impl SeedHints {
    pub fn new(positive: Vec<Point>, negative: Vec<Point>) -> Self {
        Self { positive, negative }
    }
}

/// Occlusion region supplied by the job layer.
///
/// `asset` is an opaque reference resolved through an
/// [`AssetLoader`](crate::source::AssetLoader); the engine never owns the
/// cutout pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomObject {
    pub id: String,
    pub label: String,
    pub asset: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    #[serde(default)]
    pub z_index: i32,
    /// `true`: sits on top of the floor. `false`: virtually removed.
    pub is_visible: bool,
}

/// Binary floor classification at processing resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Mask {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize],
        }
    }

    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        if data.len() != width as usize * height as usize {
            return None;
        }
        Some(Self {
            width,
            height,
            data,
        })
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    #[inline]
    pub fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    #[inline]
    pub fn get(&self, x: u32, y: u32) -> bool {
        self.data[self.index(x, y)] == 1
    }

    #[inline]
    pub fn is_set(&self, idx: usize) -> bool {
        self.data[idx] == 1
    }

    #[inline]
    pub fn set(&mut self, idx: usize, value: bool) {
        self.data[idx] = value as u8;
    }

    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    pub fn count(&self) -> usize {
        self.data.iter().filter(|&&v| v == 1).count()
    }

    /// `true` when every pixel set here is also set in `other`.
    pub fn is_subset_of(&self, other: &Mask) -> bool {
        self.dimensions() == other.dimensions()
            && self
                .data
                .iter()
                .zip(&other.data)
                .all(|(&a, &b)| a == 0 || b == 1)
    }
}

/// Maximal 4-connected run of floor pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    pub id: u32,
    pub pixels: Vec<usize>,
    pub area: usize,
    pub min_row: u32,
    pub max_row: u32,
}

impl Component {
    pub fn bbox_height(&self) -> u32 {
        self.max_row - self.min_row
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct VisionMetrics {
    pub coverage_fraction: f32,
    pub touches_bottom: bool,
    pub component_count: usize,
    pub largest_component_height_fraction: f32,
}

/// Sole output of a segmentation call.
#[derive(Debug, Clone, PartialEq)]
pub struct VisionResult {
    pub mask: Mask,
    pub width: u32,
    pub height: u32,
    pub is_valid: bool,
    pub message: Option<String>,
    pub metrics: VisionMetrics,
    pub hard_to_define_floor: bool,
}
