pub mod classifier;
pub mod color;
mod components;
mod foreground;
mod occlusion;
mod preprocess;
mod region_grow;
mod segmenter;
pub mod types;

pub use classifier::{classify, retain_components, Classification, Frame, Rejection};
pub use color::{to_perceptual, ColorDistance, ColorSample};
pub use components::label_components;
pub use foreground::{DetectedObject, ForegroundExtractor, DETECTED_LABEL};
pub use occlusion::{LoadedObject, OcclusionCompositor};
pub use preprocess::{mask_to_overlay, Preprocessor, OVERLAY_COLOR};
pub use region_grow::RegionGrower;
pub use segmenter::{load_cutouts, FloorSegmenter};
pub use types::{
    Component, Mask, PixelBuffer, Point, RoomObject, SeedHints, VisionMetrics, VisionResult,
};
