//! Floor segmentation for flooring visualization.
//!
//! Turns a room photo plus optional hint points into a validated binary
//! floor mask, and the mask into a clip polygon for texturing.

pub mod config;
pub mod error;
pub mod geometry;
pub mod output;
pub mod pipeline;
pub mod segmentation;
pub mod source;

pub use config::VisionConfig;
pub use error::VisionError;
pub use pipeline::{hide_objects, AnalysisReport, Analyzer};
pub use segmentation::{FloorSegmenter, Mask, Point, RoomObject, SeedHints, VisionResult};
