//! Auto-analysis flow: find furniture, segment the floor, and optionally
//! retry with the furniture virtually removed when the scene is ambiguous.

use crate::error::Result;
use crate::geometry::floor_outline;
use crate::segmentation::{FloorSegmenter, Point, RoomObject, SeedHints, VisionResult};
use crate::source::{AssetLoader, MemoryAssets};
use image::{DynamicImage, RgbaImage};
use serde::Serialize;

/// Everything one analysis produced.
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub result: VisionResult,
    /// Objects the final mask was computed with
    pub objects: Vec<RoomObject>,
    /// Whether the final mask was computed with objects hidden
    pub virtual_staging: bool,
    /// Convex clip polygon for the texturing stage
    pub outline: Vec<Point>,
    /// Cutouts produced by foreground detection, keyed by asset reference
    pub detected_assets: MemoryAssets,
}

/// Serializable digest of an [`AnalysisReport`].
#[derive(Debug, Clone, Serialize)]
pub struct ReportSummary<'a> {
    pub width: u32,
    pub height: u32,
    pub is_valid: bool,
    pub message: Option<&'a str>,
    pub hard_to_define_floor: bool,
    pub virtual_staging: bool,
    pub metrics: crate::segmentation::VisionMetrics,
    pub objects: &'a [RoomObject],
    pub outline: &'a [Point],
}

impl AnalysisReport {
    pub fn summary(&self) -> ReportSummary<'_> {
        ReportSummary {
            width: self.result.width,
            height: self.result.height,
            is_valid: self.result.is_valid,
            message: self.result.message.as_deref(),
            hard_to_define_floor: self.result.hard_to_define_floor,
            virtual_staging: self.virtual_staging,
            metrics: self.result.metrics,
            objects: &self.objects,
            outline: &self.outline,
        }
    }
}

/// Copy of `objects` with every object virtually removed.
pub fn hide_objects(objects: &[RoomObject]) -> Vec<RoomObject> {
    objects
        .iter()
        .cloned()
        .map(|mut object| {
            object.is_visible = false;
            object
        })
        .collect()
}

/// Detected cutouts first, then the caller's asset store.
struct LayeredAssets<'a> {
    detected: &'a MemoryAssets,
    fallback: &'a dyn AssetLoader,
}

impl AssetLoader for LayeredAssets<'_> {
    fn load_asset(&self, reference: &str) -> Result<RgbaImage> {
        match self.detected.get(reference) {
            Some(cutout) => Ok(cutout.clone()),
            None => self.fallback.load_asset(reference),
        }
    }
}

pub struct Analyzer<'a> {
    segmenter: &'a FloorSegmenter,
    assets: &'a dyn AssetLoader,
    detect_objects: bool,
}

impl<'a> Analyzer<'a> {
    pub fn new(segmenter: &'a FloorSegmenter, assets: &'a dyn AssetLoader) -> Self {
        Self {
            segmenter,
            assets,
            detect_objects: true,
        }
    }

    /// Enable or disable foreground detection when no objects are supplied
    pub fn with_detection(mut self, detect_objects: bool) -> Self {
        self.detect_objects = detect_objects;
        self
    }

    /// Run the automatic flow.
    ///
    /// With no objects supplied, foreground detection runs first. When the
    /// result is hard to define and `auto_virtual_staging` is configured,
    /// the floor is recomputed with every object hidden.
    pub fn analyze(
        &self,
        image: &DynamicImage,
        hints: &SeedHints,
        objects: Vec<RoomObject>,
    ) -> Result<AnalysisReport> {
        let mut detected_assets = MemoryAssets::new();
        let objects = self.resolve_objects(image, objects, &mut detected_assets)?;

        let result = self.compute(image, hints, &objects, &detected_assets)?;
        let auto_stage = self.segmenter.config().auto_virtual_staging;

        if result.hard_to_define_floor && auto_stage && !objects.is_empty() {
            tracing::info!(
                "Floor is hard to define, retrying with {} object(s) removed",
                objects.len()
            );
            let hidden = hide_objects(&objects);
            let result = self.compute(image, hints, &hidden, &detected_assets)?;
            return Ok(self.report(result, hidden, detected_assets));
        }

        Ok(self.report(result, objects, detected_assets))
    }

    /// Hide every object (detecting one first if none are known) and
    /// recompute the floor.
    pub fn remove_furniture(
        &self,
        image: &DynamicImage,
        hints: &SeedHints,
        objects: Vec<RoomObject>,
    ) -> Result<AnalysisReport> {
        let mut detected_assets = MemoryAssets::new();
        let objects = self.resolve_objects(image, objects, &mut detected_assets)?;
        let hidden = hide_objects(&objects);

        let result = self.compute(image, hints, &hidden, &detected_assets)?;
        Ok(self.report(result, hidden, detected_assets))
    }

    fn resolve_objects(
        &self,
        image: &DynamicImage,
        objects: Vec<RoomObject>,
        detected_assets: &mut MemoryAssets,
    ) -> Result<Vec<RoomObject>> {
        if !objects.is_empty() || !self.detect_objects {
            return Ok(objects);
        }

        match self.segmenter.detect_foreground(image)? {
            Some(detected) => {
                tracing::info!("Found 1 item to isolate: {}", detected.object.id);
                detected_assets.save(detected.object.asset.clone(), detected.cutout);
                Ok(vec![detected.object])
            }
            None => Ok(Vec::new()),
        }
    }

    fn compute(
        &self,
        image: &DynamicImage,
        hints: &SeedHints,
        objects: &[RoomObject],
        detected_assets: &MemoryAssets,
    ) -> Result<VisionResult> {
        let assets = LayeredAssets {
            detected: detected_assets,
            fallback: self.assets,
        };
        self.segmenter.compute_mask(image, hints, objects, &assets)
    }

    fn report(
        &self,
        result: VisionResult,
        objects: Vec<RoomObject>,
        detected_assets: MemoryAssets,
    ) -> AnalysisReport {
        let outline = floor_outline(&result.mask, self.segmenter.config().polygon_row_step);
        let virtual_staging = objects.iter().any(|o| !o.is_visible);
        AnalysisReport {
            result,
            objects,
            virtual_staging,
            outline,
            detected_assets,
        }
    }
}
