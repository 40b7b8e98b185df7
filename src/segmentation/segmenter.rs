use super::classifier::{classify, retain_components, Frame};
use super::color::ColorDistance;
use super::components::label_components;
use super::foreground::{DetectedObject, ForegroundExtractor};
use super::occlusion::{LoadedObject, OcclusionCompositor};
use super::preprocess::Preprocessor;
use super::region_grow::RegionGrower;
use super::types::{PixelBuffer, Point, RoomObject, SeedHints, VisionResult};
use crate::config::VisionConfig;
use crate::error::{Result, VisionError};
use crate::source::AssetLoader;
use image::{DynamicImage, RgbaImage};

/// Floor segmentation engine.
///
/// Each call runs grow → composite → label → classify to completion on its
/// own buffer and mask; nothing is shared between calls.
pub struct FloorSegmenter {
    config: VisionConfig,
    preprocessor: Preprocessor,
    grower: RegionGrower,
    compositor: OcclusionCompositor,
    foreground: ForegroundExtractor,
}

impl FloorSegmenter {
    pub fn new(config: VisionConfig) -> Result<Self> {
        config.validate()?;

        let metric = ColorDistance::new(config.luma_weight, config.chroma_weight);
        Ok(Self {
            preprocessor: Preprocessor::new(config.processing_width),
            grower: RegionGrower::new(metric, config.tolerance),
            compositor: OcclusionCompositor::new(config.alpha_threshold),
            foreground: ForegroundExtractor::new(&config.foreground),
            config,
        })
    }

    pub fn config(&self) -> &VisionConfig {
        &self.config
    }

    /// Downscale a photo to the processing resolution.
    pub fn prepare(&self, image: &DynamicImage) -> Result<PixelBuffer> {
        self.preprocessor.prepare(image)
    }

    /// Segment the floor of `image`.
    ///
    /// Cutouts are resolved through `assets` before any analysis starts; an
    /// object whose cutout cannot be loaded is skipped.
    pub fn compute_mask(
        &self,
        image: &DynamicImage,
        hints: &SeedHints,
        objects: &[RoomObject],
        assets: &dyn AssetLoader,
    ) -> Result<VisionResult> {
        let buffer = self.prepare(image)?;
        let cutouts = load_cutouts(objects, assets);
        let loaded: Vec<LoadedObject<'_>> = cutouts
            .iter()
            .map(|(object, cutout)| LoadedObject {
                object: *object,
                cutout,
            })
            .collect();

        let virtual_staging = objects.iter().any(|o| !o.is_visible);
        Ok(self.run(&buffer, hints, &loaded, virtual_staging))
    }

    /// Segment an already-prepared buffer with already-loaded objects.
    pub fn segment_buffer(
        &self,
        buffer: &PixelBuffer,
        hints: &SeedHints,
        objects: &[LoadedObject<'_>],
    ) -> Result<VisionResult> {
        if buffer.width() == 0 || buffer.height() == 0 {
            return Err(VisionError::EmptyImage);
        }
        let virtual_staging = objects.iter().any(|o| !o.object.is_visible);
        Ok(self.run(buffer, hints, objects, virtual_staging))
    }

    /// Look for one salient foreground blob to use as an occlusion object.
    pub fn detect_foreground(&self, image: &DynamicImage) -> Result<Option<DetectedObject>> {
        let buffer = self.prepare(image)?;
        Ok(self.foreground.extract(&buffer))
    }

    fn run(
        &self,
        buffer: &PixelBuffer,
        hints: &SeedHints,
        objects: &[LoadedObject<'_>],
        virtual_staging: bool,
    ) -> VisionResult {
        let (width, height) = buffer.dimensions();

        let positive = if hints.positive.is_empty() {
            let (x, y) = self.config.auto_seed;
            tracing::debug!("No seeds supplied, auto-seeding at ({}, {})", x, y);
            vec![Point::new(x, y)]
        } else {
            hints.positive.clone()
        };

        let mut mask = self.grower.grow(buffer, &positive, &hints.negative);
        if !objects.is_empty() {
            self.compositor.apply(&mut mask, objects);
        }

        let components = label_components(&mask);
        let classification = classify(&components, Frame::new(width, height), virtual_staging);
        retain_components(&mut mask, &components, &classification.retained);

        tracing::info!(
            "Floor segmentation: valid={}, hard_to_define={}, coverage={:.1}%, components={}",
            classification.is_valid(),
            classification.hard_to_define_floor,
            classification.metrics.coverage_fraction * 100.0,
            classification.metrics.component_count
        );

        VisionResult {
            mask,
            width,
            height,
            is_valid: classification.is_valid(),
            message: classification.message(),
            metrics: classification.metrics,
            hard_to_define_floor: classification.hard_to_define_floor,
        }
    }
}

/// Load every object's cutout, dropping objects whose asset fails.
pub fn load_cutouts<'a>(
    objects: &'a [RoomObject],
    assets: &dyn AssetLoader,
) -> Vec<(&'a RoomObject, RgbaImage)> {
    objects
        .iter()
        .filter_map(|object| match assets.load_asset(&object.asset) {
            Ok(cutout) => Some((object, cutout)),
            Err(e) => {
                tracing::warn!("Skipping object {}: {}", object.id, e);
                None
            }
        })
        .collect()
}
