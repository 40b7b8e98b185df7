use crate::error::{Result, VisionError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Tunables for one segmentation deployment.
///
/// Defaults reproduce the fixed constants the engine was calibrated with;
/// override them from YAML when lighting conditions call for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisionConfig {
    /// Width every photo is downscaled to before analysis
    pub processing_width: u32,
    /// Region growing accepts a pixel when its distance is strictly below this
    pub tolerance: f32,
    pub luma_weight: f32,
    pub chroma_weight: f32,
    /// Cutout pixels with alpha above this value cover the mask
    pub alpha_threshold: u8,
    /// Normalized seed used when the caller supplies none
    pub auto_seed: (f32, f32),
    /// Scanline step used by the polygon extractor
    pub polygon_row_step: u32,
    /// Retry with every object hidden when the floor is ambiguous
    pub auto_virtual_staging: bool,
    pub foreground: ForegroundConfig,
}

/// Parameters of the contrast-based foreground blob finder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForegroundConfig {
    pub threshold: f32,
    pub luma_weight: f32,
    pub chroma_weight: f32,
    pub min_area_fraction: f32,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            processing_width: 400,
            tolerance: 35.0,
            luma_weight: 0.3,
            chroma_weight: 1.5,
            alpha_threshold: 50,
            auto_seed: (0.5, 0.9),
            polygon_row_step: 5,
            auto_virtual_staging: false,
            foreground: ForegroundConfig::default(),
        }
    }
}

impl Default for ForegroundConfig {
    fn default() -> Self {
        Self {
            threshold: 50.0,
            luma_weight: 1.0,
            chroma_weight: 2.0,
            min_area_fraction: 0.05,
        }
    }
}

impl VisionConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| VisionError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config: VisionConfig = serde_yaml::from_str(&contents)?;
        config.validate()?;
        tracing::debug!("Loaded vision config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.processing_width == 0 {
            return Err(VisionError::InvalidConfig(
                "processing_width must be positive".into(),
            ));
        }
        if self.polygon_row_step == 0 {
            return Err(VisionError::InvalidConfig(
                "polygon_row_step must be positive".into(),
            ));
        }

        let weights = [
            ("tolerance", self.tolerance),
            ("luma_weight", self.luma_weight),
            ("chroma_weight", self.chroma_weight),
            ("foreground.threshold", self.foreground.threshold),
            ("foreground.luma_weight", self.foreground.luma_weight),
            ("foreground.chroma_weight", self.foreground.chroma_weight),
            ("foreground.min_area_fraction", self.foreground.min_area_fraction),
        ];
        for (name, value) in weights {
            if !value.is_finite() || value < 0.0 {
                return Err(VisionError::InvalidConfig(format!(
                    "{name} must be a finite non-negative number, got {value}"
                )));
            }
        }

        let (sx, sy) = self.auto_seed;
        if !(0.0..=1.0).contains(&sx) || !(0.0..=1.0).contains(&sy) {
            return Err(VisionError::InvalidConfig(format!(
                "auto_seed must be normalized, got ({sx}, {sy})"
            )));
        }

        Ok(())
    }
}
