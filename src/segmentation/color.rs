use image::Rgba;

/// Luma / chroma triple of one pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorSample {
    pub luma: f32,
    pub chroma_u: f32,
    pub chroma_v: f32,
}

/// Weighted L1 metric over [`ColorSample`]s.
///
/// Keep `luma_weight` below `chroma_weight` so shadows on the floor are
/// tolerated more than a change of hue.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorDistance {
    pub luma_weight: f32,
    pub chroma_weight: f32,
}

/// Convert RGB to the unoffset YUV space used for seed matching
pub fn to_perceptual(r: u8, g: u8, b: u8) -> ColorSample {
    let r = r as f32;
    let g = g as f32;
    let b = b as f32;

    let luma = 0.299 * r + 0.587 * g + 0.114 * b;
    let chroma_u = 0.492 * (b - luma);
    let chroma_v = 0.877 * (r - luma);

    ColorSample {
        luma,
        chroma_u,
        chroma_v,
    }
}

impl From<&Rgba<u8>> for ColorSample {
    fn from(pixel: &Rgba<u8>) -> Self {
        to_perceptual(pixel[0], pixel[1], pixel[2])
    }
}

impl ColorDistance {
    pub fn new(luma_weight: f32, chroma_weight: f32) -> Self {
        Self {
            luma_weight,
            chroma_weight,
        }
    }

    pub fn distance(&self, a: &ColorSample, b: &ColorSample) -> f32 {
        (a.luma - b.luma).abs() * self.luma_weight
            + (a.chroma_u - b.chroma_u).abs() * self.chroma_weight
            + (a.chroma_v - b.chroma_v).abs() * self.chroma_weight
    }

    /// `true` if `sample` lies strictly within `tolerance` of any reference.
    pub fn matches_any(&self, references: &[ColorSample], sample: &ColorSample, tolerance: f32) -> bool {
        references
            .iter()
            .any(|reference| self.distance(reference, sample) < tolerance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grey_has_no_chroma() {
        let sample = to_perceptual(128, 128, 128);
        assert!((sample.luma - 128.0).abs() < 1e-3);
        assert!(sample.chroma_u.abs() < 1e-3);
        assert!(sample.chroma_v.abs() < 1e-3);
    }

    #[test]
    fn distance_is_symmetric_and_zero_on_self() {
        let metric = ColorDistance::new(0.3, 1.5);
        let a = to_perceptual(200, 180, 160);
        let b = to_perceptual(50, 50, 200);
        assert_eq!(metric.distance(&a, &a), 0.0);
        assert!((metric.distance(&a, &b) - metric.distance(&b, &a)).abs() < 1e-4);
    }

    #[test]
    fn shadow_is_closer_than_hue_shift() {
        let metric = ColorDistance::new(0.3, 1.5);
        let floor = to_perceptual(200, 180, 160);
        let shadow = to_perceptual(150, 135, 120);
        let red = to_perceptual(230, 150, 160);
        assert!(metric.distance(&floor, &shadow) < metric.distance(&floor, &red));
        assert!(metric.distance(&floor, &shadow) < 35.0);
    }

    #[test]
    fn matches_any_is_a_boolean_or() {
        let metric = ColorDistance::new(0.3, 1.5);
        let refs = [to_perceptual(0, 0, 0), to_perceptual(255, 0, 0)];
        assert!(metric.matches_any(&refs, &to_perceptual(250, 2, 2), 35.0));
        assert!(!metric.matches_any(&refs, &to_perceptual(0, 0, 255), 35.0));
        assert!(!metric.matches_any(&[], &to_perceptual(0, 0, 0), 35.0));
    }
}
