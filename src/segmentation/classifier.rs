//! Rule-based confidence classifier over labeled floor components.
//!
//! Ambiguity is judged by an ordered list of named rules, each contributing
//! one bit to `hard_to_define_floor`. Component selection and the final
//! validity verdict are computed from the retained set only.

use super::types::{Component, Mask, VisionMetrics};

/// Bounding-box height fraction above which a component looks like a wall
pub const TALL_VERTICAL_FRACTION: f32 = 0.4;
/// Minimum area fraction for a component to count as significant
pub const SIGNIFICANT_AREA_FRACTION: f32 = 0.01;
pub const MAX_SIGNIFICANT_COMPONENTS: usize = 3;
/// A floor component must reach this row fraction
pub const BOTTOM_BAND_FRACTION: f32 = 0.95;
/// A floor component must start strictly below this row fraction
pub const HORIZON_FRACTION: f32 = 0.3;
pub const MIN_FLOOR_AREA_FRACTION: f32 = 0.05;
pub const SUSPICIOUS_COVERAGE_HIGH: f32 = 0.5;
pub const SUSPICIOUS_COVERAGE_LOW: f32 = 0.03;
pub const MIN_VALID_COVERAGE: f32 = 0.03;
pub const MAX_VALID_COVERAGE: f32 = 0.6;

/// Geometry of the frame the components were labeled in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
}

impl Frame {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn total_pixels(&self) -> usize {
        self.width as usize * self.height as usize
    }

    fn area_fraction(&self, area: usize) -> f32 {
        let total = self.total_pixels();
        if total == 0 {
            0.0
        } else {
            area as f32 / total as f32
        }
    }

    fn touches_bottom(&self, component: &Component) -> bool {
        component.max_row as f32 >= self.height as f32 * BOTTOM_BAND_FRACTION
    }

    fn is_significant(&self, component: &Component) -> bool {
        self.area_fraction(component.area) >= SIGNIFICANT_AREA_FRACTION
    }

    /// Bottom-touching, starts below the horizon, and large enough.
    fn is_valid_floor(&self, component: &Component) -> bool {
        self.touches_bottom(component)
            && component.min_row as f32 > self.height as f32 * HORIZON_FRACTION
            && self.area_fraction(component.area) >= MIN_FLOOR_AREA_FRACTION
    }
}

/// One named ambiguity heuristic.
#[derive(Clone, Copy)]
pub struct AmbiguityRule {
    pub name: &'static str,
    pub check: fn(&[Component], &Frame) -> bool,
}

impl std::fmt::Debug for AmbiguityRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AmbiguityRule").field("name", &self.name).finish()
    }
}

fn has_tall_verticals(components: &[Component], frame: &Frame) -> bool {
    components
        .iter()
        .any(|c| c.bbox_height() as f32 > frame.height as f32 * TALL_VERTICAL_FRACTION)
}

fn is_fragmented(components: &[Component], frame: &Frame) -> bool {
    components.iter().filter(|c| frame.is_significant(c)).count() > MAX_SIGNIFICANT_COMPONENTS
}

fn has_no_valid_floor(components: &[Component], frame: &Frame) -> bool {
    !components.iter().any(|c| frame.is_valid_floor(c))
}

fn has_coverage_extremes(components: &[Component], frame: &Frame) -> bool {
    let coverage = frame.area_fraction(components.iter().map(|c| c.area).sum());
    coverage > SUSPICIOUS_COVERAGE_HIGH || coverage < SUSPICIOUS_COVERAGE_LOW
}

pub const AMBIGUITY_RULES: &[AmbiguityRule] = &[
    AmbiguityRule {
        name: "tall_verticals",
        check: has_tall_verticals,
    },
    AmbiguityRule {
        name: "fragmentation",
        check: is_fragmented,
    },
    AmbiguityRule {
        name: "no_valid_floor",
        check: has_no_valid_floor,
    },
    AmbiguityRule {
        name: "coverage_extremes",
        check: has_coverage_extremes,
    },
];

/// Why a retained mask was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    TooSmall,
    TooLarge,
    NotTouchingBottom,
}

impl Rejection {
    pub fn message(&self) -> &'static str {
        match self {
            Rejection::TooSmall => "Floor area too small to detect.",
            Rejection::TooLarge => "Area too large. Likely includes walls.",
            Rejection::NotTouchingBottom => "Floor must start from the bottom.",
        }
    }
}

/// Outcome of classifying one set of components.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    /// Ids of the components kept in the final mask
    pub retained: Vec<u32>,
    /// Names of the ambiguity rules that fired
    pub flags: Vec<&'static str>,
    pub hard_to_define_floor: bool,
    pub metrics: VisionMetrics,
    pub rejection: Option<Rejection>,
}

impl Classification {
    pub fn is_valid(&self) -> bool {
        self.rejection.is_none()
    }

    pub fn message(&self) -> Option<String> {
        self.rejection.map(|r| r.message().to_string())
    }
}

/// Classify `components` labeled in `frame`.
///
/// `virtual_staging` is set when any object was force-filled into the mask;
/// it silences the ambiguity rules and the bottom-touch requirement.
pub fn classify(components: &[Component], frame: Frame, virtual_staging: bool) -> Classification {
    let _span = tracing::debug_span!("classify").entered();

    let flags: Vec<&'static str> = AMBIGUITY_RULES
        .iter()
        .filter(|rule| (rule.check)(components, &frame))
        .map(|rule| rule.name)
        .collect();
    let hard_to_define_floor = !flags.is_empty() && !virtual_staging;

    let valid_floor: Vec<&Component> = components
        .iter()
        .filter(|c| frame.is_valid_floor(c))
        .collect();
    let retained: Vec<&Component> = if !valid_floor.is_empty() {
        valid_floor
    } else {
        components.iter().filter(|c| frame.is_significant(c)).collect()
    };

    let retained_area: usize = retained.iter().map(|c| c.area).sum();
    let tallest = retained.iter().map(|c| c.bbox_height()).max().unwrap_or(0);
    let metrics = VisionMetrics {
        coverage_fraction: frame.area_fraction(retained_area),
        touches_bottom: retained.iter().any(|c| frame.touches_bottom(c)),
        component_count: retained.len(),
        largest_component_height_fraction: if frame.height == 0 {
            0.0
        } else {
            tallest as f32 / frame.height as f32
        },
    };

    let rejection = if metrics.coverage_fraction < MIN_VALID_COVERAGE {
        Some(Rejection::TooSmall)
    } else if metrics.coverage_fraction > MAX_VALID_COVERAGE {
        Some(Rejection::TooLarge)
    } else if !metrics.touches_bottom && !virtual_staging {
        Some(Rejection::NotTouchingBottom)
    } else {
        None
    };

    tracing::debug!(
        "Classified {} components: retained={}, flags={:?}, coverage={:.3}",
        components.len(),
        retained.len(),
        flags,
        metrics.coverage_fraction
    );

    Classification {
        retained: retained.iter().map(|c| c.id).collect(),
        flags,
        hard_to_define_floor,
        metrics,
        rejection,
    }
}

/// Rebuild `mask` so that only pixels of retained components remain set.
pub fn retain_components(mask: &mut Mask, components: &[Component], retained: &[u32]) {
    mask.clear();
    for component in components.iter().filter(|c| retained.contains(&c.id)) {
        for &idx in &component.pixels {
            mask.set(idx, true);
        }
    }
}
