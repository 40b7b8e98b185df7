use floorscan::geometry::floor_outline;
use floorscan::segmentation::{Point, RoomObject, SeedHints};
use floorscan::source::MemoryAssets;
use floorscan::{FloorSegmenter, VisionConfig, VisionResult};
use image::{DynamicImage, Rgba, RgbaImage};

const FLOOR: Rgba<u8> = Rgba([200, 180, 160, 255]);
const WALL: Rgba<u8> = Rgba([50, 50, 200, 255]);
const RUG: Rgba<u8> = Rgba([180, 40, 40, 255]);

fn room(floor_start: u32) -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::from_fn(400, 300, |_, y| {
        if y >= floor_start {
            FLOOR
        } else {
            WALL
        }
    }))
}

/// Floor from row 200 with a rug splitting it at columns 160..240
fn room_with_rug() -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::from_fn(400, 300, |x, y| {
        if y < 200 {
            WALL
        } else if (160..240).contains(&x) {
            RUG
        } else {
            FLOOR
        }
    }))
}

fn rug_object(is_visible: bool) -> RoomObject {
    RoomObject {
        id: "rug".into(),
        label: "Rug".into(),
        asset: "rug.png".into(),
        x: 0.4,
        y: 200.0 / 300.0,
        width: 0.2,
        height: 100.0 / 300.0,
        z_index: 5,
        is_visible,
    }
}

fn rug_assets() -> MemoryAssets {
    let mut assets = MemoryAssets::new();
    assets.save("rug.png", RgbaImage::from_pixel(80, 100, RUG));
    assets
}

fn segment(image: &DynamicImage, hints: &SeedHints, objects: &[RoomObject]) -> VisionResult {
    let segmenter = FloorSegmenter::new(VisionConfig::default()).unwrap();
    segmenter
        .compute_mask(image, hints, objects, &rug_assets())
        .unwrap()
}

fn side_seeds() -> SeedHints {
    SeedHints::new(vec![Point::new(0.1, 0.9), Point::new(0.9, 0.9)], Vec::new())
}

#[test]
fn half_floor_is_kept_but_flagged_as_ambiguous() {
    let result = segment(&room(150), &SeedHints::new(vec![Point::new(0.5, 0.9)], vec![]), &[]);

    for y in [0, 149, 150, 299] {
        assert_eq!(result.mask.get(200, y), y >= 150, "row {y}");
    }
    assert_eq!(result.mask.count(), 400 * 150);
    assert!((result.metrics.coverage_fraction - 0.5).abs() < 1e-6);
    // 50% coverage is inside the valid band; the tall component flags it.
    assert!(result.is_valid);
    assert!(result.message.is_none());
    assert!(result.hard_to_define_floor);
}

#[test]
fn floor_band_at_bottom_is_valid() {
    let result = segment(&room(270), &SeedHints::new(vec![Point::new(0.5, 0.9)], vec![]), &[]);

    assert!(result.is_valid);
    assert!(result.metrics.touches_bottom);
    assert!(!result.hard_to_define_floor);
    assert_eq!(result.metrics.component_count, 1);
    assert!((result.metrics.coverage_fraction - 0.1).abs() < 1e-6);
}

#[test]
fn wall_seed_reports_too_large() {
    let result = segment(&room(270), &SeedHints::new(vec![Point::new(0.5, 0.1)], vec![]), &[]);

    assert!(!result.is_valid);
    assert_eq!(
        result.message.as_deref(),
        Some("Area too large. Likely includes walls.")
    );
}

#[test]
fn hidden_object_is_force_filled() {
    let without = segment(&room_with_rug(), &side_seeds(), &[]);
    assert!(!without.mask.get(200, 250));
    assert_eq!(without.metrics.component_count, 2);

    let staged = segment(&room_with_rug(), &side_seeds(), &[rug_object(false)]);
    assert!(staged.mask.get(200, 250));
    assert!(!staged.hard_to_define_floor);
    assert!(staged.is_valid);
    assert_eq!(staged.metrics.component_count, 1);
    assert_eq!(staged.mask.count(), 400 * 100);
}

#[test]
fn hidden_object_never_lowers_coverage() {
    let without = segment(&room_with_rug(), &side_seeds(), &[]);
    let staged = segment(&room_with_rug(), &side_seeds(), &[rug_object(false)]);
    assert!(staged.metrics.coverage_fraction >= without.metrics.coverage_fraction);
}

#[test]
fn visible_object_cuts_the_floor() {
    let result = segment(&room(200), &SeedHints::default(), &[rug_object(true)]);

    assert!(!result.mask.get(200, 250));
    assert!(result.mask.get(100, 250));
    assert_eq!(result.mask.count(), 400 * 100 - 80 * 100);
}

#[test]
fn missing_seeds_match_explicit_auto_seed() {
    let auto = segment(&room(270), &SeedHints::default(), &[]);
    let explicit = segment(&room(270), &SeedHints::new(vec![Point::new(0.5, 0.9)], vec![]), &[]);
    assert_eq!(auto, explicit);
}

#[test]
fn repeated_calls_are_identical() {
    let first = segment(&room_with_rug(), &side_seeds(), &[rug_object(false)]);
    let second = segment(&room_with_rug(), &side_seeds(), &[rug_object(false)]);
    assert_eq!(first, second);
}

#[test]
fn negative_seed_removes_a_region() {
    let positive = vec![Point::new(0.1, 0.9), Point::new(0.5, 0.9)];
    let before = segment(&room_with_rug(), &SeedHints::new(positive.clone(), vec![]), &[]);
    let after = segment(
        &room_with_rug(),
        &SeedHints::new(positive, vec![Point::new(0.5, 0.9)]),
        &[],
    );

    assert!(before.mask.get(200, 250));
    assert!(!after.mask.get(200, 250));
    assert!(after.mask.is_subset_of(&before.mask));
}

#[test]
fn outline_covers_floor_band() {
    let result = segment(&room(270), &SeedHints::default(), &[]);
    let outline = floor_outline(&result.mask, 5);

    assert_eq!(outline.len(), 4);
    assert!(outline.iter().all(|p| p.y >= 0.9 - 1e-6));
}
