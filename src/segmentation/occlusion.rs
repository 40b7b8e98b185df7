use super::types::{Mask, RoomObject};
use image::RgbaImage;

/// A room object paired with its already-loaded cutout stencil.
#[derive(Debug, Clone, Copy)]
pub struct LoadedObject<'a> {
    pub object: &'a RoomObject,
    pub cutout: &'a RgbaImage,
}

/// Stamps object cutouts into a floor mask.
///
/// Visible objects punch holes into the floor; hidden ones are force-filled
/// as floor. Objects are applied in order, so later ones win on overlap.
#[derive(Debug, Clone, Copy)]
pub struct OcclusionCompositor {
    alpha_threshold: u8,
}

impl OcclusionCompositor {
    pub fn new(alpha_threshold: u8) -> Self {
        Self { alpha_threshold }
    }

    pub fn apply(&self, mask: &mut Mask, objects: &[LoadedObject<'_>]) {
        let _span = tracing::debug_span!("occlusion").entered();

        for loaded in objects {
            let covered = self.stamp(mask, loaded);
            tracing::debug!(
                "Object {} ({}) covers {} pixels, visible={}",
                loaded.object.id,
                loaded.object.label,
                covered,
                loaded.object.is_visible
            );
        }
    }

    fn stamp(&self, mask: &mut Mask, loaded: &LoadedObject<'_>) -> usize {
        let (width, height) = mask.dimensions();
        let object = loaded.object;
        let (src_w, src_h) = loaded.cutout.dimensions();

        let left = (object.x * width as f32).round() as i64;
        let top = (object.y * height as f32).round() as i64;
        let dest_w = (object.width * width as f32).round() as i64;
        let dest_h = (object.height * height as f32).round() as i64;
        if dest_w <= 0 || dest_h <= 0 || src_w == 0 || src_h == 0 {
            return 0;
        }

        // Only the part of the destination rect inside the frame is rasterized
        let x_range = left.max(0)..left.saturating_add(dest_w).min(width as i64);
        let y_range = top.max(0)..top.saturating_add(dest_h).min(height as i64);
        if x_range.is_empty() || y_range.is_empty() {
            return 0;
        }

        let mut covered = 0;
        for y in y_range {
            let sy = ((y as i128 - top as i128) * src_h as i128 / dest_h as i128) as u32;
            for x in x_range.clone() {
                let sx = ((x as i128 - left as i128) * src_w as i128 / dest_w as i128) as u32;
                if loaded.cutout.get_pixel(sx, sy)[3] <= self.alpha_threshold {
                    continue;
                }
                let idx = mask.index(x as u32, y as u32);
                mask.set(idx, !object.is_visible);
                covered += 1;
            }
        }
        covered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn object(x: f32, y: f32, w: f32, h: f32, is_visible: bool) -> RoomObject {
        RoomObject {
            id: "sofa".into(),
            label: "Sofa".into(),
            asset: "sofa.png".into(),
            x,
            y,
            width: w,
            height: h,
            z_index: 10,
            is_visible,
        }
    }

    fn opaque(w: u32, h: u32) -> RgbaImage {
        RgbaImage::from_pixel(w, h, Rgba([10, 10, 10, 255]))
    }

    #[test]
    fn visible_object_clears_floor() {
        let mut mask = Mask::from_raw(10, 10, vec![1; 100]).unwrap();
        let sofa = object(0.2, 0.2, 0.3, 0.3, true);
        let cutout = opaque(3, 3);

        OcclusionCompositor::new(50).apply(
            &mut mask,
            &[LoadedObject {
                object: &sofa,
                cutout: &cutout,
            }],
        );

        assert_eq!(mask.count(), 91);
        assert!(!mask.get(2, 2));
        assert!(!mask.get(4, 4));
        assert!(mask.get(5, 5));
    }

    #[test]
    fn hidden_object_fills_floor() {
        let mut mask = Mask::new(10, 10);
        let sofa = object(0.0, 0.5, 0.5, 0.5, false);
        let cutout = opaque(1, 1);

        OcclusionCompositor::new(50).apply(
            &mut mask,
            &[LoadedObject {
                object: &sofa,
                cutout: &cutout,
            }],
        );

        assert_eq!(mask.count(), 25);
        assert!(mask.get(0, 9));
        assert!(!mask.get(5, 9));
    }

    #[test]
    fn transparent_pixels_do_not_cover() {
        let mut mask = Mask::from_raw(4, 4, vec![1; 16]).unwrap();
        let lamp = object(0.0, 0.0, 1.0, 1.0, true);
        // Left half opaque, right half below the alpha threshold.
        let cutout = RgbaImage::from_fn(4, 4, |x, _| {
            if x < 2 {
                Rgba([0, 0, 0, 255])
            } else {
                Rgba([0, 0, 0, 50])
            }
        });

        OcclusionCompositor::new(50).apply(
            &mut mask,
            &[LoadedObject {
                object: &lamp,
                cutout: &cutout,
            }],
        );

        assert_eq!(mask.count(), 8);
        assert!(!mask.get(0, 0));
        assert!(mask.get(3, 3));
    }

    #[test]
    fn later_objects_win_on_overlap() {
        let mut mask = Mask::new(10, 10);
        let hidden = object(0.0, 0.0, 1.0, 1.0, false);
        let visible = object(0.0, 0.0, 0.5, 1.0, true);
        let cutout = opaque(2, 2);

        OcclusionCompositor::new(50).apply(
            &mut mask,
            &[
                LoadedObject {
                    object: &hidden,
                    cutout: &cutout,
                },
                LoadedObject {
                    object: &visible,
                    cutout: &cutout,
                },
            ],
        );

        assert_eq!(mask.count(), 50);
        assert!(!mask.get(0, 0));
        assert!(mask.get(9, 0));
    }

    #[test]
    fn object_outside_frame_is_clipped() {
        let mut mask = Mask::new(10, 10);
        let rug = object(0.8, 0.8, 0.5, 0.5, false);
        let cutout = opaque(5, 5);

        OcclusionCompositor::new(50).apply(
            &mut mask,
            &[LoadedObject {
                object: &rug,
                cutout: &cutout,
            }],
        );

        assert_eq!(mask.count(), 4);
    }

    #[test]
    fn oversized_object_only_touches_the_frame() {
        let mut mask = Mask::new(10, 10);
        // 100x the frame wide; only the opaque left half of the stencil lands in view.
        let rug = object(0.5, 0.0, 100.0, 1.0, false);
        let cutout = RgbaImage::from_fn(2, 1, |x, _| {
            if x == 0 {
                Rgba([0, 0, 0, 255])
            } else {
                Rgba([0, 0, 0, 0])
            }
        });

        OcclusionCompositor::new(50).apply(
            &mut mask,
            &[LoadedObject {
                object: &rug,
                cutout: &cutout,
            }],
        );

        assert_eq!(mask.count(), 50);
        assert!(mask.get(5, 0));
        assert!(!mask.get(4, 9));
    }

    #[test]
    fn object_left_of_frame_samples_its_right_edge() {
        let mut mask = Mask::new(10, 10);
        let rug = object(-0.5, 0.0, 1.0, 1.0, false);
        // Opaque right half only.
        let cutout = RgbaImage::from_fn(2, 2, |x, _| {
            if x == 1 {
                Rgba([0, 0, 0, 255])
            } else {
                Rgba([0, 0, 0, 0])
            }
        });

        OcclusionCompositor::new(50).apply(
            &mut mask,
            &[LoadedObject {
                object: &rug,
                cutout: &cutout,
            }],
        );

        assert_eq!(mask.count(), 50);
        assert!(mask.get(0, 0));
        assert!(!mask.get(5, 0));
    }
}
