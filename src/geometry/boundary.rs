use crate::segmentation::{Mask, Point};

/// Coarse left/right silhouette of the mask.
///
/// Every `row_step`-th row contributes its leftmost set pixel and, if
/// different, its rightmost one. Concave outlines cannot be represented.
pub fn mask_to_polygon(mask: &Mask, row_step: u32) -> Vec<Point> {
    let (width, height) = mask.dimensions();
    let mut points = Vec::new();
    if width == 0 || height == 0 {
        return points;
    }

    for y in (0..height).step_by(row_step.max(1) as usize) {
        let mut set = (0..width).filter(|&x| mask.get(x, y));
        let Some(min_x) = set.next() else {
            continue;
        };
        let max_x = set.last().unwrap_or(min_x);

        let ny = y as f32 / height as f32;
        points.push(Point::new(min_x as f32 / width as f32, ny));
        if max_x != min_x {
            points.push(Point::new(max_x as f32 / width as f32, ny));
        }
    }
    points
}

fn cross(o: &Point, a: &Point, b: &Point) -> f32 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

/// Monotone-chain convex hull.
///
/// Inputs with fewer than three points are returned unchanged. Collinear
/// points on the hull boundary are dropped.
pub fn convex_hull(points: &[Point]) -> Vec<Point> {
    if points.len() < 3 {
        return points.to_vec();
    }

    let mut sorted = points.to_vec();
    sorted.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));

    let mut lower: Vec<Point> = Vec::with_capacity(sorted.len());
    for p in &sorted {
        while lower.len() >= 2 && cross(&lower[lower.len() - 2], &lower[lower.len() - 1], p) <= 0.0 {
            lower.pop();
        }
        lower.push(*p);
    }

    let mut upper: Vec<Point> = Vec::with_capacity(sorted.len());
    for p in sorted.iter().rev() {
        while upper.len() >= 2 && cross(&upper[upper.len() - 2], &upper[upper.len() - 1], p) <= 0.0 {
            upper.pop();
        }
        upper.push(*p);
    }

    lower.pop();
    upper.pop();
    lower.extend(upper);
    lower
}

/// Clip polygon handed to the texturing stage.
pub fn floor_outline(mask: &Mask, row_step: u32) -> Vec<Point> {
    convex_hull(&mask_to_polygon(mask, row_step))
}
