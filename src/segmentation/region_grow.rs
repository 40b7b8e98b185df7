use super::color::{ColorDistance, ColorSample};
use super::types::{Mask, PixelBuffer, Point};
use std::collections::VecDeque;

/// Multi-seed breadth-first region grower.
///
/// Every positive seed contributes an independent reference color; a pixel
/// joins the floor when it is within tolerance of any of them.
#[derive(Debug, Clone, Copy)]
pub struct RegionGrower {
    metric: ColorDistance,
    tolerance: f32,
}

impl RegionGrower {
    pub fn new(metric: ColorDistance, tolerance: f32) -> Self {
        Self { metric, tolerance }
    }

    /// Grow a floor mask from `positive`, then carve out regions matching
    /// `negative` inside it.
    ///
    /// `positive` must already contain at least one seed; auto-seeding is the
    /// caller's job.
    pub fn grow(&self, buffer: &PixelBuffer, positive: &[Point], negative: &[Point]) -> Mask {
        let _span = tracing::debug_span!("region_grow").entered();

        let (width, height) = buffer.dimensions();
        let mut mask = Mask::new(width, height);
        if mask.is_empty() {
            return mask;
        }

        let seeds = seed_pixels(positive, width, height);
        let references = reference_colors(buffer, &seeds);
        let mut visited = vec![false; mask.len()];
        let mut queue: VecDeque<usize> = seeds.iter().map(|&(x, y)| mask.index(x, y)).collect();
        for &idx in &queue {
            visited[idx] = true;
        }

        while let Some(idx) = queue.pop_front() {
            mask.set(idx, true);

            for neighbor in neighbors(idx, width, height) {
                if visited[neighbor] {
                    continue;
                }
                let sample = sample_at(buffer, neighbor);
                if self.metric.matches_any(&references, &sample, self.tolerance) {
                    visited[neighbor] = true;
                    queue.push_back(neighbor);
                }
            }
        }

        tracing::debug!(
            "Grew {} floor pixels from {} seed(s)",
            mask.count(),
            seeds.len()
        );

        if !negative.is_empty() {
            self.subtract(buffer, &mut mask, negative);
        }

        mask
    }

    /// Clear pixels reachable from `negative` seeds through matching colors,
    /// staying inside the current mask.
    pub fn subtract(&self, buffer: &PixelBuffer, mask: &mut Mask, negative: &[Point]) {
        let (width, height) = buffer.dimensions();
        if mask.is_empty() || mask.dimensions() != (width, height) {
            return;
        }

        let seeds = seed_pixels(negative, width, height);
        let references = reference_colors(buffer, &seeds);
        let mut visited = vec![false; mask.len()];
        let mut queue: VecDeque<usize> = seeds.iter().map(|&(x, y)| mask.index(x, y)).collect();
        for &idx in &queue {
            visited[idx] = true;
        }

        let before = mask.count();
        while let Some(idx) = queue.pop_front() {
            mask.set(idx, false);

            for neighbor in neighbors(idx, width, height) {
                if visited[neighbor] || !mask.is_set(neighbor) {
                    continue;
                }
                let sample = sample_at(buffer, neighbor);
                if self.metric.matches_any(&references, &sample, self.tolerance) {
                    visited[neighbor] = true;
                    queue.push_back(neighbor);
                }
            }
        }

        tracing::debug!(
            "Negative seeds removed {} pixels",
            before.saturating_sub(mask.count())
        );
    }
}

fn seed_pixels(points: &[Point], width: u32, height: u32) -> Vec<(u32, u32)> {
    points.iter().map(|p| p.to_pixel(width, height)).collect()
}

fn reference_colors(buffer: &PixelBuffer, seeds: &[(u32, u32)]) -> Vec<ColorSample> {
    seeds
        .iter()
        .map(|&(x, y)| ColorSample::from(buffer.get_pixel(x, y)))
        .collect()
}

#[inline]
fn sample_at(buffer: &PixelBuffer, idx: usize) -> ColorSample {
    let width = buffer.width() as usize;
    ColorSample::from(buffer.get_pixel((idx % width) as u32, (idx / width) as u32))
}

/// 4-connected neighbours of `idx` that lie inside the buffer.
fn neighbors(idx: usize, width: u32, height: u32) -> impl Iterator<Item = usize> {
    let w = width as usize;
    let h = height as usize;
    let x = idx % w;
    let y = idx / w;

    let right = (x + 1 < w).then(|| idx + 1);
    let left = (x > 0).then(|| idx - 1);
    let down = (y + 1 < h).then(|| idx + w);
    let up = (y > 0).then(|| idx - w);

    [right, left, down, up].into_iter().flatten()
}
