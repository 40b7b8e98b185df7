use super::types::{Component, Mask};
use image::{GrayImage, Luma};
use imageproc::region_labelling::{connected_components, Connectivity};
use std::collections::HashMap;

/// Partition the set pixels of `mask` into 4-connected components.
///
/// Components are numbered from 1 in the order a row-major scan first
/// reaches them, independent of how the labeller numbers its regions.
pub fn label_components(mask: &Mask) -> Vec<Component> {
    let _span = tracing::debug_span!("label_components").entered();

    if mask.is_empty() {
        return Vec::new();
    }

    let (width, height) = mask.dimensions();
    let gray = GrayImage::from_fn(width, height, |x, y| Luma([mask.get(x, y) as u8]));
    let labels = connected_components(&gray, Connectivity::Four, Luma([0u8]));

    let mut slots: HashMap<u32, usize> = HashMap::new();
    let mut components: Vec<Component> = Vec::new();

    for (idx, (_, row, label)) in labels.enumerate_pixels().enumerate() {
        let label = label[0];
        if label == 0 {
            continue;
        }

        let slot = *slots.entry(label).or_insert_with(|| {
            components.push(Component {
                id: components.len() as u32 + 1,
                pixels: Vec::new(),
                area: 0,
                min_row: row,
                max_row: row,
            });
            components.len() - 1
        });

        let component = &mut components[slot];
        component.pixels.push(idx);
        component.area += 1;
        component.max_row = row;
    }

    tracing::debug!("Labeled {} components", components.len());
    components
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mask_from_rows(rows: &[&str]) -> Mask {
        let height = rows.len() as u32;
        let width = rows[0].len() as u32;
        let data = rows
            .iter()
            .flat_map(|row| row.bytes().map(|b| (b == b'#') as u8))
            .collect();
        Mask::from_raw(width, height, data).unwrap()
    }

    #[test]
    fn empty_mask_has_no_components() {
        assert!(label_components(&Mask::new(8, 8)).is_empty());
    }

    #[test]
    fn diagonal_pixels_are_separate() {
        let mask = mask_from_rows(&["#.", ".#"]);
        let components = label_components(&mask);
        assert_eq!(components.len(), 2);
        assert!(components.iter().all(|c| c.area == 1));
    }

    #[test]
    fn rows_do_not_wrap() {
        // Last pixel of row 0 and first pixel of row 1 are adjacent in memory only.
        let mask = mask_from_rows(&["..#", "#.."]);
        assert_eq!(label_components(&mask).len(), 2);
    }

    #[test]
    fn records_rows_and_area() {
        let mask = mask_from_rows(&[
            "##....", //
            "##..#.",
            "....#.",
            "....##",
        ]);
        let components = label_components(&mask);
        assert_eq!(components.len(), 2);

        let first = &components[0];
        assert_eq!(first.id, 1);
        assert_eq!(first.area, 4);
        assert_eq!((first.min_row, first.max_row), (0, 1));
        assert_eq!(first.bbox_height(), 1);

        let second = &components[1];
        assert_eq!(second.id, 2);
        assert_eq!(second.area, 4);
        assert_eq!((second.min_row, second.max_row), (1, 3));
    }

    #[test]
    fn branches_joined_below_are_one_component() {
        // Two arms meet only on the last row.
        let mask = mask_from_rows(&["#..#.#", "#..#.#", "####.#"]);
        let components = label_components(&mask);

        assert_eq!(components.len(), 2);
        assert_eq!(components[0].id, 1);
        assert_eq!(components[0].area, 8);
        assert_eq!((components[0].min_row, components[0].max_row), (0, 2));
        // Right column starts at (5, 0), after the left arm in scan order.
        assert_eq!(components[1].id, 2);
        assert_eq!(components[1].pixels, vec![5, 11, 17]);
    }

    #[test]
    fn labeling_partitions_the_mask() {
        let mask = mask_from_rows(&["#.#.#", ".###.", "#...#"]);
        let components = label_components(&mask);

        let mut seen: Vec<usize> = components.iter().flat_map(|c| c.pixels.clone()).collect();
        seen.sort_unstable();
        let total = seen.len();
        seen.dedup();

        assert_eq!(seen.len(), total);
        assert_eq!(total, mask.count());
        assert_eq!(components.iter().map(|c| c.area).sum::<usize>(), mask.count());
    }
}
