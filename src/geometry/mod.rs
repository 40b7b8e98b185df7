mod boundary;

pub use boundary::{convex_hull, floor_outline, mask_to_polygon};
