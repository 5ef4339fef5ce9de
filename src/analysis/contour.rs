use crate::{analysis::mask::AlphaMask, foundation::core::Point};

/// Inclusive pixel bounds of the foreground.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoundingBox {
    /// Leftmost foreground column.
    pub min_x: u32,
    /// Topmost foreground row.
    pub min_y: u32,
    /// Rightmost foreground column.
    pub max_x: u32,
    /// Bottom foreground row.
    pub max_y: u32,
}

impl BoundingBox {
    /// Width in pixels.
    pub fn width(self) -> u32 {
        self.max_x - self.min_x + 1
    }

    /// Height in pixels.
    pub fn height(self) -> u32 {
        self.max_y - self.min_y + 1
    }
}

/// Tight bounds of every pixel with alpha `>= min_alpha`.
pub fn bounding_box(mask: &AlphaMask, min_alpha: u8) -> Option<BoundingBox> {
    let mut bbox: Option<BoundingBox> = None;
    for y in 0..mask.height {
        for x in 0..mask.width {
            if mask.get(x, y) < min_alpha {
                continue;
            }
            bbox = Some(match bbox {
                None => BoundingBox {
                    min_x: x,
                    min_y: y,
                    max_x: x,
                    max_y: y,
                },
                Some(b) => BoundingBox {
                    min_x: b.min_x.min(x),
                    min_y: b.min_y.min(y),
                    max_x: b.max_x.max(x),
                    max_y: b.max_y.max(y),
                },
            });
        }
    }
    bbox
}

/// Lowest pixel with alpha `>= min_alpha` in each column of `bbox`, ordered by x.
///
/// Columns without any such pixel contribute nothing.
pub fn bottom_contour(mask: &AlphaMask, bbox: BoundingBox, min_alpha: u8) -> Vec<Point> {
    let mut points = Vec::with_capacity(bbox.width() as usize);
    for x in bbox.min_x..=bbox.max_x {
        let lowest = (bbox.min_y..=bbox.max_y)
            .rev()
            .find(|&y| mask.get(x, y) >= min_alpha);
        if let Some(y) = lowest {
            points.push(Point::new(f64::from(x), f64::from(y)));
        }
    }
    points
}

#[cfg(test)]
#[path = "../../tests/unit/analysis/contour.rs"]
mod tests;
