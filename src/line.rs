// Continuous strokes from sparse touch samples.
// Touch is sampled once per frame, so a fast swipe lands points far apart;
// stamping the brush at every integer point between them closes the gaps.

use crate::brush::{BrushShape, apply_brush};
use crate::types::EraseMask;

/// Integer points from `(x0,y0)` to `(x1,y1)` inclusive (Bresenham).
/// Consecutive points differ by at most one step on each axis.
pub fn line_points(x0: i32, y0: i32, x1: i32, y1: i32) -> impl Iterator<Item = (i32, i32)> {
    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    let (mut x, mut y) = (x0, y0);
    let mut done = false;

    std::iter::from_fn(move || {
        if done {
            return None;
        }
        let point = (x, y);
        if x == x1 && y == y1 {
            done = true;
        } else {
            let e2 = 2 * err;
            if e2 >= dy { err += dy; x += sx; }
            if e2 <= dx { err += dx; y += sy; }
        }
        Some(point)
    })
}

/// Stamp the brush at every point of the segment `p0 → p1`.
pub fn stroke_line(
    mask: &mut EraseMask,
    p0: (i32, i32),
    p1: (i32, i32),
    radius: i32,
    shape: BrushShape,
) {
    for (x, y) in line_points(p0.0, p0.1, p1.0, p1.1) {
        apply_brush(mask, x, y, radius, shape);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapper::Layout;

    #[test]
    fn zero_length_equals_single_dab() {
        for shape in [BrushShape::Circle, BrushShape::Square, BrushShape::Soft] {
            let mut stroked = EraseMask::new(Layout::SCREEN);
            stroke_line(&mut stroked, (0, 0), (0, 0), 4, shape);
            let mut dabbed = EraseMask::new(Layout::SCREEN);
            apply_brush(&mut dabbed, 0, 0, 4, shape);
            assert_eq!(stroked, dabbed);
        }
    }

    #[test]
    fn visits_both_endpoints_without_gaps() {
        let cases = [
            ((0, 0), (10, 3)),
            ((10, 3), (0, 0)),
            ((5, 40), (7, 2)),
            ((300, 10), (20, 200)),
            ((-3, -3), (4, 9)),
        ];
        for ((x0, y0), (x1, y1)) in cases {
            let pts: Vec<_> = line_points(x0, y0, x1, y1).collect();
            assert_eq!(pts.first(), Some(&(x0, y0)));
            assert_eq!(pts.last(), Some(&(x1, y1)));
            let major = (x1 - x0).abs().max((y1 - y0).abs()) as usize;
            assert_eq!(pts.len(), major + 1);
            for pair in pts.windows(2) {
                let (a, b) = (pair[0], pair[1]);
                assert!((a.0 - b.0).abs() <= 1 && (a.1 - b.1).abs() <= 1);
            }
        }
    }

    #[test]
    fn fast_swipe_leaves_no_holes() {
        let mut mask = EraseMask::new(Layout::SCREEN);
        stroke_line(&mut mask, (20, 100), (120, 100), 1, BrushShape::Circle);
        for x in 20..=120 {
            assert_eq!(mask.get(x, 100), Some(0));
        }
        assert_eq!(mask.get(122, 100), Some(255));
    }
}
