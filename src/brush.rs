// One brush dab on the erase mask.
// Visual: the overlay disappears under the dab and the hidden layer shows through.

use serde::Deserialize;

use crate::types::EraseMask;

pub const MIN_RADIUS: i32 = 1;
pub const MAX_RADIUS: i32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BrushShape {
    /// Hard round tip.
    #[default]
    Circle,
    /// Hard tip covering the whole bounding box.
    Square,
    /// Round tip with a quadratic feathered edge.
    Soft,
}

impl BrushShape {
    pub fn next(self) -> Self {
        match self {
            BrushShape::Circle => BrushShape::Square,
            BrushShape::Square => BrushShape::Soft,
            BrushShape::Soft => BrushShape::Circle,
        }
    }

    /// Alpha this shape wants at offset `(dx, dy)`, or `None` if the offset is
    /// outside the tip. `current` is the alpha already in the mask.
    #[inline]
    pub fn coverage(self, dx: i32, dy: i32, radius: i32, current: u8) -> Option<u8> {
        match self {
            BrushShape::Circle => circle(dx, dy, radius),
            BrushShape::Square => Some(0),
            BrushShape::Soft => soft(dx, dy, radius, current),
        }
    }
}

#[inline]
fn circle(dx: i32, dy: i32, radius: i32) -> Option<u8> {
    (dx * dx + dy * dy <= radius * radius).then_some(0)
}

/// Quadratic falloff from the center; never raises an alpha that is already lower,
/// so repeated soft strokes only ever erase further.
#[inline]
fn soft(dx: i32, dy: i32, radius: i32, current: u8) -> Option<u8> {
    let d = ((dx * dx + dy * dy) as f32).sqrt();
    if d > radius as f32 {
        return None;
    }
    let t = if radius > 0 { d / radius as f32 } else { 0.0 };
    let target = (255.0 * t * t).round().clamp(0.0, 255.0) as u8;
    Some(target.min(current))
}

/// Apply one dab centred at logical `(cx, cy)`. `radius` is clamped to `0..=MAX_RADIUS`.
///
/// A centre outside the screen does nothing. Covered columns outside the
/// screen and rows past the bottom edge are skipped; rows above the top edge
/// fold onto row 0 so strokes hugging the top border leave no seam.
pub fn apply_brush(mask: &mut EraseMask, cx: i32, cy: i32, radius: i32, shape: BrushShape) {
    let layout = mask.layout;
    if !layout.contains(cx, cy) {
        return;
    }
    let r = radius.clamp(0, MAX_RADIUS);
    let (w, h) = (layout.width as i32, layout.height as i32);

    for dx in -r..=r {
        for dy in -r..=r {
            let px = cx + dx;
            let py = cy + dy;
            if px < 0 || px >= w || py >= h {
                continue;
            }
            let Some(idx) = layout.to_buffer(px, py.max(0)) else { continue };
            if let Some(alpha) = shape.coverage(dx, dy, r, mask.alpha[idx]) {
                mask.alpha[idx] = alpha;
            }
        }
    }
}
