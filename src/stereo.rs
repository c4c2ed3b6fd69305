// Stereoscopic preview: a left/right eye pair derived from the composited
// frame. Regions that are still mostly overlay are shifted in the right eye,
// so they pop out of the screen; erased regions stay at screen depth.

use crate::error::{Error, Result};
use crate::mapper::Layout;
use crate::types::{EraseMask, Frame};

/// Mask alpha above which a pixel counts as foreground.
pub const FOREGROUND_THRESHOLD: u8 = 128;

pub const MIN_DEPTH: f32 = -10.0;
pub const MAX_DEPTH: f32 = 15.0;
pub const DEFAULT_DEPTH: f32 = 3.0;

/// Stick values with |v| at or below this are ignored.
pub const STICK_DEADZONE: i32 = 20;
/// Stick units per pixel of depth.
const STICK_SCALE: f32 = 1000.0;

/// Bounded float accumulator driven by the stick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthOffset(f32);

impl Default for DepthOffset {
    fn default() -> Self {
        Self(DEFAULT_DEPTH)
    }
}

impl DepthOffset {
    pub fn new(value: f32) -> Self {
        Self(value.clamp(MIN_DEPTH, MAX_DEPTH))
    }

    pub fn value(self) -> f32 {
        self.0
    }

    /// Accumulate one frame of vertical stick input. Pushing up (negative) deepens.
    pub fn apply_stick(&mut self, dy: i32) {
        if dy.unsigned_abs() <= STICK_DEADZONE.unsigned_abs() {
            return;
        }
        self.0 = (self.0 - dy as f32 / STICK_SCALE).clamp(MIN_DEPTH, MAX_DEPTH);
    }

    /// Whole-pixel shift used for rendering (truncated toward zero).
    pub fn pixels(self) -> i32 {
        self.0 as i32
    }
}

/// Both eye views, each on the wider letterboxed stereo layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EyePair {
    pub left: Frame,
    pub right: Frame,
}

impl Default for EyePair {
    fn default() -> Self {
        Self { left: Frame::new(Layout::STEREO), right: Frame::new(Layout::STEREO) }
    }
}

impl EyePair {
    /// Render both eyes from `frame` and `mask`, shifting foreground in the right eye by `shift` columns.
    pub fn render(&mut self, frame: &Frame, mask: &EraseMask, shift: i32) -> Result<()> {
        if mask.layout != frame.layout {
            return Err(Error::LayoutMismatch("stereo: mask"));
        }
        let src = frame.layout;
        let dst = self.left.layout;
        if self.right.layout != dst || dst.height != src.height || dst.width < src.width {
            return Err(Error::LayoutMismatch("stereo: eye frames"));
        }
        let pad = ((dst.width - src.width) / 2) as i32;

        self.left.pixels.fill(0);
        self.right.pixels.fill(0);

        for x in 0..src.width as i32 {
            for y in 0..src.height as i32 {
                let Some(idx) = src.to_buffer(x, y) else { continue };
                let color = frame.cell(idx);
                self.left.put(x + pad, y, color);

                let dx = if mask.alpha[idx] > FOREGROUND_THRESHOLD { shift } else { 0 };
                // Columns pushed past the frame edges are dropped by `put`.
                self.right.put(x + pad + dx, y, color);
            }
        }
        Ok(())
    }
}
