// Logical screen coordinates <-> physical buffer index.
//
// The display stores pixels column-major with a 90° rotation: each logical
// column `x` is one contiguous run of `height` cells, and inside it the rows
// are stored bottom-up. Every buffer in the crate (layers, mask, composite,
// eye views) is addressed through a `Layout`, so they all stay pixel-aligned.

/// Logical width of the touch screen.
pub const SCREEN_WIDTH: usize = 320;
/// Logical height of every screen.
pub const SCREEN_HEIGHT: usize = 240;
/// Logical width of the stereo (top) screen.
pub const STEREO_WIDTH: usize = 400;

/// Logical dimensions of one rotated buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub width: usize,
    pub height: usize,
}

impl Layout {
    /// The 320x240 touch-screen canvas.
    pub const SCREEN: Layout = Layout { width: SCREEN_WIDTH, height: SCREEN_HEIGHT };
    /// The 400x240 stereo frame (one per eye).
    pub const STEREO: Layout = Layout { width: STEREO_WIDTH, height: SCREEN_HEIGHT };

    /// Number of cells (pixels) in the buffer.
    #[inline]
    pub const fn len(&self) -> usize {
        self.width * self.height
    }

    #[inline]
    pub const fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    /// Map a logical `(x, y)` to its cell index. `None` outside the screen.
    #[inline]
    pub fn to_buffer(&self, x: i32, y: i32) -> Option<usize> {
        if !self.contains(x, y) {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        Some(x * self.height + (self.height - 1 - y))
    }

    /// Inverse of [`Layout::to_buffer`].
    #[inline]
    pub fn from_buffer(&self, index: usize) -> Option<(i32, i32)> {
        if index >= self.len() {
            return None;
        }
        let x = index / self.height;
        let y = self.height - 1 - index % self.height;
        Some((x as i32, y as i32))
    }
}
