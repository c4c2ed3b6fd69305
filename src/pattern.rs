// Procedural layers: what you see before scratching (overlay) and what the
// scratching reveals (hidden). Both are regenerated whole whenever the
// style changes; the same inputs always produce the same bytes.

use serde::Deserialize;

use crate::mapper::Layout;
use crate::types::{Frame, Rgb};

/// Canvas flat color of `SolidOnBlack` (not pure black, so strokes read as "dark canvas").
pub const DARK_CANVAS: Rgb = Rgb::grey(20);

/// Which pair of layers the canvas shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DrawingMode {
    /// Checkerboard of active color and black.
    CheckerboardOnBlack,
    /// Checkerboard of active color and white.
    #[default]
    CheckerboardOnWhite,
    /// White canvas, strokes reveal the active color.
    SolidOnWhite,
    /// Dark canvas, strokes reveal the active color.
    SolidOnBlack,
}

impl DrawingMode {
    pub const ALL: [DrawingMode; 4] = [
        DrawingMode::CheckerboardOnBlack,
        DrawingMode::CheckerboardOnWhite,
        DrawingMode::SolidOnWhite,
        DrawingMode::SolidOnBlack,
    ];

    /// Next mode in cycle order (wraps).
    pub fn next(self) -> Self {
        let i = Self::ALL.iter().position(|&m| m == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    /// Background constant of the checkerboard styles.
    fn checker_background(self) -> Rgb {
        match self {
            DrawingMode::CheckerboardOnBlack => Rgb::BLACK,
            _ => Rgb::WHITE,
        }
    }

    pub fn is_checkerboard(self) -> bool {
        matches!(self, DrawingMode::CheckerboardOnBlack | DrawingMode::CheckerboardOnWhite)
    }
}

/// Fixed, ordered list of colors the user cycles through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<Rgb>,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: vec![
                Rgb::new(65, 105, 225), // royal blue
                Rgb::new(138, 43, 226), // blue violet
                Rgb::new(220, 20, 60),  // crimson
                Rgb::new(255, 140, 0),  // dark orange
                Rgb::new(255, 215, 0),  // gold
                Rgb::new(34, 139, 34),  // forest green
            ],
        }
    }
}

impl Palette {
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Color at a cyclic index.
    pub fn color(&self, index: usize) -> Rgb {
        self.colors[index % self.colors.len()]
    }

    pub fn next_index(&self, index: usize) -> usize {
        (index + 1) % self.colors.len()
    }

    pub fn prev_index(&self, index: usize) -> usize {
        (index + self.colors.len() - 1) % self.colors.len()
    }
}

/// Inputs that fully determine both layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternParams {
    pub mode: DrawingMode,
    pub color: Rgb,
    pub cell_size: usize,
}

impl PatternParams {
    pub fn new(mode: DrawingMode, palette: &Palette, color_index: usize, cell_size: usize) -> Self {
        Self { mode, color: palette.color(color_index), cell_size: cell_size.max(1) }
    }

    #[inline]
    fn checker(&self, x: usize, y: usize) -> Rgb {
        let (cell_x, cell_y) = (x / self.cell_size, y / self.cell_size);
        if (cell_x + cell_y) % 2 == 1 { self.color } else { self.mode.checker_background() }
    }
}

/// Build the visible top layer.
pub fn generate_overlay(layout: Layout, params: &PatternParams) -> Frame {
    let mut frame = Frame::new(layout);
    for x in 0..layout.width {
        for y in 0..layout.height {
            let color = match params.mode {
                DrawingMode::SolidOnWhite => Rgb::WHITE,
                DrawingMode::SolidOnBlack => DARK_CANVAS,
                _ => params.checker(x, y),
            };
            frame.put(x as i32, y as i32, color);
        }
    }
    frame
}

/// Build the hidden layer. The checkerboard is sampled at `(y, W-1-x)`, a
/// quarter turn from the overlay, so the revealed grid reads as a different one.
pub fn generate_hidden(layout: Layout, params: &PatternParams) -> Frame {
    let mut frame = Frame::new(layout);
    for x in 0..layout.width {
        for y in 0..layout.height {
            let color = if params.mode.is_checkerboard() {
                params.checker(y, layout.width - 1 - x)
            } else {
                params.color
            };
            frame.put(x as i32, y as i32, color);
        }
    }
    frame
}
