// The engine context: canvas layers, erase mask, history and style, all
// owned by one value and mutated only through `step` (once per frame) or the
// explicit import/export calls. Nothing here is shared across threads.

use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};
use tracing::{debug, info, warn};

use crate::brush::{BrushShape, MAX_RADIUS, MIN_RADIUS};
use crate::codec;
use crate::composite::composite;
use crate::config::Config;
use crate::error::Result;
use crate::history::History;
use crate::input::{Button, FrameInput};
use crate::line::stroke_line;
use crate::mapper::Layout;
use crate::pattern::{DrawingMode, Palette, PatternParams, generate_hidden, generate_overlay};
use crate::stereo::{DepthOffset, EyePair};
use crate::types::{Canvas, EraseMask, Frame, OPAQUE};

/// User-adjustable style. Changing mode or color regenerates the canvas;
/// none of it touches the erase mask.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Style {
    pub mode: DrawingMode,
    pub color_index: usize,
    pub shape: BrushShape,
    pub radius: i32,
    pub depth: DepthOffset,
}

/// What a frame did that the caller may want to surface.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameReport {
    /// Where the export of this frame landed.
    pub exported: Option<PathBuf>,
    /// An export was requested but could not be written.
    pub export_failed: bool,
    /// A stroke is in progress after this frame.
    pub stroking: bool,
}

pub struct Engine {
    palette: Palette,
    cell_size: usize,
    initial_depth: DepthOffset,
    storage_root: PathBuf,

    style: Style,
    canvas: Canvas,
    mask: EraseMask,
    history: History,

    /// Last touch of the current gesture.
    cursor: Option<(i32, i32)>,
    drawing_permitted: bool,
    /// Contact has been lifted since drawing was last permitted.
    armed: bool,

    composite: Frame,
    eyes: EyePair,
}

impl Engine {
    pub fn new(config: &Config) -> Self {
        let config = config.clone().sanitized();
        let initial_depth = DepthOffset::new(config.depth_offset);
        let mut engine = Self {
            palette: Palette::default(),
            cell_size: config.cell_size,
            initial_depth,
            storage_root: config.storage_root,
            style: Style {
                mode: config.mode,
                color_index: 0,
                shape: config.brush_shape,
                radius: config.brush_radius,
                depth: initial_depth,
            },
            canvas: Canvas::new(Layout::SCREEN),
            mask: EraseMask::new(Layout::SCREEN),
            history: History::new(config.history_capacity),
            cursor: None,
            drawing_permitted: true,
            armed: true,
            composite: Frame::new(Layout::SCREEN),
            eyes: EyePair::default(),
        };
        engine.regenerate();
        engine.render();
        engine
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn mask(&self) -> &EraseMask {
        &self.mask
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// The touch-screen image as of the last rendered frame.
    pub fn composite(&self) -> &Frame {
        &self.composite
    }

    pub fn eyes(&self) -> &EyePair {
        &self.eyes
    }

    pub fn storage_root(&self) -> &Path {
        &self.storage_root
    }

    /// Gate drawing, e.g. while a help screen covers the canvas. Re-enabling
    /// waits for the current contact (if any) to lift before painting again.
    pub fn set_drawing_permitted(&mut self, permitted: bool) {
        if permitted && !self.drawing_permitted {
            self.armed = false;
        }
        if !permitted {
            self.end_stroke();
        }
        self.drawing_permitted = permitted;
    }

    /// Process one frame of input at the current local time.
    pub fn step(&mut self, input: &FrameInput) -> FrameReport {
        self.step_at(input, Local::now().naive_local())
    }

    /// Process one frame of input; `now` names any export made this frame.
    pub fn step_at(&mut self, input: &FrameInput, now: NaiveDateTime) -> FrameReport {
        let mut report = FrameReport::default();

        if input.is_pressed(Button::ClearCanvas) {
            self.clear();
        }
        if input.is_pressed(Button::CycleStyle) {
            self.style.mode = self.style.mode.next();
            info!(mode = ?self.style.mode, "canvas style");
            self.regenerate();
        }
        if input.is_pressed(Button::CycleBrushShape) {
            self.style.shape = self.style.shape.next();
            info!(shape = ?self.style.shape, "brush shape");
        }
        if input.is_pressed(Button::Export) {
            self.render();
            match self.export_at(now) {
                Ok(path) => report.exported = Some(path),
                Err(_) => report.export_failed = true,
            }
        }
        if input.is_pressed(Button::NextColor) {
            self.style.color_index = self.palette.next_index(self.style.color_index);
            info!(color = self.style.color_index, "palette color");
            self.regenerate();
        }
        if input.is_pressed(Button::PrevColor) {
            self.style.color_index = self.palette.prev_index(self.style.color_index);
            info!(color = self.style.color_index, "palette color");
            self.regenerate();
        }
        if input.is_pressed(Button::IncreaseBrushSize) {
            self.set_radius(self.style.radius + 1);
        }
        if input.is_pressed(Button::DecreaseBrushSize) {
            self.set_radius(self.style.radius - 1);
        }

        self.style.depth.apply_stick(input.stick.1);

        if input.is_pressed(Button::Undo) && self.history.undo(&mut self.mask) {
            debug!(left = self.history.undo_depth(), "undo");
        }
        if input.is_pressed(Button::Redo) && self.history.redo(&mut self.mask) {
            debug!(left = self.history.redo_depth(), "redo");
        }

        self.handle_touch(input.touch);
        report.stroking = self.cursor.is_some();

        self.render();
        report
    }

    fn handle_touch(&mut self, touch: Option<(i32, i32)>) {
        let Some(point) = touch else {
            self.end_stroke();
            self.armed = true;
            return;
        };
        if !self.drawing_permitted || !self.armed {
            return;
        }

        // One snapshot per gesture, so one undo reverts the whole stroke.
        // A gesture only starts on a sample that lands on the canvas.
        let from = match self.cursor {
            Some(prev) => prev,
            None if !self.mask.layout.contains(point.0, point.1) => return,
            None => {
                self.history.snapshot(&self.mask);
                debug!(x = point.0, y = point.1, "stroke start");
                point
            }
        };
        stroke_line(&mut self.mask, from, point, self.style.radius, self.style.shape);
        self.cursor = Some(point);
    }

    fn end_stroke(&mut self) {
        if self.cursor.take().is_some() {
            debug!("stroke end");
        }
    }

    fn set_radius(&mut self, radius: i32) {
        self.style.radius = radius.clamp(MIN_RADIUS, MAX_RADIUS);
        debug!(radius = self.style.radius, "brush size");
    }

    /// Reset the mask to fully un-scratched (undoable) and restore the initial depth.
    pub fn clear(&mut self) {
        self.history.snapshot(&self.mask);
        self.mask.fill(OPAQUE);
        self.style.depth = self.initial_depth;
        info!("canvas cleared");
    }

    /// Rebuild both layers from the current style.
    pub fn regenerate(&mut self) {
        let params =
            PatternParams::new(self.style.mode, &self.palette, self.style.color_index, self.cell_size);
        self.canvas.overlay = generate_overlay(Layout::SCREEN, &params);
        self.canvas.hidden = generate_hidden(Layout::SCREEN, &params);
    }

    /// Composite the layers and derive both eye views.
    pub fn render(&mut self) {
        // Every buffer here is built on Layout::SCREEN / STEREO, so neither call can mismatch.
        let composed = composite(&mut self.composite, &self.canvas.hidden, &self.canvas.overlay, &self.mask);
        let eyes = composed.and_then(|()| self.eyes.render(&self.composite, &self.mask, self.style.depth.pixels()));
        if let Err(e) = eyes {
            warn!("render skipped: {e}");
        }
    }

    /// Write the current composite under the storage root.
    pub fn export_at(&self, now: NaiveDateTime) -> Result<PathBuf> {
        match codec::export(&self.storage_root, &self.composite, now) {
            Ok(path) => {
                info!(path = %path.display(), "exported");
                Ok(path)
            }
            Err(e) => {
                warn!("export failed: {e}");
                Err(e)
            }
        }
    }

    /// Load a bitmap into both layers. On failure nothing changes.
    pub fn import(&mut self, path: &Path) -> Result<()> {
        let frame = codec::read_bmp(path).inspect_err(|e| warn!("import failed: {e}"))?;
        self.canvas.hidden = frame.clone();
        self.canvas.overlay = frame;
        info!(path = %path.display(), "imported");
        self.render();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Rgb;

    fn engine() -> Engine {
        Engine::new(&Config::default())
    }

    #[test]
    fn starts_opaque_showing_overlay() {
        let engine = engine();
        assert!(engine.mask().alpha.iter().all(|&a| a == OPAQUE));
        assert_eq!(engine.composite(), &engine.canvas().overlay);
        assert_eq!(engine.style().mode, DrawingMode::CheckerboardOnWhite);
    }

    #[test]
    fn gesture_is_one_undo_step() {
        let mut engine = engine();
        let before = engine.mask().clone();
        engine.step(&FrameInput::touch(50, 50));
        engine.step(&FrameInput::touch(90, 60));
        engine.step(&FrameInput::touch(120, 100));
        engine.step(&FrameInput::idle());
        assert_eq!(engine.history().undo_depth(), 1);
        assert_eq!(engine.mask().get(70, 55), Some(0));

        engine.step(&FrameInput::press(Button::Undo));
        assert_eq!(engine.mask(), &before);
    }

    #[test]
    fn style_change_keeps_mask() {
        let mut engine = engine();
        engine.step(&FrameInput::touch(10, 10));
        engine.step(&FrameInput::idle());
        let mask = engine.mask().clone();
        let overlay = engine.canvas().overlay.clone();

        engine.step(&FrameInput::press(Button::CycleStyle));
        assert_eq!(engine.mask(), &mask);
        assert_ne!(engine.canvas().overlay, overlay);
        assert_eq!(engine.canvas().overlay.get(0, 0), Some(Rgb::WHITE));
    }

    #[test]
    fn color_cycles_regenerate_layers() {
        let mut engine = engine();
        engine.step(&FrameInput::press(Button::PrevColor));
        assert_eq!(engine.style().color_index, 5);
        let green = Palette::default().color(5);
        assert_eq!(engine.canvas().overlay.get(20, 0), Some(green));
        engine.step(&FrameInput::press(Button::NextColor));
        assert_eq!(engine.style().color_index, 0);
    }

    #[test]
    fn brush_size_is_clamped() {
        let mut engine = engine();
        for _ in 0..10 {
            engine.step(&FrameInput::press(Button::DecreaseBrushSize));
        }
        assert_eq!(engine.style().radius, MIN_RADIUS);
        for _ in 0..60 {
            engine.step(&FrameInput::press(Button::IncreaseBrushSize));
        }
        assert_eq!(engine.style().radius, MAX_RADIUS);
    }

    #[test]
    fn clear_is_undoable_and_resets_depth() {
        let mut engine = engine();
        engine.step(&FrameInput::touch(100, 100));
        engine.step(&FrameInput::idle());
        engine.step(&FrameInput::stick(0, -1000));
        assert_eq!(engine.style().depth.value(), 4.0);
        let scratched = engine.mask().clone();

        engine.step(&FrameInput::press(Button::ClearCanvas));
        assert!(engine.mask().alpha.iter().all(|&a| a == OPAQUE));
        assert_eq!(engine.style().depth.value(), 3.0);

        engine.step(&FrameInput::press(Button::Undo));
        assert_eq!(engine.mask(), &scratched);
    }

    #[test]
    fn redo_after_undo_restores_stroke() {
        let mut engine = engine();
        engine.step(&FrameInput::touch(30, 30));
        engine.step(&FrameInput::idle());
        let stroked = engine.mask().clone();
        engine.step(&FrameInput::press(Button::Undo));
        engine.step(&FrameInput::press(Button::Redo));
        assert_eq!(engine.mask(), &stroked);
    }

    #[test]
    fn drawing_waits_for_lift_after_reenable() {
        let mut engine = engine();
        engine.set_drawing_permitted(false);
        engine.step(&FrameInput::touch(40, 40));
        engine.set_drawing_permitted(true);
        // the same contact continues: still not painting
        engine.step(&FrameInput::touch(40, 40));
        assert_eq!(engine.mask().get(40, 40), Some(OPAQUE));

        engine.step(&FrameInput::idle());
        engine.step(&FrameInput::touch(40, 40));
        assert_eq!(engine.mask().get(40, 40), Some(0));
    }

    #[test]
    fn off_screen_touch_is_harmless() {
        let mut engine = engine();
        engine.step(&FrameInput::touch(10, 10));
        engine.step(&FrameInput::idle());
        engine.step(&FrameInput::press(Button::Undo));
        assert_eq!((engine.history().undo_depth(), engine.history().redo_depth()), (0, 1));

        let report = engine.step(&FrameInput::touch(-50, 500));
        assert!(!report.stroking);
        engine.step(&FrameInput::idle());
        assert!(engine.mask().alpha.iter().all(|&a| a == OPAQUE));
        assert_eq!((engine.history().undo_depth(), engine.history().redo_depth()), (0, 1));
    }

    #[test]
    fn gesture_entering_canvas_starts_there() {
        let mut engine = engine();
        engine.step(&FrameInput::touch(-30, 100));
        let report = engine.step(&FrameInput::touch(20, 100));
        assert!(report.stroking);
        engine.step(&FrameInput::touch(60, 100));
        let report = engine.step(&FrameInput::idle());
        assert!(!report.stroking);

        assert_eq!(engine.history().undo_depth(), 1);
        assert_eq!(engine.mask().get(40, 100), Some(0));
        // nothing was interpolated from the off-canvas sample
        assert_eq!(engine.mask().get(10, 100), Some(OPAQUE));
    }

    #[test]
    fn storage_root_comes_from_config() {
        let config = Config { storage_root: "shots".into(), ..Config::default() };
        assert_eq!(Engine::new(&config).storage_root(), Path::new("shots"));
    }

    #[test]
    fn brush_shape_cycles() {
        let mut engine = engine();
        engine.step(&FrameInput::press(Button::CycleBrushShape));
        assert_eq!(engine.style().shape, BrushShape::Square);
    }
}
