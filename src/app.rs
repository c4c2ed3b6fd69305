// Frame-synchronous main loop: poll input, step the engine, present, wait
// for the next vertical blank. Single-threaded; the exit signal is checked
// once per iteration.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::engine::Engine;
use crate::error::Result;
use crate::input::{FrameInput, InputSource};
use crate::stereo::EyePair;
use crate::types::Frame;

/// Where finished frames go.
pub trait Display {
    /// Hand over the touch-screen image and both eye views of this frame.
    fn present(&mut self, touch_screen: &Frame, eyes: &EyePair) -> Result<()>;

    /// Block until the display is ready for the next frame.
    fn wait_for_vblank(&mut self) -> Result<()>;
}

/// An input source and a display that live in separate values
/// (scripted tests, headless runs).
#[derive(Debug, Default)]
pub struct Split<I, D> {
    pub input: I,
    pub display: D,
}

impl<I: InputSource, D> InputSource for Split<I, D> {
    fn poll(&mut self) -> Option<FrameInput> {
        self.input.poll()
    }
}

impl<I, D: Display> Display for Split<I, D> {
    fn present(&mut self, touch_screen: &Frame, eyes: &EyePair) -> Result<()> {
        self.display.present(touch_screen, eyes)
    }

    fn wait_for_vblank(&mut self) -> Result<()> {
        self.display.wait_for_vblank()
    }
}

/// Run until the front-end signals exit. Returns the number of frames processed.
pub fn run<F>(engine: &mut Engine, frontend: &mut F) -> Result<u64>
where
    F: InputSource + Display + ?Sized,
{
    let mut frames: u64 = 0;
    let mut last_fps_time = Instant::now();
    let mut frames_this_second: u32 = 0;

    while let Some(frame_input) = frontend.poll() {
        engine.step(&frame_input);
        frontend.present(engine.composite(), engine.eyes())?;
        frontend.wait_for_vblank()?;
        frames += 1;

        frames_this_second += 1;
        let now = Instant::now();
        if now.duration_since(last_fps_time) >= Duration::from_secs(1) {
            let fps = frames_this_second as f32 / now.duration_since(last_fps_time).as_secs_f32();
            debug!("FPS: {fps:.1}");
            frames_this_second = 0;
            last_fps_time = now;
        }
    }

    Ok(frames)
}
