// Abstract input the engine consumes once per frame.
// Whatever produces it (a window, a test script, a device) only has to
// report button edges, the stick and the touch point.

use std::collections::VecDeque;

/// Discrete "pressed this frame" actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    ClearCanvas,
    CycleStyle,
    CycleBrushShape,
    Export,
    NextColor,
    PrevColor,
    IncreaseBrushSize,
    DecreaseBrushSize,
    Undo,
    Redo,
}

/// Everything that happened during one frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameInput {
    /// Buttons whose press edge fell in this frame.
    pub pressed: Vec<Button>,
    /// Raw stick position; only the vertical axis drives depth.
    pub stick: (i32, i32),
    /// Touch point while in contact, `None` once the contact is lifted.
    pub touch: Option<(i32, i32)>,
}

impl FrameInput {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn press(button: Button) -> Self {
        Self { pressed: vec![button], ..Self::default() }
    }

    pub fn touch(x: i32, y: i32) -> Self {
        Self { touch: Some((x, y)), ..Self::default() }
    }

    pub fn stick(dx: i32, dy: i32) -> Self {
        Self { stick: (dx, dy), ..Self::default() }
    }

    pub fn is_pressed(&self, button: Button) -> bool {
        self.pressed.contains(&button)
    }
}

/// Source of per-frame input. Returning `None` is the exit signal.
pub trait InputSource {
    fn poll(&mut self) -> Option<FrameInput>;
}

/// Replays a fixed list of frames, then asks the loop to exit.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    frames: VecDeque<FrameInput>,
}

impl ScriptedInput {
    pub fn new(frames: impl IntoIterator<Item = FrameInput>) -> Self {
        Self { frames: frames.into_iter().collect() }
    }

    pub fn push(&mut self, frame: FrameInput) {
        self.frames.push_back(frame);
    }

    /// A contact-down gesture through `points`, followed by a lift frame.
    pub fn gesture(&mut self, points: &[(i32, i32)]) {
        for &(x, y) in points {
            self.push(FrameInput::touch(x, y));
        }
        self.push(FrameInput::idle());
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self) -> Option<FrameInput> {
        self.frames.pop_front()
    }
}
