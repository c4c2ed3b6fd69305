// End-to-end sessions: scripted input through the frame loop.

use sqribble::app::{self, Display, Split};
use sqribble::config::Config;
use sqribble::input::{Button, FrameInput, ScriptedInput};
use sqribble::stereo::EyePair;
use sqribble::types::{Frame, OPAQUE};
use sqribble::{Engine, Result};

/// Keeps the last presented frames and counts vblank waits.
#[derive(Default)]
struct Recorder {
    last: Option<(Frame, EyePair)>,
    presented: usize,
    vblanks: usize,
}

impl Display for Recorder {
    fn present(&mut self, touch_screen: &Frame, eyes: &EyePair) -> Result<()> {
        self.last = Some((touch_screen.clone(), eyes.clone()));
        self.presented += 1;
        Ok(())
    }

    fn wait_for_vblank(&mut self) -> Result<()> {
        self.vblanks += 1;
        Ok(())
    }
}

fn session(input: ScriptedInput) -> (Engine, Recorder, u64) {
    let mut engine = Engine::new(&Config::default());
    let mut frontend = Split { input, display: Recorder::default() };
    let frames = app::run(&mut engine, &mut frontend).unwrap();
    (engine, frontend.display, frames)
}

#[test]
fn loop_presents_once_per_frame_and_exits() {
    let mut input = ScriptedInput::default();
    input.gesture(&[(10, 10), (200, 150)]);
    let (engine, recorder, frames) = session(input);

    assert_eq!(frames, 3);
    assert_eq!(recorder.presented, 3);
    assert_eq!(recorder.vblanks, 3);
    let (touch_screen, _) = recorder.last.unwrap();
    assert_eq!(&touch_screen, engine.composite());
}

#[test]
fn scratched_line_reveals_hidden_layer() {
    let mut input = ScriptedInput::default();
    input.gesture(&[(20, 120), (300, 120)]);
    let (engine, _, _) = session(input);

    let hidden = &engine.canvas().hidden;
    for x in 20..=300 {
        assert_eq!(engine.mask().get(x, 120), Some(0));
        assert_eq!(engine.composite().get(x, 120), hidden.get(x, 120));
    }
    assert_eq!(engine.composite().get(100, 10), engine.canvas().overlay.get(100, 10));
}

#[test]
fn two_gestures_undo_separately() {
    let mut input = ScriptedInput::default();
    input.gesture(&[(50, 50)]);
    input.gesture(&[(150, 150)]);
    input.push(FrameInput::press(Button::Undo));
    let (engine, _, _) = session(input);

    assert_eq!(engine.mask().get(50, 50), Some(0));
    assert_eq!(engine.mask().get(150, 150), Some(OPAQUE));
    assert_eq!(engine.history().undo_depth(), 1);
    assert_eq!(engine.history().redo_depth(), 1);
}

#[test]
fn right_eye_pops_unscratched_regions() {
    let mut input = ScriptedInput::default();
    // depth 3.0 → 10.0 over 7 frames of full stick
    for _ in 0..7 {
        input.push(FrameInput::stick(0, -1000));
    }
    input.gesture(&[(100, 100)]);
    let (engine, recorder, _) = session(input);
    assert_eq!(engine.style().depth.pixels(), 10);

    let (screen, eyes) = recorder.last.unwrap();
    // still-opaque pixel at x=10: left at 50, right shifted to 60
    assert_eq!(eyes.left.get(50, 10), screen.get(10, 10));
    assert_eq!(eyes.right.get(60, 10), screen.get(10, 10));
    // erased centre of the dab stays at the same column in both eyes
    assert_eq!(eyes.left.get(140, 100), screen.get(100, 100));
    assert_eq!(eyes.right.get(140, 100), screen.get(100, 100));
}

#[test]
fn style_and_brush_buttons_apply_in_loop() {
    let input = ScriptedInput::new([
        FrameInput::press(Button::CycleStyle),
        FrameInput::press(Button::CycleBrushShape),
        FrameInput::press(Button::CycleBrushShape),
        FrameInput::press(Button::IncreaseBrushSize),
        FrameInput::press(Button::NextColor),
    ]);
    let (engine, _, _) = session(input);
    let style = engine.style();
    assert_eq!(style.mode, sqribble::pattern::DrawingMode::SolidOnWhite);
    assert_eq!(style.shape, sqribble::brush::BrushShape::Soft);
    assert_eq!(style.radius, 6);
    assert_eq!(style.color_index, 1);
    assert!(engine.mask().alpha.iter().all(|&a| a == OPAQUE));
}
