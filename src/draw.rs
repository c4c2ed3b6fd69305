// Desktop front-end: one minifb window standing in for the two screens.
// Visual layout:
//   top half    = left eye | right eye (400x240 each)
//   bottom half = the 320x240 touch screen, centered; the mouse draws here.

use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Scale, Window, WindowOptions};

use crate::app::Display;
use crate::error::{Error, Result};
use crate::input::{Button, FrameInput, InputSource};
use crate::line::line_points;
use crate::mapper::{SCREEN_HEIGHT, SCREEN_WIDTH, STEREO_WIDTH};
use crate::stereo::EyePair;
use crate::types::Frame;

pub const WINDOW_WIDTH: usize = STEREO_WIDTH * 2;
pub const WINDOW_HEIGHT: usize = SCREEN_HEIGHT * 2;
/// Top-left corner of the touch panel inside the window.
const PANEL_X: usize = (WINDOW_WIDTH - SCREEN_WIDTH) / 2;
const PANEL_Y: usize = SCREEN_HEIGHT;

/// Stick travel reported while a depth key is held.
const STICK_TRAVEL: i32 = 150;

const KEYMAP: [(Key, Button); 10] = [
    (Key::X, Button::ClearCanvas),
    (Key::B, Button::CycleStyle),
    (Key::A, Button::CycleBrushShape),
    (Key::Y, Button::Export),
    (Key::Right, Button::NextColor),
    (Key::Left, Button::PrevColor),
    (Key::Up, Button::IncreaseBrushSize),
    (Key::Down, Button::DecreaseBrushSize),
    (Key::L, Button::Undo),
    (Key::R, Button::Redo),
];

/// 0x00RRGGBB window buffer.
struct WindowBuffer {
    width: usize,
    height: usize,
    pixels: Vec<u32>,
}

impl WindowBuffer {
    /// Copy a rotated frame into the window with its top-left at `(ox, oy)`.
    fn blit(&mut self, frame: &Frame, ox: usize, oy: usize) {
        for y in 0..frame.layout.height {
            for x in 0..frame.layout.width {
                if let Some(c) = frame.get(x as i32, y as i32) {
                    self.put_pixel((ox + x) as i32, (oy + y) as i32, c.to_u32());
                }
            }
        }
    }

    #[inline]
    fn put_pixel(&mut self, x: i32, y: i32, color: u32) {
        if x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return;
        }
        self.pixels[y * self.width + x] = color;
    }

    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: u32) {
        for (x, y) in line_points(x0, y0, x1, y1) {
            self.put_pixel(x, y, color);
        }
    }

    /// Small "+" with a gap in the middle so the brush spot stays visible.
    fn draw_crosshair(&mut self, cx: i32, cy: i32, size: i32, color: u32) {
        self.draw_line(cx - size, cy, cx - 2, cy, color);
        self.draw_line(cx + 2, cy, cx + size, cy, color);
        self.draw_line(cx, cy - size, cx, cy - 2, color);
        self.draw_line(cx, cy + 2, cx, cy + size, color);
        self.put_pixel(cx, cy, color);
    }
}

pub struct Drawer {
    window: Window,
    buffer: WindowBuffer,
}

impl Drawer {
    /// Open the window. Visual: a black 800x480 (times `scale`) window appears.
    pub fn new(title: &str, scale: u8) -> Result<Self> {
        let options = WindowOptions {
            scale: match scale {
                4 => Scale::X4,
                2 => Scale::X2,
                _ => Scale::X1,
            },
            ..WindowOptions::default()
        };
        let mut window = Window::new(title, WINDOW_WIDTH, WINDOW_HEIGHT, options)
            .map_err(|e| Error::WindowInit(e.to_string()))?;
        // The display refresh the loop paces itself to.
        window.set_target_fps(60);

        Ok(Self {
            window,
            buffer: WindowBuffer {
                width: WINDOW_WIDTH,
                height: WINDOW_HEIGHT,
                pixels: vec![0u32; WINDOW_WIDTH * WINDOW_HEIGHT],
            },
        })
    }

    /// Mouse position in window pixels, if the pointer is over the window.
    fn mouse_pos(&self) -> Option<(i32, i32)> {
        self.window
            .get_mouse_pos(MouseMode::Discard)
            .map(|(x, y)| (x as i32, y as i32))
    }

    /// Touch-panel coordinates of the mouse (may lie outside the panel).
    fn panel_pos(&self) -> Option<(i32, i32)> {
        self.mouse_pos().map(|(x, y)| (x - PANEL_X as i32, y - PANEL_Y as i32))
    }

    fn over_panel(&self) -> bool {
        self.panel_pos().is_some_and(|(x, y)| {
            (0..SCREEN_WIDTH as i32).contains(&x) && (0..SCREEN_HEIGHT as i32).contains(&y)
        })
    }
}

impl InputSource for Drawer {
    fn poll(&mut self) -> Option<FrameInput> {
        if !self.window.is_open() || self.window.is_key_down(Key::Escape) {
            return None;
        }

        let pressed = KEYMAP
            .iter()
            .filter(|(key, _)| self.window.is_key_pressed(*key, KeyRepeat::No))
            .map(|&(_, button)| button)
            .collect();

        let mut dy = 0;
        if self.window.is_key_down(Key::W) {
            dy -= STICK_TRAVEL;
        }
        if self.window.is_key_down(Key::S) {
            dy += STICK_TRAVEL;
        }

        // A press that starts outside the panel still tracks once it moves in;
        // points off the panel are dropped by the brush.
        let touch = if self.window.get_mouse_down(MouseButton::Left) && self.mouse_pos().is_some() {
            self.panel_pos()
        } else {
            None
        };

        Some(FrameInput { pressed, stick: (0, dy), touch })
    }
}

impl Display for Drawer {
    fn present(&mut self, touch_screen: &Frame, eyes: &EyePair) -> Result<()> {
        self.buffer.pixels.fill(0);
        self.buffer.blit(&eyes.left, 0, 0);
        self.buffer.blit(&eyes.right, STEREO_WIDTH, 0);
        self.buffer.blit(touch_screen, PANEL_X, PANEL_Y);

        if self.over_panel() {
            if let Some((mx, my)) = self.mouse_pos() {
                self.buffer.draw_crosshair(mx, my, 12, 0x00_FF_CC_33);
            }
        }
        Ok(())
    }

    /// Push the buffer; minifb sleeps here to hold the target frame rate.
    fn wait_for_vblank(&mut self) -> Result<()> {
        self.window
            .update_with_buffer(&self.buffer.pixels, self.buffer.width, self.buffer.height)
            .map_err(|e| Error::WindowUpdate(e.to_string()))
    }
}
