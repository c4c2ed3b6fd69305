// Core pixel containers shared by every stage of the canvas engine.
// All of them are addressed through `mapper::Layout`, never by hand.

use image::{ImageBuffer, Rgb as ImageRgb, RgbImage};

use crate::error::{Error, Result};
use crate::mapper::Layout;

/// Bytes per pixel in a `Frame` (stored B, G, R).
pub const CHANNELS: usize = 3;

/// Erase-mask value where only the overlay is visible.
pub const OPAQUE: u8 = 255;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn grey(v: u8) -> Self {
        Self { r: v, g: v, b: v }
    }

    /// Pack as 0x00RRGGBB for minifb.
    #[inline]
    pub fn to_u32(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }
}

/// A full-frame 3-channel pixel buffer in rotated layout, B,G,R per cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub layout: Layout,
    pub pixels: Vec<u8>, // length = layout.len() * CHANNELS
}

impl Frame {
    /// All-black frame. Visual: the letterbox color of the stereo screen.
    pub fn new(layout: Layout) -> Self {
        Self { layout, pixels: vec![0u8; layout.len() * CHANNELS] }
    }

    pub fn filled(layout: Layout, color: Rgb) -> Self {
        let mut frame = Self::new(layout);
        frame.fill(color);
        frame
    }

    pub fn fill(&mut self, color: Rgb) {
        for px in self.pixels.chunks_exact_mut(CHANNELS) {
            px.copy_from_slice(&[color.b, color.g, color.r]);
        }
    }

    /// Write one logical pixel; coordinates outside the frame are ignored.
    #[inline]
    pub fn put(&mut self, x: i32, y: i32, color: Rgb) {
        if let Some(idx) = self.layout.to_buffer(x, y) {
            self.set_cell(idx, color);
        }
    }

    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Option<Rgb> {
        self.layout.to_buffer(x, y).map(|idx| self.cell(idx))
    }

    /// Pixel at a raw cell index.
    #[inline]
    pub fn cell(&self, idx: usize) -> Rgb {
        let o = idx * CHANNELS;
        Rgb::new(self.pixels[o + 2], self.pixels[o + 1], self.pixels[o])
    }

    #[inline]
    pub fn set_cell(&mut self, idx: usize, color: Rgb) {
        let o = idx * CHANNELS;
        self.pixels[o] = color.b;
        self.pixels[o + 1] = color.g;
        self.pixels[o + 2] = color.r;
    }

    /// Upright row-major copy, e.g. for handing to other image tooling.
    pub fn to_rgb_image(&self) -> RgbImage {
        let (w, h) = (self.layout.width as u32, self.layout.height as u32);
        ImageBuffer::from_fn(w, h, |x, y| {
            let c = self.get(x as i32, y as i32).unwrap_or(Rgb::BLACK);
            ImageRgb([c.r, c.g, c.b])
        })
    }

    /// Inverse of [`Frame::to_rgb_image`]; the image must match `layout` exactly.
    pub fn from_rgb_image(layout: Layout, img: &RgbImage) -> Result<Self> {
        let (w, h) = img.dimensions();
        if w as usize != layout.width || h as usize != layout.height {
            return Err(Error::DimensionMismatch { width: w as i64, height: h as i64 });
        }
        let mut frame = Self::new(layout);
        for (x, y, px) in img.enumerate_pixels() {
            frame.put(x as i32, y as i32, Rgb::new(px[0], px[1], px[2]));
        }
        Ok(frame)
    }
}

/// Per-pixel blend factor between the two layers.
/// 255 = overlay fully visible, 0 = hidden layer fully visible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EraseMask {
    pub layout: Layout,
    pub alpha: Vec<u8>, // length = layout.len()
}

impl EraseMask {
    /// Fresh, un-scratched mask.
    pub fn new(layout: Layout) -> Self {
        Self { layout, alpha: vec![OPAQUE; layout.len()] }
    }

    pub fn fill(&mut self, value: u8) {
        self.alpha.fill(value);
    }

    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Option<u8> {
        self.layout.to_buffer(x, y).map(|idx| self.alpha[idx])
    }
}

/// The two full-frame layers the scratch illusion is made of.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    /// Top pattern, visible until erased.
    pub overlay: Frame,
    /// Pattern revealed underneath.
    pub hidden: Frame,
}

impl Canvas {
    pub fn new(layout: Layout) -> Self {
        Self { overlay: Frame::new(layout), hidden: Frame::new(layout) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_stores_bgr() {
        let mut frame = Frame::new(Layout::SCREEN);
        frame.put(0, 239, Rgb::new(1, 2, 3));
        assert_eq!(&frame.pixels[0..3], &[3, 2, 1]);
        assert_eq!(frame.get(0, 239), Some(Rgb::new(1, 2, 3)));
    }

    #[test]
    fn put_outside_is_ignored() {
        let mut frame = Frame::new(Layout::SCREEN);
        frame.put(-1, 5, Rgb::WHITE);
        frame.put(5, 240, Rgb::WHITE);
        assert!(frame.pixels.iter().all(|&b| b == 0));
    }

    #[test]
    fn rgb_image_conversion_is_upright() {
        let mut frame = Frame::new(Layout::SCREEN);
        frame.put(10, 20, Rgb::new(9, 8, 7));
        let img = frame.to_rgb_image();
        assert_eq!(img.get_pixel(10, 20).0, [9, 8, 7]);
        assert_eq!(Frame::from_rgb_image(Layout::SCREEN, &img).unwrap(), frame);
    }

    #[test]
    fn rgb_image_of_wrong_size_is_rejected() {
        let img = RgbImage::new(10, 10);
        assert!(matches!(
            Frame::from_rgb_image(Layout::SCREEN, &img),
            Err(Error::DimensionMismatch { width: 10, height: 10 })
        ));
    }

    #[test]
    fn new_mask_is_opaque() {
        let mask = EraseMask::new(Layout::SCREEN);
        assert!(mask.alpha.iter().all(|&a| a == OPAQUE));
        assert_eq!(mask.alpha.len(), 320 * 240);
    }
}
