// Still-image export/import: uncompressed 24-bit BMP of the touch screen.
//
// Layout (little-endian):
//   0  "BM"            2  file size       6  reserved (0)   10 pixel offset (54)
//   14 info size (40)  18 width (320)     22 height (240)   26 planes (1)
//   28 bpp (24)        30..54 compression/size/resolution/palette, all 0
//   54.. rows bottom (y=239) to top (y=0), left to right, B,G,R per pixel.
// 320 * 3 bytes is already a multiple of 4, so rows carry no padding.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use tracing::debug;

use crate::error::{Error, Result};
use crate::mapper::Layout;
use crate::types::{CHANNELS, Frame};

pub const FILE_HEADER_LEN: usize = 14;
pub const INFO_HEADER_LEN: usize = 40;
pub const PIXEL_OFFSET: usize = FILE_HEADER_LEN + INFO_HEADER_LEN;
const BITS_PER_PIXEL: u16 = 24;

/// Bytes of pixel data for the fixed canvas.
pub const fn pixel_data_len() -> usize {
    Layout::SCREEN.len() * CHANNELS
}

/// Total file size for the fixed canvas.
pub const fn file_len() -> usize {
    PIXEL_OFFSET + pixel_data_len()
}

/// Serialize a touch-screen frame.
pub fn encode(frame: &Frame) -> Result<Vec<u8>> {
    let layout = frame.layout;
    if layout != Layout::SCREEN {
        return Err(Error::LayoutMismatch("bmp encode"));
    }
    let mut out = Vec::with_capacity(file_len());

    // File header
    out.extend_from_slice(b"BM");
    out.extend_from_slice(&(file_len() as u32).to_le_bytes());
    out.extend_from_slice(&[0u8; 4]);
    out.extend_from_slice(&(PIXEL_OFFSET as u32).to_le_bytes());

    // Info header
    out.extend_from_slice(&(INFO_HEADER_LEN as u32).to_le_bytes());
    out.extend_from_slice(&(layout.width as u32).to_le_bytes());
    out.extend_from_slice(&(layout.height as u32).to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&BITS_PER_PIXEL.to_le_bytes());
    out.extend_from_slice(&[0u8; 24]);

    for y in (0..layout.height as i32).rev() {
        for x in 0..layout.width as i32 {
            // Frame cells are already B,G,R.
            let Some(idx) = layout.to_buffer(x, y) else { continue };
            let o = idx * CHANNELS;
            out.extend_from_slice(&frame.pixels[o..o + CHANNELS]);
        }
    }
    debug_assert_eq!(out.len(), file_len());
    Ok(out)
}

#[inline]
fn u16_at(bytes: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([bytes[at], bytes[at + 1]])
}

#[inline]
fn u32_at(bytes: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

/// Parse a file produced by [`encode`] (or any BMP with the same fixed layout).
pub fn decode(bytes: &[u8]) -> Result<Frame> {
    if bytes.len() < PIXEL_OFFSET {
        return Err(Error::Truncated { needed: PIXEL_OFFSET, got: bytes.len() });
    }
    if &bytes[0..2] != b"BM" {
        return Err(Error::BadMagic);
    }

    let offset = u32_at(bytes, 10) as usize;
    let info_len = u32_at(bytes, 14) as usize;
    let width = u32_at(bytes, 18) as i32;
    let height = u32_at(bytes, 22) as i32;
    let planes = u16_at(bytes, 26);
    let bpp = u16_at(bytes, 28);
    let compression = u32_at(bytes, 30);

    if info_len < INFO_HEADER_LEN || offset < FILE_HEADER_LEN + info_len {
        return Err(Error::UnsupportedFormat(format!("info header {info_len} bytes, data at {offset}")));
    }
    if planes != 1 || bpp != BITS_PER_PIXEL || compression != 0 {
        return Err(Error::UnsupportedFormat(format!(
            "planes {planes}, {bpp} bpp, compression {compression}"
        )));
    }

    let layout = Layout::SCREEN;
    if width as i64 != layout.width as i64 || height as i64 != layout.height as i64 {
        return Err(Error::DimensionMismatch { width: width as i64, height: height as i64 });
    }

    let needed = offset + pixel_data_len();
    if bytes.len() < needed {
        return Err(Error::Truncated { needed, got: bytes.len() });
    }

    let mut frame = Frame::new(layout);
    let mut rows = bytes[offset..needed].chunks_exact(layout.width * CHANNELS);
    for y in (0..layout.height as i32).rev() {
        let Some(row) = rows.next() else { break };
        for (x, px) in row.chunks_exact(CHANNELS).enumerate() {
            let Some(idx) = layout.to_buffer(x as i32, y) else { continue };
            let o = idx * CHANNELS;
            frame.pixels[o..o + CHANNELS].copy_from_slice(px);
        }
    }
    Ok(frame)
}

/// Write `frame` to `path`.
pub fn write_bmp(path: &Path, frame: &Frame) -> Result<()> {
    let bytes = encode(frame)?;
    fs::write(path, bytes).map_err(|e| Error::io(path, e))?;
    debug!(path = %path.display(), "bitmap written");
    Ok(())
}

/// Read and validate a bitmap from `path`.
pub fn read_bmp(path: &Path) -> Result<Frame> {
    let bytes = fs::read(path).map_err(|e| Error::io(path, e))?;
    decode(&bytes)
}

/// `sqribble_YYYYMMDD_HHMMSS.bmp`
pub fn export_file_name(at: NaiveDateTime) -> String {
    format!("sqribble_{}.bmp", at.format("%Y%m%d_%H%M%S"))
}

/// Write `frame` under `root` with a timestamped name; returns the full path.
pub fn export(root: &Path, frame: &Frame, at: NaiveDateTime) -> Result<PathBuf> {
    let path = root.join(export_file_name(at));
    write_bmp(&path, frame)?;
    Ok(path)
}
