// Alpha compositing of the two canvas layers.
// Visual: where the mask is 255 you see the overlay, where it is 0 the
// hidden layer, and in between a straight per-channel cross-fade.

use crate::error::{Error, Result};
use crate::types::{CHANNELS, EraseMask, Frame};

/// `dest = (bottom * (255 - a) + top * a) / 255` per channel, truncating.
#[inline]
pub fn blend_channel(bottom: u8, top: u8, alpha: u8) -> u8 {
    let a = alpha as u32;
    ((bottom as u32 * (255 - a) + top as u32 * a) / 255) as u8
}

/// Blend `bottom` (hidden) and `top` (overlay) into `dest` using `mask` as the
/// per-pixel weight of `top`.
pub fn composite(dest: &mut Frame, bottom: &Frame, top: &Frame, mask: &EraseMask) -> Result<()> {
    if bottom.layout != dest.layout || top.layout != dest.layout {
        return Err(Error::LayoutMismatch("composite: layers"));
    }
    if mask.layout != dest.layout {
        return Err(Error::LayoutMismatch("composite: mask"));
    }

    let cells = dest
        .pixels
        .chunks_exact_mut(CHANNELS)
        .zip(bottom.pixels.chunks_exact(CHANNELS))
        .zip(top.pixels.chunks_exact(CHANNELS))
        .zip(&mask.alpha);

    for (((d, b), t), &alpha) in cells {
        match alpha {
            0 => d.copy_from_slice(b),
            255 => d.copy_from_slice(t),
            _ => {
                for c in 0..CHANNELS {
                    d[c] = blend_channel(b[c], t[c], alpha);
                }
            }
        }
    }
    Ok(())
}
