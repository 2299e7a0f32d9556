//! Coarse text previews of an image.

use std::fmt::Write as _;

use super::{PixelSource, Resampling};

/// Glyphs from darkest to brightest.
const ASCII_RAMP: &[u8] = b" .:-=+*#%@";

/// How a preview cell is drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RenderStyle {
    /// One glyph per cell, picked by luminance.
    #[default]
    Ascii,

    /// Two spaces per cell on a 24-bit ANSI background color.
    Ansi,
}

/// Render the whole preview into a string, one line per row.
///
/// Returns an empty string if either dimension is zero.
pub(crate) fn render_grid<P>(
    src: &P,
    height: usize,
    width: usize,
    resampling: Resampling,
    style: RenderStyle,
) -> String
where
    P: PixelSource + ?Sized,
{
    if height == 0 || width == 0 {
        return String::new();
    }

    let mut preview = String::new();
    for y in 0..height {
        for x in 0..width {
            let rgb = resampling.sample(src, x, y, width, height);
            match style {
                RenderStyle::Ascii => preview.push(glyph(rgb)),
                RenderStyle::Ansi => {
                    let [r, g, b] = rgb.map(to_u8);
                    // Writing into a String cannot fail.
                    let _ = write!(preview, "\x1b[48;2;{r};{g};{b}m  ");
                }
            }
        }
        if style == RenderStyle::Ansi {
            preview.push_str("\x1b[0m");
        }
        preview.push('\n');
    }

    preview
}

/// Map an RGB value in `[0, 255]` onto [`ASCII_RAMP`] by luminance.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]
fn glyph([r, g, b]: [f32; 3]) -> char {
    // Standard luminosity formula: 0.299*R + 0.587*G + 0.114*B
    let luma = 0.299_f32.mul_add(r, 0.587_f32.mul_add(g, 0.114 * b)).clamp(0.0, 255.0);
    let last = ASCII_RAMP.len() - 1;
    // Safe: luma is clamped to [0, 255], so the index is within the ramp
    let index = ((luma / 255.0) * last as f32).round() as usize;
    char::from(ASCII_RAMP[index.min(last)])
}

#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_u8(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}
