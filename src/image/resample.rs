//! Mapping a target grid back onto source pixels.

use super::PixelSource;

/// How target pixels are mapped back to the source image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Resampling {
    /// Take the source pixel at `dst * src_len / dst_len` on each axis.
    ///
    /// Resampling to the native resolution is the identity.
    #[default]
    Nearest,

    /// Blend the four source pixels around the target pixel's center,
    /// using `src = (dst + 0.5) * src_len / dst_len - 0.5` clamped to the image.
    Bilinear,
}

impl Resampling {
    /// Sample the RGB value for target pixel `(x, y)` of a `width` x `height` grid.
    ///
    /// Channels come back as floats in `[0, 255]`. The grid must be non-empty and
    /// `(x, y)` inside it; the source must have at least one pixel.
    pub(crate) fn sample<P>(self, src: &P, x: usize, y: usize, width: usize, height: usize) -> [f32; 3]
    where
        P: PixelSource + ?Sized,
    {
        match self {
            Self::Nearest => {
                let sx = nearest_index(x, width, src.width());
                let sy = nearest_index(y, height, src.height());
                src.sample(sx, sy).map(f32::from)
            }
            Self::Bilinear => {
                let (x0, x1, fx) = bilinear_axis(x, width, src.width());
                let (y0, y1, fy) = bilinear_axis(y, height, src.height());

                let p00 = src.sample(x0, y0);
                let p10 = src.sample(x1, y0);
                let p01 = src.sample(x0, y1);
                let p11 = src.sample(x1, y1);

                std::array::from_fn(|c| {
                    let top = lerp(f32::from(p00[c]), f32::from(p10[c]), fx);
                    let bottom = lerp(f32::from(p01[c]), f32::from(p11[c]), fx);
                    lerp(top, bottom, fy)
                })
            }
        }
    }
}

/// `dst * src_len / dst_len` without overflow. Always `< src_len` for `dst < dst_len`.
#[inline]
#[allow(clippy::cast_possible_truncation)]
fn nearest_index(dst: usize, dst_len: usize, src_len: u32) -> u32 {
    // Safe: the quotient is strictly below src_len, which is a u32
    ((dst as u64 * u64::from(src_len)) / dst_len as u64) as u32
}

/// Lower and upper source index plus the blend weight of the upper one.
#[inline]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]
fn bilinear_axis(dst: usize, dst_len: usize, src_len: u32) -> (u32, u32, f32) {
    let last = src_len - 1;
    let scale = src_len as f32 / dst_len as f32;
    let pos = (dst as f32 + 0.5).mul_add(scale, -0.5).max(0.0);

    // Safe: pos is non-negative and clamped to the last index
    let lo = (pos.floor() as u32).min(last);
    let hi = (lo + 1).min(last);
    let frac = (pos - lo as f32).clamp(0.0, 1.0);

    (lo, hi, frac)
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    (b - a).mul_add(t, a)
}
