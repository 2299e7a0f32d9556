//! Image decoding, resampling, tensor packing, and text previews.

mod builder;
mod load;
mod normalize;
mod render;
mod resample;

pub use builder::ImageTensorBuilder;
pub use load::decode_image;
pub use normalize::Normalization;
pub use render::RenderStyle;
pub use resample::Resampling;

use image::RgbImage;
use ndarray::Array4;

/// Image tensor in NCHW format (batch, channels, height, width).
/// Channel planes are stored in R, G, B order.
pub type ImageTensor = Array4<f32>;

/// Number of channels in RGB images.
pub const RGB_CHANNELS: usize = 3;

/// Read access to decoded RGB pixels.
///
/// Resampling only ever goes through this trait, so the packing code does not
/// care which decoder produced the pixels.
pub trait PixelSource {
    /// Width in pixels.
    fn width(&self) -> u32;

    /// Height in pixels.
    fn height(&self) -> u32;

    /// RGB intensities at `(x, y)`. Callers keep coordinates in bounds.
    fn sample(&self, x: u32, y: u32) -> [u8; 3];
}

impl PixelSource for RgbImage {
    fn width(&self) -> u32 {
        self.width()
    }

    fn height(&self) -> u32 {
        self.height()
    }

    #[inline]
    fn sample(&self, x: u32, y: u32) -> [u8; 3] {
        self.get_pixel(x, y).0
    }
}
