//! Turning one decoded image into model input.

use std::io::Write;
use std::path::{Path, PathBuf};

use image::{DynamicImage, RgbImage};
use ndarray::Array4;

use crate::error::{Error, Result};

use super::load::{decode_image, into_rgb};
use super::render::{render_grid, RenderStyle};
use super::{ImageTensor, Normalization, PixelSource, Resampling, RGB_CHANNELS};

/// Decoded image plus the conventions used to turn it into a tensor.
///
/// The pixel buffer is owned for the builder's lifetime and freed on drop.
/// Every conversion is a pure function of those pixels and the chosen
/// [`Resampling`] and [`Normalization`].
#[derive(Debug, Clone)]
pub struct ImageTensorBuilder {
    image_path: PathBuf,
    pixels: RgbImage,
    resampling: Resampling,
    normalization: Normalization,
}

impl ImageTensorBuilder {
    /// Decode the image at `image_path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] if the file is missing, unreadable, empty,
    /// not a supported image, or has a zero width or height.
    pub fn open<P: AsRef<Path>>(image_path: P) -> Result<Self> {
        let image_path = image_path.as_ref();
        let pixels = decode_image(image_path)?;

        tracing::debug!(
            "Decoded {} ({}x{})",
            image_path.display(),
            pixels.width(),
            pixels.height()
        );

        Ok(Self::from_rgb(image_path.to_path_buf(), pixels))
    }

    /// Wrap an image that was already decoded, e.g. from memory.
    ///
    /// `image_path` is only recorded for [`image_path`](Self::image_path).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] if the image has a zero width or height.
    pub fn from_image<P: Into<PathBuf>>(image_path: P, image: DynamicImage) -> Result<Self> {
        let image_path = image_path.into();
        match into_rgb(image) {
            Ok(pixels) => Ok(Self::from_rgb(image_path, pixels)),
            Err(source) => Err(Error::Decode {
                path: image_path,
                source,
            }),
        }
    }

    fn from_rgb(image_path: PathBuf, pixels: RgbImage) -> Self {
        Self {
            image_path,
            pixels,
            resampling: Resampling::default(),
            normalization: Normalization::default(),
        }
    }

    /// Use `resampling` for tensors and previews.
    #[must_use]
    pub fn with_resampling(mut self, resampling: Resampling) -> Self {
        self.resampling = resampling;
        self
    }

    /// Use `normalization` for tensor elements.
    #[must_use]
    pub fn with_normalization(mut self, normalization: Normalization) -> Self {
        self.normalization = normalization;
        self
    }

    /// Path the image was loaded from.
    #[must_use]
    pub fn image_path(&self) -> &Path {
        &self.image_path
    }

    /// Source width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    /// Source height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Source `(width, height)`.
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    /// Resampling used by [`to_tensor`](Self::to_tensor) and previews.
    #[must_use]
    pub fn resampling(&self) -> Resampling {
        self.resampling
    }

    /// Pixel convention applied to tensor elements.
    #[must_use]
    pub fn normalization(&self) -> Normalization {
        self.normalization
    }

    /// Resample to `height` x `width` and pack into a `[1, 3, height, width]` tensor.
    ///
    /// Targets larger than the source are upsampled.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] if either dimension is zero or the
    /// tensor would be too large to address, or [`Error::InvalidParameter`] if
    /// the normalization is unusable.
    pub fn to_tensor(&self, height: usize, width: usize) -> Result<ImageTensor> {
        if height == 0 || width == 0 {
            return Err(Error::InvalidDimensions { height, width });
        }
        // ndarray caps element counts at isize::MAX
        #[allow(clippy::cast_sign_loss)]
        let fits = RGB_CHANNELS
            .checked_mul(height)
            .and_then(|n| n.checked_mul(width))
            .is_some_and(|n| n <= isize::MAX as usize);
        if !fits {
            return Err(Error::InvalidDimensions { height, width });
        }
        self.normalization.validate()?;

        tracing::debug!(
            "Packing {} into [1, {RGB_CHANNELS}, {height}, {width}] with {:?}/{:?}",
            self.image_path.display(),
            self.resampling,
            self.normalization
        );

        Ok(pack_tensor(
            &self.pixels,
            height,
            width,
            self.resampling,
            &self.normalization,
        ))
    }

    /// Write a `height` x `width` text preview of the image in ASCII glyphs.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if writing to `out` fails.
    pub fn render<W: Write + ?Sized>(&self, height: usize, width: usize, out: &mut W) -> Result<()> {
        self.render_with(RenderStyle::default(), height, width, out)
    }

    /// Write a `height` x `width` text preview in the given style.
    ///
    /// A zero-sized grid writes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if writing to `out` fails.
    pub fn render_with<W: Write + ?Sized>(
        &self,
        style: RenderStyle,
        height: usize,
        width: usize,
        out: &mut W,
    ) -> Result<()> {
        let preview = render_grid(&self.pixels, height, width, self.resampling, style);
        out.write_all(preview.as_bytes())?;
        out.flush()?;
        Ok(())
    }
}

/// Fill an NCHW tensor from any pixel source. The grid must be non-empty.
pub(crate) fn pack_tensor<P>(
    src: &P,
    height: usize,
    width: usize,
    resampling: Resampling,
    normalization: &Normalization,
) -> ImageTensor
where
    P: PixelSource + ?Sized,
{
    let mut tensor = Array4::<f32>::zeros((1, RGB_CHANNELS, height, width));

    for y in 0..height {
        for x in 0..width {
            let rgb = resampling.sample(src, x, y, width, height);
            for (c, value) in rgb.into_iter().enumerate() {
                tensor[[0, c, y, x]] = normalization.apply(value, c);
            }
        }
    }

    tensor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DecodeFailure;
    use image::{ImageFormat, Rgb};
    use std::io;

    struct FailingSink;

    impl Write for FailingSink {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::other("sink closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::other("sink closed"))
        }
    }

    fn checker(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x * 40) as u8, (y * 40) as u8, if (x + y) % 2 == 0 { 255 } else { 0 }])
        })
    }

    fn builder(width: u32, height: u32) -> ImageTensorBuilder {
        ImageTensorBuilder::from_image("mem.png", DynamicImage::ImageRgb8(checker(width, height)))
            .unwrap()
    }

    #[test]
    fn test_tensor_shape() {
        let b = builder(6, 4);
        for (h, w) in [(1, 1), (4, 6), (2, 3), (7, 11), (224, 224)] {
            let tensor = b.to_tensor(h, w).unwrap();
            assert_eq!(tensor.shape(), &[1, 3, h, w]);
            assert_eq!(tensor.len(), 3 * h * w);
        }
    }

    #[test]
    fn test_native_size_is_identity() {
        let img = checker(5, 3);
        let b = ImageTensorBuilder::from_image("mem.png", DynamicImage::ImageRgb8(img.clone())).unwrap();
        let tensor = b.to_tensor(3, 5).unwrap();

        for (x, y, px) in img.enumerate_pixels() {
            for c in 0..3 {
                assert_eq!(
                    tensor[[0, c, y as usize, x as usize]],
                    f32::from(px[c]) / 255.0
                );
            }
        }
    }

    #[test]
    fn test_channel_planes_are_rgb() {
        let img = RgbImage::from_pixel(2, 2, Rgb([255, 0, 51]));
        let b = ImageTensorBuilder::from_image("red.png", DynamicImage::ImageRgb8(img)).unwrap();
        let tensor = b.to_tensor(2, 2).unwrap();

        let flat = tensor.as_slice().unwrap();
        assert_eq!(&flat[0..4], &[1.0; 4]);
        assert_eq!(&flat[4..8], &[0.0; 4]);
        assert!(flat[8..12].iter().all(|v| (v - 0.2).abs() < 1e-6));
    }

    #[test]
    fn test_deterministic() {
        for resampling in [Resampling::Nearest, Resampling::Bilinear] {
            let b = builder(9, 7).with_resampling(resampling);
            let first = b.to_tensor(13, 5).unwrap();
            let second = b.to_tensor(13, 5).unwrap();
            let bits = |t: &ImageTensor| t.iter().map(|v| v.to_bits()).collect::<Vec<_>>();
            assert_eq!(bits(&first), bits(&second));
        }
    }

    #[test]
    fn test_upsample_single_pixel() {
        let img = RgbImage::from_pixel(1, 1, Rgb([0, 255, 0]));
        let b = ImageTensorBuilder::from_image("dot.png", DynamicImage::ImageRgb8(img))
            .unwrap()
            .with_normalization(Normalization::Symmetric);
        let tensor = b.to_tensor(8, 8).unwrap();

        assert!(tensor.slice(ndarray::s![0, 0, .., ..]).iter().all(|&v| v == -1.0));
        assert!(tensor.slice(ndarray::s![0, 1, .., ..]).iter().all(|&v| v == 1.0));
    }

    #[test]
    fn test_zero_dimensions() {
        let b = builder(4, 4);
        assert!(matches!(
            b.to_tensor(0, 5),
            Err(Error::InvalidDimensions { height: 0, width: 5 })
        ));
        assert!(matches!(
            b.to_tensor(5, 0),
            Err(Error::InvalidDimensions { height: 5, width: 0 })
        ));
    }

    #[test]
    fn test_bad_normalization_rejected() {
        let b = builder(2, 2).with_normalization(Normalization::MeanStd {
            mean: [0.0; 3],
            std: [1.0, 1.0, 0.0],
        });
        assert!(matches!(b.to_tensor(2, 2), Err(Error::InvalidParameter { .. })));
    }

    #[test]
    fn test_open_keeps_path_and_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.png");
        checker(7, 3).save_with_format(&path, ImageFormat::Png).unwrap();

        let b = ImageTensorBuilder::open(&path).unwrap();
        assert_eq!(b.image_path(), path.as_path());
        assert_eq!(b.dimensions(), (7, 3));
        assert_eq!((b.width(), b.height()), (7, 3));
    }

    #[test]
    fn test_open_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ImageTensorBuilder::open(dir.path().join("missing.png")).unwrap_err();
        assert!(matches!(err, Error::Decode { .. }));
    }

    #[test]
    fn test_open_zero_byte_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.jpg");
        std::fs::write(&path, b"").unwrap();
        assert!(matches!(ImageTensorBuilder::open(&path), Err(Error::Decode { .. })));
    }

    #[test]
    fn test_from_empty_image() {
        let err = ImageTensorBuilder::from_image("void.png", DynamicImage::new_rgb8(0, 0)).unwrap_err();
        assert!(matches!(
            err,
            Error::Decode {
                source: DecodeFailure::EmptyImage { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_render_writes_requested_grid() {
        let b = builder(8, 8);
        let mut out = Vec::new();
        b.render(3, 5, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines.iter().all(|l| l.chars().count() == 5));
    }

    #[test]
    fn test_overflowing_dimensions() {
        let b = builder(2, 2);
        assert!(matches!(
            b.to_tensor(usize::MAX / 2, 4),
            Err(Error::InvalidDimensions { .. })
        ));
        #[allow(clippy::cast_sign_loss)]
        let just_too_tall = isize::MAX as usize / 3 + 1;
        assert!(matches!(
            b.to_tensor(just_too_tall, 1),
            Err(Error::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_render_sink_error() {
        let b = builder(4, 4);
        assert!(matches!(b.render(2, 2, &mut FailingSink), Err(Error::Io(_))));
        assert!(matches!(
            b.render_with(RenderStyle::Ansi, 2, 2, &mut FailingSink),
            Err(Error::Io(_))
        ));
    }
}
