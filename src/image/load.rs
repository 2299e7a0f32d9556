//! Image decoding utilities.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use image::{DynamicImage, ImageReader, RgbImage};

use crate::error::{DecodeFailure, Error, Result};

/// Decode an image file into 8-bit RGB pixels.
///
/// The container format is guessed from the file contents, not the extension.
/// The file is closed before this returns, whether decoding succeeded or not.
///
/// # Errors
///
/// Returns [`Error::Decode`] if the file cannot be opened, is empty or corrupt,
/// is not a supported container, or has a zero width or height.
pub fn decode_image<P: AsRef<Path>>(path: P) -> Result<RgbImage> {
    let path = path.as_ref();
    let decode_err = |source: DecodeFailure| Error::Decode {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(|e| decode_err(DecodeFailure::Io(e)))?;
    let img = ImageReader::new(BufReader::new(file))
        .with_guessed_format()
        .map_err(|e| decode_err(DecodeFailure::Io(e)))?
        .decode()
        .map_err(|e| decode_err(e.into()))?;

    into_rgb(img).map_err(decode_err)
}

/// Convert to RGB, rejecting images without pixels.
pub(crate) fn into_rgb(img: DynamicImage) -> std::result::Result<RgbImage, DecodeFailure> {
    let (width, height) = (img.width(), img.height());
    if width == 0 || height == 0 {
        return Err(DecodeFailure::EmptyImage { width, height });
    }
    Ok(img.into_rgb8())
}
