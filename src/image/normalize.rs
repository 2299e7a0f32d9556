//! Pixel value conventions expected by vision models.

use crate::error::{Error, Result};

/// How an 8-bit channel intensity is turned into a tensor element.
///
/// The right choice depends on how the paired model was trained; there is no
/// universal constant, so callers pick one explicitly or accept [`UnitRange`].
///
/// [`UnitRange`]: Normalization::UnitRange
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum Normalization {
    /// `v / 255`, giving `[0, 1]`.
    #[default]
    UnitRange,

    /// `v / 127.5 - 1`, giving `[-1, 1]`.
    Symmetric,

    /// Per-channel whitening: `(v / 255 - mean[c]) / std[c]`.
    MeanStd { mean: [f32; 3], std: [f32; 3] },
}

impl Normalization {
    /// Whitening with the `ImageNet` channel statistics used by most torchvision
    /// and ONNX model-zoo classifiers.
    pub const IMAGENET: Self = Self::MeanStd {
        mean: [0.485, 0.456, 0.406],
        std: [0.229, 0.224, 0.225],
    };

    /// Check that the convention can be applied without producing NaN or infinity.
    ///
    /// # Errors
    ///
    /// Returns an error if a standard deviation is zero, negative, or not finite,
    /// or if a mean is not finite.
    pub fn validate(&self) -> Result<()> {
        if let Self::MeanStd { mean, std } = self {
            if mean.iter().any(|m| !m.is_finite()) {
                return Err(Error::InvalidParameter {
                    name: "normalization.mean".to_string(),
                    reason: "must be finite".to_string(),
                });
            }
            if std.iter().any(|s| !s.is_finite() || *s <= 0.0) {
                return Err(Error::InvalidParameter {
                    name: "normalization.std".to_string(),
                    reason: "must be finite and greater than 0".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Normalize a channel value in `[0, 255]` for channel `channel` (0 = R, 1 = G, 2 = B).
    #[inline]
    #[must_use]
    pub fn apply(&self, value: f32, channel: usize) -> f32 {
        match self {
            Self::UnitRange => value / 255.0,
            Self::Symmetric => (value / 127.5) - 1.0,
            Self::MeanStd { mean, std } => (value / 255.0 - mean[channel]) / std[channel],
        }
    }
}
