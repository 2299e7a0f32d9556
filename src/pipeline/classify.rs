//! End-to-end classification of one image.

use std::io::Write;
use std::path::Path;

use crate::error::{Error, Result};
use crate::image::{ImageTensorBuilder, Normalization, RenderStyle, Resampling};
use crate::model::ModelDescriptor;
use crate::report::{self, ReportOptions, MAX_PRECISION};

use super::InferenceEngine;

/// Configuration for the classification pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Resampling used for both the input tensor and the preview.
    pub resampling: Resampling,

    /// Pixel convention the paired model was trained with.
    pub normalization: Normalization,

    /// Style of the text preview.
    pub render_style: RenderStyle,

    /// Preview rows. Zero disables the preview.
    pub preview_height: usize,

    /// Preview columns. Zero disables the preview.
    pub preview_width: usize,

    /// Number of classes in the report.
    pub top_k: usize,

    /// Decimal places for reported scores.
    pub precision: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            resampling: Resampling::Nearest,
            normalization: Normalization::UnitRange,
            render_style: RenderStyle::Ascii,
            preview_height: 0,
            preview_width: 0,
            top_k: 5,
            precision: report::DEFAULT_PRECISION,
        }
    }
}

impl Config {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any parameter is out of valid range.
    pub fn validate(&self) -> Result<()> {
        if self.top_k == 0 {
            return Err(Error::InvalidParameter {
                name: "top_k".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }

        if self.precision > MAX_PRECISION {
            return Err(Error::InvalidParameter {
                name: "precision".to_string(),
                reason: format!("must be at most {MAX_PRECISION}"),
            });
        }

        self.normalization.validate()
    }

    fn shows_preview(&self) -> bool {
        self.preview_height > 0 && self.preview_width > 0
    }
}

/// Prepares images for a classifier and reports what it saw.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: Config,
}

impl Pipeline {
    /// Create a new pipeline with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        tracing::debug!("Initializing pipeline with config: {config:?}");

        Ok(Self { config })
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Open `image_path` with this pipeline's resampling and normalization.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] if the image cannot be decoded.
    pub fn open_image<P: AsRef<Path>>(&self, image_path: P) -> Result<ImageTensorBuilder> {
        Ok(ImageTensorBuilder::open(image_path)?
            .with_resampling(self.config.resampling)
            .with_normalization(self.config.normalization))
    }

    /// Classify one image and write the preview (if enabled) and top-K report.
    ///
    /// Output is assembled in memory and written once, so nothing reaches `out`
    /// unless every step succeeded. Returns the raw scores from `engine`.
    ///
    /// # Arguments
    ///
    /// * `image_path` - Image to classify
    /// * `model` - Labels and input size of the classifier `engine` runs
    /// * `engine` - Runtime that turns the input tensor into scores
    /// * `out` - Sink for the report
    ///
    /// # Errors
    ///
    /// Returns an error if decoding, inference, or writing fails, or
    /// [`Error::Alignment`] if the engine returned the wrong number of scores.
    pub fn classify<P, E, W>(
        &self,
        image_path: P,
        model: &ModelDescriptor,
        engine: &mut E,
        out: &mut W,
    ) -> Result<Vec<f32>>
    where
        P: AsRef<Path>,
        E: InferenceEngine + ?Sized,
        W: Write + ?Sized,
    {
        let image_path = image_path.as_ref();

        tracing::info!("Classifying image: {}", image_path.display());

        let image = self.open_image(image_path)?;

        let mut buffer = Vec::new();
        if self.config.shows_preview() {
            image.render_with(
                self.config.render_style,
                self.config.preview_height,
                self.config.preview_width,
                &mut buffer,
            )?;
        }

        tracing::info!(
            "Building input tensor [1, 3, {}, {}]...",
            model.input_height(),
            model.input_width()
        );
        let input = model.input_tensor(&image)?;

        tracing::info!("Running inference...");
        let scores = engine.infer(&input)?;

        let options = ReportOptions {
            precision: self.config.precision,
        };
        model.print_top_classes_with(&scores, self.config.top_k, options, &mut buffer)?;

        out.write_all(&buffer)?;
        out.flush()?;

        tracing::info!("Classification complete");
        Ok(scores)
    }
}
