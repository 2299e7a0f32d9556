//! Pass-through record of a provisioned classifier.

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::image::{ImageTensor, ImageTensorBuilder};
use crate::report::{self, ReportOptions};

/// Everything the provisioning step hands over about a classifier.
///
/// Nothing here is computed: paths, labels, and input size are stored as given.
/// Label `i` names model output `i`; uniqueness is not checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelDescriptor {
    model_path: PathBuf,
    sample_image_path: PathBuf,
    class_labels: Vec<String>,
    input_height: usize,
    input_width: usize,
}

impl ModelDescriptor {
    /// Create a new descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] if either input dimension is zero, or
    /// [`Error::InvalidParameter`] if `class_labels` is empty.
    pub fn new(
        model_path: impl Into<PathBuf>,
        sample_image_path: impl Into<PathBuf>,
        class_labels: Vec<String>,
        input_height: usize,
        input_width: usize,
    ) -> Result<Self> {
        if input_height == 0 || input_width == 0 {
            return Err(Error::InvalidDimensions {
                height: input_height,
                width: input_width,
            });
        }

        if class_labels.is_empty() {
            return Err(Error::InvalidParameter {
                name: "class_labels".to_string(),
                reason: "must not be empty".to_string(),
            });
        }

        Ok(Self {
            model_path: model_path.into(),
            sample_image_path: sample_image_path.into(),
            class_labels,
            input_height,
            input_width,
        })
    }

    /// Path to the model artifact.
    #[must_use]
    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    /// Path to the sample image shipped with the model.
    #[must_use]
    pub fn sample_image_path(&self) -> &Path {
        &self.sample_image_path
    }

    /// Class labels in model output order.
    #[must_use]
    pub fn class_labels(&self) -> &[String] {
        &self.class_labels
    }

    /// Height of the model's input tensor.
    #[must_use]
    pub fn input_height(&self) -> usize {
        self.input_height
    }

    /// Width of the model's input tensor.
    #[must_use]
    pub fn input_width(&self) -> usize {
        self.input_width
    }

    /// Build the input tensor for this model from `image`.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`ImageTensorBuilder::to_tensor`].
    pub fn input_tensor(&self, image: &ImageTensorBuilder) -> Result<ImageTensor> {
        image.to_tensor(self.input_height, self.input_width)
    }

    /// Print the top `k` classes for `scores` using this model's labels.
    ///
    /// # Errors
    ///
    /// See [`report::print_top_classes`].
    pub fn print_top_classes<W: Write + ?Sized>(&self, scores: &[f32], k: usize, out: &mut W) -> Result<()> {
        report::print_top_classes(self.class_labels.as_slice(), scores, k, out)
    }

    /// [`print_top_classes`](Self::print_top_classes) with explicit formatting.
    ///
    /// # Errors
    ///
    /// See [`report::print_top_classes_with`].
    pub fn print_top_classes_with<W: Write + ?Sized>(
        &self,
        scores: &[f32],
        k: usize,
        options: ReportOptions,
        out: &mut W,
    ) -> Result<()> {
        report::print_top_classes_with(self.class_labels.as_slice(), scores, k, options, out)
    }
}
