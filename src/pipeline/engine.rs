//! Seam to the runtime that actually evaluates the model.

use crate::error::Result;
use crate::image::ImageTensor;

/// Runs a classifier on a prepared input tensor.
///
/// Implementations wrap whatever runtime executes the model. The input has shape
/// `[1, 3, H, W]` at the model's input size; the output holds one score per class
/// label, in label order.
pub trait InferenceEngine {
    /// Evaluate the model on `input`.
    ///
    /// # Errors
    ///
    /// Implementations report runtime failures, typically as
    /// [`Error::Inference`](crate::Error::Inference).
    fn infer(&mut self, input: &ImageTensor) -> Result<Vec<f32>>;
}

impl<F> InferenceEngine for F
where
    F: FnMut(&ImageTensor) -> Result<Vec<f32>>,
{
    fn infer(&mut self, input: &ImageTensor) -> Result<Vec<f32>> {
        self(input)
    }
}
