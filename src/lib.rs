//! # imgclass
//!
//! Prepares images for vision classifiers and reports what they predicted.
//!
//! An image file is decoded, resampled to the model's input size, and packed into
//! a normalized `[1, 3, H, W]` channel-first `f32` tensor. After an external
//! runtime has evaluated the model, the raw scores are ranked against the class
//! labels and printed as a top-K report.
//!
//! ## Example
//!
//! ```no_run
//! use imgclass::image::{ImageTensorBuilder, Normalization};
//!
//! # fn main() -> imgclass::Result<()> {
//! let image = ImageTensorBuilder::open("kitten.jpg")?.with_normalization(Normalization::IMAGENET);
//! let tensor = image.to_tensor(224, 224)?;
//! image.render(12, 24, &mut std::io::stdout())?;
//!
//! let scores: Vec<f32> = run_model(&tensor);
//! let labels = ["tabby", "tiger cat", "Egyptian cat"];
//! imgclass::report::print_top_classes(&labels, &scores, 5, &mut std::io::stdout())?;
//! # Ok(())
//! # }
//! # fn run_model(_: &imgclass::image::ImageTensor) -> Vec<f32> { vec![0.7, 0.2, 0.1] }
//! ```

pub mod error;
pub mod image;
pub mod model;
pub mod pipeline;
pub mod report;

pub use error::{DecodeFailure, Error, Result};
pub use crate::image::{ImageTensor, ImageTensorBuilder};
pub use model::ModelDescriptor;
pub use pipeline::{Config, InferenceEngine, Pipeline};
pub use report::{print_top_classes, rank_classes, RankedEntry};
