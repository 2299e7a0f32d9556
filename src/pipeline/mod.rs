//! Image classification pipeline.

mod classify;
mod engine;

pub use classify::{Config, Pipeline};
pub use engine::InferenceEngine;
