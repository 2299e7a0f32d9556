//! Description of the classifier an image is prepared for.

mod descriptor;

pub use descriptor::ModelDescriptor;
