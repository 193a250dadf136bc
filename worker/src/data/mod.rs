pub mod dataset;
pub mod mnist;
pub mod toy;

pub use dataset::{Batch, Normalize, TensorDataset};
