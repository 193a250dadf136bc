use serde::{Deserialize, Serialize};

/// Catalog entry for one dataset registered on a worker.
///
/// Shapes are per sample: a 28x28 image dataset reports `data_shape`
/// `[28, 28]` even though rows travel flattened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DatasetSpec {
    pub key: String,
    pub len: usize,
    pub data_shape: Vec<usize>,
    pub target_shape: Vec<usize>,
}

/// Header sent before the `Samples` and `Targets` frames of a fetch reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct BatchSpec {
    pub key: String,
    pub rows: usize,
    pub data_cols: usize,
    pub target_cols: usize,
}

impl BatchSpec {
    /// Expected element count of the `Samples` frame that follows.
    pub fn samples_len(&self) -> usize {
        self.rows * self.data_cols
    }

    /// Expected element count of the `Targets` frame that follows.
    pub fn targets_len(&self) -> usize {
        self.rows * self.target_cols
    }
}
