use ndarray::{Array2, Axis};

use crate::error::{Result, WorkerErr};

/// Elementwise standardization applied to data rows when they are fetched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalize {
    pub mean: f32,
    pub std: f32,
}

impl Normalize {
    #[inline]
    pub fn apply(&self, value: f32) -> f32 {
        (value - self.mean) / self.std
    }
}

/// A data tensor paired with a target tensor, plus an optional transform.
///
/// Rows are samples. Targets always have at least one column; label-style
/// targets use a single column holding the class as `f32`.
#[derive(Debug, Clone)]
pub struct TensorDataset {
    data: Array2<f32>,
    targets: Array2<f32>,
    transform: Option<Normalize>,
    data_shape: Vec<usize>,
}

/// An owned batch of rows pulled out of a dataset, with the dataset's
/// transform already applied to the data side. Buffers are row major.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    pub data: Vec<f32>,
    pub targets: Vec<f32>,
    pub rows: usize,
    pub data_cols: usize,
    pub target_cols: usize,
}

impl TensorDataset {
    /// Pairs a data tensor with a target tensor.
    ///
    /// # Errors
    /// Returns `WorkerErr::RowsMismatch` if the tensors disagree on the
    /// number of samples.
    pub fn new(data: Array2<f32>, targets: Array2<f32>) -> Result<Self> {
        if data.nrows() != targets.nrows() {
            return Err(WorkerErr::RowsMismatch {
                data: data.nrows(),
                targets: targets.nrows(),
            });
        }

        let data_shape = vec![data.ncols()];
        Ok(Self {
            data,
            targets,
            transform: None,
            data_shape,
        })
    }

    /// Attaches a transform applied to data rows at fetch time.
    pub fn with_transform(mut self, transform: Normalize) -> Self {
        self.transform = Some(transform);
        self
    }

    /// Records the per-sample shape the flattened data columns came from.
    ///
    /// # Errors
    /// Returns a shape error if the shape's element count does not match the
    /// column count.
    pub fn with_data_shape(mut self, shape: Vec<usize>) -> Result<Self> {
        if shape.iter().product::<usize>() != self.data.ncols() {
            let err = ndarray::ShapeError::from_kind(ndarray::ErrorKind::IncompatibleShape);
            return Err(err.into());
        }

        self.data_shape = shape;
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.data.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn data_cols(&self) -> usize {
        self.data.ncols()
    }

    pub fn target_cols(&self) -> usize {
        self.targets.ncols()
    }

    pub fn data_shape(&self) -> &[usize] {
        &self.data_shape
    }

    pub fn transform(&self) -> Option<Normalize> {
        self.transform
    }

    pub fn targets(&self) -> &Array2<f32> {
        &self.targets
    }

    /// Keeps exactly the rows whose first target column is a member of
    /// `keep`, preserving each row's pairing with its target.
    pub fn filter_by_labels(self, keep: &[u8]) -> Self {
        let kept: Vec<usize> = self
            .targets
            .column(0)
            .iter()
            .enumerate()
            .filter(|&(_, &label)| keep.iter().any(|&k| f32::from(k) == label))
            .map(|(i, _)| i)
            .collect();

        Self {
            data: self.data.select(Axis(0), &kept),
            targets: self.targets.select(Axis(0), &kept),
            transform: self.transform,
            data_shape: self.data_shape,
        }
    }

    /// Copies the requested rows out as an owned `Batch`.
    ///
    /// # Errors
    /// Returns `WorkerErr::IndexOutOfRange` for the first invalid index.
    pub fn rows(&self, indices: &[usize]) -> Result<Batch> {
        if let Some(&index) = indices.iter().find(|&&i| i >= self.len()) {
            return Err(WorkerErr::IndexOutOfRange {
                index,
                len: self.len(),
            });
        }

        let selected = self.data.select(Axis(0), indices);
        let data = match self.transform {
            Some(t) => selected.iter().map(|&x| t.apply(x)).collect(),
            None => selected.iter().copied().collect(),
        };
        let targets = self
            .targets
            .select(Axis(0), indices)
            .iter()
            .copied()
            .collect();

        Ok(Batch {
            data,
            targets,
            rows: indices.len(),
            data_cols: self.data_cols(),
            target_cols: self.target_cols(),
        })
    }
}
