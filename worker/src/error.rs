use std::{error::Error, fmt, io};

/// The worker module's result type.
pub type Result<T> = std::result::Result<T, WorkerErr>;

/// Worker runtime failures.
#[derive(Debug)]
pub enum WorkerErr {
    Io(io::Error),
    Shape(ndarray::ShapeError),
    RowsMismatch {
        data: usize,
        targets: usize,
    },
    UnknownIdentity {
        id: String,
    },
    UnknownDataset {
        key: String,
    },
    IndexOutOfRange {
        index: usize,
        len: usize,
    },
}

impl fmt::Display for WorkerErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkerErr::Io(e) => write!(f, "io error: {e}"),
            WorkerErr::Shape(e) => write!(f, "shape error: {e}"),
            WorkerErr::RowsMismatch { data, targets } => write!(
                f,
                "data and targets disagree on sample count: {data} vs {targets}"
            ),
            WorkerErr::UnknownIdentity { id } => write!(
                f,
                "unknown worker id {id:?}, expected one of alice, bob, charlie"
            ),
            WorkerErr::UnknownDataset { key } => write!(f, "unknown dataset key: {key}"),
            WorkerErr::IndexOutOfRange { index, len } => {
                write!(f, "sample index {index} is out of range for {len} samples")
            }
        }
    }
}

impl Error for WorkerErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            WorkerErr::Io(e) => Some(e),
            WorkerErr::Shape(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for WorkerErr {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<ndarray::ShapeError> for WorkerErr {
    fn from(value: ndarray::ShapeError) -> Self {
        Self::Shape(value)
    }
}

/// Boundary conversion for binaries / I/O APIs.
impl From<WorkerErr> for io::Error {
    fn from(value: WorkerErr) -> Self {
        match value {
            WorkerErr::Io(e) => e,
            other => io::Error::new(io::ErrorKind::InvalidData, other),
        }
    }
}
