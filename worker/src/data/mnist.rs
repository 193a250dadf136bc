//! MNIST loading from the IDX files distributed at
//! <http://yann.lecun.com/exdb/mnist/>.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use ndarray::Array2;

use super::dataset::{Normalize, TensorDataset};
use crate::error::Result;

const IMAGES_MAGIC: u32 = 2051;
const LABELS_MAGIC: u32 = 2049;

/// The usual MNIST standardization constants.
pub const MNIST_NORMALIZE: Normalize = Normalize {
    mean: 0.1307,
    std: 0.3081,
};

fn read_u32<R: Read>(reader: &mut R) -> io::Result<u32> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(u32::from_be_bytes(buf))
}

fn check_magic_number<R: Read>(reader: &mut R, expected: u32) -> io::Result<()> {
    let magic = read_u32(reader)?;
    if magic != expected {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("incorrect magic number {magic} != {expected}"),
        ));
    }
    Ok(())
}

fn read_labels<R: Read>(reader: &mut R) -> Result<Array2<f32>> {
    check_magic_number(reader, LABELS_MAGIC)?;
    let samples = read_u32(reader)? as usize;
    let mut data = vec![0u8; samples];
    reader.read_exact(&mut data)?;

    let labels = data.into_iter().map(f32::from).collect();
    Ok(Array2::from_shape_vec((samples, 1), labels)?)
}

fn read_images<R: Read>(reader: &mut R) -> Result<(Array2<f32>, Vec<usize>)> {
    check_magic_number(reader, IMAGES_MAGIC)?;
    let samples = read_u32(reader)? as usize;
    let rows = read_u32(reader)? as usize;
    let cols = read_u32(reader)? as usize;
    let mut data = vec![0u8; samples * rows * cols];
    reader.read_exact(&mut data)?;

    let pixels = data.into_iter().map(|p| f32::from(p) / 255.0).collect();
    let images = Array2::from_shape_vec((samples, rows * cols), pixels)?;
    Ok((images, vec![rows, cols]))
}

/// Loads the MNIST training split from `dir` as a `TensorDataset`.
///
/// Pixels are scaled to `[0, 1]` and flattened row major; the standardization
/// transform is attached but only applied when rows are fetched. A missing
/// file surfaces as the underlying `io::Error`.
pub fn load_train(dir: &Path) -> Result<TensorDataset> {
    let mut images = BufReader::new(File::open(dir.join("train-images-idx3-ubyte"))?);
    let (data, shape) = read_images(&mut images)?;

    let mut labels = BufReader::new(File::open(dir.join("train-labels-idx1-ubyte"))?);
    let targets = read_labels(&mut labels)?;

    TensorDataset::new(data, targets)?
        .with_transform(MNIST_NORMALIZE)
        .with_data_shape(shape)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn idx_images(samples: u32, rows: u32, cols: u32, pixels: &[u8]) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(&IMAGES_MAGIC.to_be_bytes());
        buf.extend_from_slice(&samples.to_be_bytes());
        buf.extend_from_slice(&rows.to_be_bytes());
        buf.extend_from_slice(&cols.to_be_bytes());
        buf.extend_from_slice(pixels);
        buf
    }

    fn idx_labels(labels: &[u8]) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(&LABELS_MAGIC.to_be_bytes());
        buf.extend_from_slice(&(labels.len() as u32).to_be_bytes());
        buf.extend_from_slice(labels);
        buf
    }

    #[test]
    fn images_are_scaled_and_flattened() {
        let raw = idx_images(2, 2, 2, &[0, 51, 102, 153, 204, 255, 0, 255]);
        let (images, shape) = read_images(&mut Cursor::new(raw)).unwrap();

        assert_eq!(images.shape(), &[2, 4]);
        assert_eq!(shape, vec![2, 2]);
        assert_eq!(images[[0, 0]], 0.0);
        assert_eq!(images[[0, 1]], 0.2);
        assert_eq!(images[[1, 3]], 1.0);
    }

    #[test]
    fn labels_become_a_single_column() {
        let raw = idx_labels(&[3, 1, 4]);
        let labels = read_labels(&mut Cursor::new(raw)).unwrap();

        assert_eq!(labels.shape(), &[3, 1]);
        assert_eq!(labels[[0, 0]], 3.0);
        assert_eq!(labels[[2, 0]], 4.0);
    }

    #[test]
    fn wrong_magic_number_is_rejected() {
        let mut raw = idx_labels(&[1]);
        raw[3] = 0xff;
        let err = read_labels(&mut Cursor::new(raw)).unwrap_err();
        assert!(err.to_string().contains("magic number"));
    }

    #[test]
    fn truncated_pixel_data_is_an_io_error() {
        let raw = idx_images(2, 2, 2, &[1, 2, 3]);
        assert!(read_images(&mut Cursor::new(raw)).is_err());
    }
}
