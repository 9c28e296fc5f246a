use std::{fs, path::Path};

use log::debug;
use ndarray::{Array2, ArrayView2, Axis};
use rand::Rng;
use rand_distr::StandardNormal;

use crate::{MlErr, Result};

/// A dataset fully held in memory, as a matrix of inputs and a matrix of targets.
#[derive(Debug, Clone)]
pub struct InMemoryDataset {
    x: Array2<f32>,
    y: Array2<f32>,
}

impl InMemoryDataset {
    /// Creates a new `InMemoryDataset`.
    ///
    /// # Arguments
    /// * `x` - The inputs, one sample per row.
    /// * `y` - The targets, one sample per row.
    ///
    /// # Returns
    /// A new `InMemoryDataset` or an error if the amount of rows differ.
    pub fn new(x: Array2<f32>, y: Array2<f32>) -> Result<Self> {
        if x.nrows() != y.nrows() {
            return Err(MlErr::SizeMismatch {
                what: "dataset targets",
                got: y.nrows(),
                expected: x.nrows(),
            });
        }

        Ok(Self { x, y })
    }

    /// Generates random classification data: standard normal features and uniformly
    /// drawn, one hot encoded classes.
    ///
    /// # Arguments
    /// * `samples` - The amount of rows.
    /// * `features` - The width of every input row.
    /// * `classes` - The amount of classes, must be at least one.
    /// * `rng` - The source of randomness.
    pub fn synthetic_classification<R: Rng>(
        samples: usize,
        features: usize,
        classes: usize,
        rng: &mut R,
    ) -> Result<Self> {
        if classes == 0 {
            return Err(MlErr::InvalidConfig("amount of classes must be non zero".into()));
        }

        let x: Array2<f32> =
            Array2::from_shape_simple_fn((samples, features), || rng.sample(StandardNormal));
        let labels: Vec<_> = (0..samples).map(|_| rng.random_range(0..classes)).collect();

        Self::new(x, one_hot(&labels, classes)?)
    }

    /// Reads a comma separated file where every line is a sample: the features followed by
    /// the integer class label. Blank lines are skipped.
    ///
    /// # Arguments
    /// * `path` - The path to the file.
    /// * `classes` - The amount of classes, labels must be in `0..classes`.
    pub fn from_csv<P: AsRef<Path>>(path: P, classes: usize) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;

        let mut features = Vec::new();
        let mut labels = Vec::new();
        let mut width = None;

        for (i, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let lineno = i + 1;
            let values = line
                .split(',')
                .map(|v| v.trim().parse::<f32>())
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(|e| MlErr::Dataset(format!("line {lineno}: {e}")))?;

            let Some((&label, row)) = values.split_last() else {
                continue;
            };

            if label < 0. || label.fract() != 0. || label as usize >= classes {
                return Err(MlErr::Dataset(format!(
                    "line {lineno}: label {label} is not a class in 0..{classes}"
                )));
            }

            match width {
                None => width = Some(row.len()),
                Some(w) if w != row.len() => {
                    return Err(MlErr::Dataset(format!(
                        "line {lineno}: expected {w} features, got {}",
                        row.len()
                    )));
                }
                _ => {}
            }

            features.extend_from_slice(row);
            labels.push(label as usize);
        }

        let width = width.ok_or_else(|| {
            MlErr::Dataset(format!("{} contains no samples", path.display()))
        })?;

        debug!(samples = labels.len(), features = width; "loaded csv dataset");

        let x = Array2::from_shape_vec((labels.len(), width), features)?;
        Self::new(x, one_hot(&labels, classes)?)
    }

    /// Returns the amount of samples.
    pub fn len(&self) -> usize {
        self.x.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the width of the input rows.
    pub fn x_size(&self) -> usize {
        self.x.ncols()
    }

    /// Returns the width of the target rows.
    pub fn y_size(&self) -> usize {
        self.y.ncols()
    }

    pub fn x(&self) -> ArrayView2<'_, f32> {
        self.x.view()
    }

    pub fn y(&self) -> ArrayView2<'_, f32> {
        self.y.view()
    }

    /// Copies out the rows at `indices`, in that order.
    pub(super) fn select(&self, indices: &[usize]) -> (Array2<f32>, Array2<f32>) {
        (
            self.x.select(Axis(0), indices),
            self.y.select(Axis(0), indices),
        )
    }
}

/// Encodes every label as a row with a single `1` at the label's column.
///
/// # Returns
/// The `[labels, classes]` matrix or an error if a label is out of range.
pub fn one_hot(labels: &[usize], classes: usize) -> Result<Array2<f32>> {
    let mut y = Array2::zeros((labels.len(), classes));

    for (mut row, &label) in y.rows_mut().into_iter().zip(labels) {
        if label >= classes {
            return Err(MlErr::Dataset(format!(
                "label {label} is not a class in 0..{classes}"
            )));
        }

        row[label] = 1.;
    }

    Ok(y)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use ndarray::array;
    use rand::{SeedableRng, rngs::StdRng};
    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn one_hot_rows() {
        let y = one_hot(&[2, 0], 3).unwrap();
        assert_eq!(y, array![[0., 0., 1.], [1., 0., 0.]]);
        assert!(one_hot(&[3], 3).is_err());
    }

    #[test]
    fn synthetic_shapes_and_determinism() {
        let a = InMemoryDataset::synthetic_classification(
            20,
            5,
            4,
            &mut StdRng::seed_from_u64(1),
        )
        .unwrap();
        let b = InMemoryDataset::synthetic_classification(
            20,
            5,
            4,
            &mut StdRng::seed_from_u64(1),
        )
        .unwrap();

        assert_eq!(a.len(), 20);
        assert_eq!(a.x_size(), 5);
        assert_eq!(a.y_size(), 4);
        assert_eq!(a.x(), b.x());
        assert!(a.y().rows().into_iter().all(|r| r.sum() == 1.));
    }

    #[test]
    fn csv_last_column_is_label() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "0.5, 1.0, 1").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "-1,2,0").unwrap();

        let ds = InMemoryDataset::from_csv(file.path(), 2).unwrap();
        assert_eq!(ds.x(), array![[0.5, 1.], [-1., 2.]]);
        assert_eq!(ds.y(), array![[0., 1.], [1., 0.]]);
    }

    #[test]
    fn csv_errors_name_the_line() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "1,2,0").unwrap();
        writeln!(file, "1,x,0").unwrap();

        let err = InMemoryDataset::from_csv(file.path(), 2).unwrap_err();
        assert!(err.to_string().contains("line 2"));

        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "1,2,0").unwrap();
        writeln!(file, "1,0").unwrap();

        let err = InMemoryDataset::from_csv(file.path(), 2).unwrap_err();
        assert!(err.to_string().contains("line 2"));

        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "1,2,5").unwrap();
        assert!(InMemoryDataset::from_csv(file.path(), 2).is_err());
    }

    #[test]
    fn empty_csv() {
        let file = NamedTempFile::new().unwrap();
        assert!(matches!(
            InMemoryDataset::from_csv(file.path(), 2),
            Err(MlErr::Dataset(_))
        ));
    }
}
