use crate::error::DataLoadError;

/// Dense N×D matrix of character embeddings, stored row-major.
///
/// Row `i` belongs to the catalog record at index `i`. Every value is finite
/// and every row has the same dimension `D > 0`.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorMatrix {
    rows: usize,
    dims: usize,
    data: Vec<f32>,
}

impl VectorMatrix {
    /// Build a matrix from a flat row-major buffer.
    pub fn from_flat(rows: usize, dims: usize, data: Vec<f32>) -> Result<Self, DataLoadError> {
        if dims == 0 {
            return Err(DataLoadError::ZeroDimension);
        }
        let expected = rows.checked_mul(dims).unwrap_or(usize::MAX);
        if data.len() != expected {
            // A short final row is the only way a flat buffer can disagree.
            return Err(DataLoadError::InconsistentDimension {
                row: data.len() / dims,
                expected: dims,
                found: data.len() % dims,
            });
        }
        if let Some(pos) = data.iter().position(|v| !v.is_finite()) {
            return Err(DataLoadError::NonFinite {
                row: pos / dims,
                column: pos % dims,
            });
        }
        Ok(Self { rows, dims, data })
    }

    /// Build a matrix from individual rows, checking that they agree in
    /// length.
    pub fn from_rows(rows: Vec<Vec<f32>>) -> Result<Self, DataLoadError> {
        let dims = rows.first().map(Vec::len).ok_or(DataLoadError::ZeroDimension)?;
        if dims == 0 {
            return Err(DataLoadError::ZeroDimension);
        }

        let count = rows.len();
        let mut data = Vec::with_capacity(count * dims);
        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != dims {
                return Err(DataLoadError::InconsistentDimension {
                    row,
                    expected: dims,
                    found: values.len(),
                });
            }
            data.extend(values);
        }

        Self::from_flat(count, dims, data)
    }

    /// Number of rows (N).
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Embedding dimension (D).
    pub fn dims(&self) -> usize {
        self.dims
    }

    pub fn row(&self, index: usize) -> Option<&[f32]> {
        if index >= self.rows {
            return None;
        }
        let start = index * self.dims;
        Some(&self.data[start..start + self.dims])
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[f32]> {
        self.data.chunks_exact(self.dims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rows() {
        let m = VectorMatrix::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]])
            .unwrap();
        assert_eq!(m.rows(), 3);
        assert_eq!(m.dims(), 2);
        assert_eq!(m.row(1), Some(&[3.0, 4.0][..]));
        assert_eq!(m.row(3), None);
        assert_eq!(m.iter_rows().count(), 3);
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let err = VectorMatrix::from_rows(vec![vec![1.0, 2.0], vec![3.0]]).unwrap_err();
        assert!(matches!(
            err,
            DataLoadError::InconsistentDimension {
                row: 1,
                expected: 2,
                found: 1
            }
        ));
    }

    #[test]
    fn test_zero_dimension_rejected() {
        assert!(matches!(
            VectorMatrix::from_rows(vec![vec![], vec![]]),
            Err(DataLoadError::ZeroDimension)
        ));
        assert!(matches!(
            VectorMatrix::from_rows(Vec::new()),
            Err(DataLoadError::ZeroDimension)
        ));
    }

    #[test]
    fn test_non_finite_rejected() {
        let err = VectorMatrix::from_rows(vec![vec![1.0, 0.0], vec![0.0, f32::NAN]]).unwrap_err();
        assert!(matches!(err, DataLoadError::NonFinite { row: 1, column: 1 }));
    }

    #[test]
    fn test_from_flat_length_mismatch() {
        let err = VectorMatrix::from_flat(2, 3, vec![0.0; 5]).unwrap_err();
        assert!(matches!(err, DataLoadError::InconsistentDimension { .. }));
    }
}
