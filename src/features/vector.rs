use ndarray::Array1;

use super::grid::{block_offsets, FEATURE_LEN, GRID_SPECS};
use super::matrix::CountMatrix;
use crate::error::{Result, SspError};

/// The model input: three flattened count matrices, concatenated.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    values: Array1<f64>,
}

impl FeatureVector {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        // Array1 built from a Vec is always contiguous
        self.values.as_slice().unwrap_or(&[])
    }

    /// The cells contributed by grid `index` (in [`GRID_SPECS`] order).
    pub fn block(&self, index: usize) -> Option<&[f64]> {
        let spec = GRID_SPECS.get(index)?;
        let start = block_offsets()[index];
        self.as_slice().get(start..start + spec.cells())
    }

    pub fn nonzero(&self) -> usize {
        self.values.iter().filter(|&&v| v != 0.0).count()
    }
}

/// Flatten and concatenate one matrix per grid, in grid order.
///
/// Every matrix must have the shape of its grid and the result must be
/// exactly [`FEATURE_LEN`] long; anything else means the binning constants no
/// longer match the trained model.
pub fn assemble(matrices: &[CountMatrix]) -> Result<FeatureVector> {
    if matrices.len() != GRID_SPECS.len() {
        return Err(SspError::configuration(format!(
            "expected {} count matrices, got {}",
            GRID_SPECS.len(),
            matrices.len()
        )));
    }

    let mut values = Vec::with_capacity(FEATURE_LEN);
    for (matrix, spec) in matrices.iter().zip(GRID_SPECS.iter()) {
        if matrix.shape() != spec.shape() {
            return Err(SspError::configuration(format!(
                "count matrix for grid {} has shape {:?}, expected {:?}",
                spec.name,
                matrix.shape(),
                spec.shape()
            )));
        }
        values.extend(matrix.iter_row_major().map(f64::from));
    }

    if values.len() != FEATURE_LEN {
        return Err(SspError::configuration(format!(
            "feature vector has {} values, expected {FEATURE_LEN}",
            values.len()
        )));
    }

    Ok(FeatureVector {
        values: Array1::from(values),
    })
}
