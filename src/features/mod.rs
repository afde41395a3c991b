/// Feature layer: peak list -> model input.
///
/// ```text
///   &[Peak]
///      │
///      ▼
///  ┌──────────┐
///  │ binning   │  per grid: (h, n) bin index pairs, out-of-range peaks dropped
///  └──────────┘
///      │  x3 grids
///      ▼
///  ┌──────────┐
///  │ matrix    │  CountMatrix (n_bins x h_bins)
///  └──────────┘
///      │
///      ▼
///  ┌──────────┐
///  │ vector    │  row-major concat → FeatureVector (540)
///  └──────────┘
/// ```

pub mod binning;
pub mod grid;
pub mod matrix;
pub mod vector;

use crate::data::model::Peak;
use crate::error::Result;

use binning::{bin_peaks, PairingMode};
use grid::GRID_SPECS;
use matrix::CountMatrix;
use vector::FeatureVector;

/// One count matrix per grid, in grid order.
pub fn count_matrices(peaks: &[Peak], mode: PairingMode) -> Result<Vec<CountMatrix>> {
    GRID_SPECS
        .iter()
        .map(|spec| {
            let binned = bin_peaks(peaks, spec, mode);
            CountMatrix::from_pairs(binned.pairs, spec.h_bins, spec.n_bins)
        })
        .collect()
}

/// Bin `peaks` on every grid and assemble the feature vector.
pub fn featurize(peaks: &[Peak], mode: PairingMode) -> Result<FeatureVector> {
    vector::assemble(&count_matrices(peaks, mode)?)
}
