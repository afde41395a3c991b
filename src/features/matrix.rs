use ndarray::Array2;

use crate::error::{Result, SspError};

/// Peak occupancy counts on one grid.
///
/// Shape is `(n_bins, h_bins)`: rows follow the 15N axis, columns the 1H axis.
#[derive(Debug, Clone, PartialEq)]
pub struct CountMatrix {
    counts: Array2<u32>,
}

impl CountMatrix {
    pub fn zeros(h_bins: usize, n_bins: usize) -> Self {
        CountMatrix {
            counts: Array2::zeros((n_bins, h_bins)),
        }
    }

    /// Count aligned `(h_index, n_index)` pairs.
    ///
    /// The two index slices must already be paired by peak; see
    /// [`bin_peaks`](super::binning::bin_peaks). Differing lengths or an index
    /// outside the grid mean the caller's constants are inconsistent.
    pub fn build(
        h_indices: &[usize],
        n_indices: &[usize],
        h_bins: usize,
        n_bins: usize,
    ) -> Result<Self> {
        if h_indices.len() != n_indices.len() {
            return Err(SspError::configuration(format!(
                "unpaired bin indices: {} on 1H vs {} on 15N",
                h_indices.len(),
                n_indices.len()
            )));
        }
        Self::from_pairs(h_indices.iter().copied().zip(n_indices.iter().copied()), h_bins, n_bins)
    }

    pub fn from_pairs(
        pairs: impl IntoIterator<Item = (usize, usize)>,
        h_bins: usize,
        n_bins: usize,
    ) -> Result<Self> {
        let mut matrix = Self::zeros(h_bins, n_bins);
        for (h, n) in pairs {
            let cell = matrix.counts.get_mut((n, h)).ok_or_else(|| {
                SspError::configuration(format!(
                    "bin index (h={h}, n={n}) outside {n_bins}x{h_bins} grid"
                ))
            })?;
            *cell += 1;
        }
        Ok(matrix)
    }

    /// `(rows, cols)` = `(n_bins, h_bins)`.
    pub fn shape(&self) -> (usize, usize) {
        self.counts.dim()
    }

    pub fn get(&self, n_index: usize, h_index: usize) -> Option<u32> {
        self.counts.get((n_index, h_index)).copied()
    }

    /// Number of peaks counted.
    pub fn total(&self) -> u64 {
        self.counts.iter().map(|&c| u64::from(c)).sum()
    }

    /// Cells in row-major order (15N rows outer, 1H columns inner).
    pub fn iter_row_major(&self) -> impl Iterator<Item = u32> + '_ {
        self.counts.iter().copied()
    }

    pub fn as_array(&self) -> &Array2<u32> {
        &self.counts
    }
}
