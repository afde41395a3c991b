// ---------------------------------------------------------------------------
// Grid constants of the deployed model
// ---------------------------------------------------------------------------

/// Half-open coordinate range `[min, max)` of one spectral axis in ppm.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
}

/// 1H axis range.
pub const H_RANGE: AxisRange = AxisRange { min: 6.0, max: 11.0 };

/// 15N axis range.
pub const N_RANGE: AxisRange = AxisRange { min: 90.0, max: 140.0 };

/// One fixed binning resolution: an `n_bins x h_bins` count matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSpec {
    pub name: &'static str,
    pub h_bins: usize,
    pub n_bins: usize,
    pub h_range: AxisRange,
    pub n_range: AxisRange,
}

impl GridSpec {
    pub const fn new(name: &'static str, h_bins: usize, n_bins: usize) -> Self {
        GridSpec {
            name,
            h_bins,
            n_bins,
            h_range: H_RANGE,
            n_range: N_RANGE,
        }
    }

    pub fn h_bin_size(&self) -> f64 {
        (self.h_range.max - self.h_range.min) / self.h_bins as f64
    }

    pub fn n_bin_size(&self) -> f64 {
        (self.n_range.max - self.n_range.min) / self.n_bins as f64
    }

    /// Matrix shape as `(rows, cols)` = `(n_bins, h_bins)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.n_bins, self.h_bins)
    }

    pub fn cells(&self) -> usize {
        self.h_bins * self.n_bins
    }
}

/// The three grids, in the order the regressor was trained with.
///
/// Changing anything here (counts, ranges, order) invalidates the shipped
/// model.
pub const GRID_SPECS: [GridSpec; 3] = [
    GridSpec::new("20x10", 10, 20),
    GridSpec::new("26x10", 10, 26),
    GridSpec::new("10x8", 8, 10),
];

/// Length of the assembled feature vector.
pub const FEATURE_LEN: usize = 540;

/// Start offset of each grid's block inside the feature vector.
pub fn block_offsets() -> [usize; 3] {
    let mut offsets = [0; 3];
    let mut acc = 0;
    for (slot, spec) in offsets.iter_mut().zip(GRID_SPECS.iter()) {
        *slot = acc;
        acc += spec.cells();
    }
    offsets
}
