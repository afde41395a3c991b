use log::debug;

use super::grid::GridSpec;
use crate::data::model::Peak;

// ---------------------------------------------------------------------------
// 1D binning
// ---------------------------------------------------------------------------

/// Bin index of a single value, or `None` if it falls outside
/// `[range_min, range_min + bin_count * bin_size)`.
pub fn bin_value(value: f64, bin_size: f64, range_min: f64, bin_count: usize) -> Option<usize> {
    if !value.is_finite() {
        return None;
    }
    // floor, not truncation: values just below range_min must go negative
    let index = ((value - range_min) / bin_size).floor();
    if index < 0.0 || index > (bin_count as f64 - 1.0) {
        return None;
    }
    Some(index as usize)
}

/// Bin every value, silently discarding the out-of-range ones.
///
/// The result keeps the relative order of the retained values but is not
/// positionally aligned with `values` once anything has been dropped.
pub fn bin(values: &[f64], bin_size: f64, range_min: f64, bin_count: usize) -> Vec<usize> {
    values
        .iter()
        .filter_map(|&v| bin_value(v, bin_size, range_min, bin_count))
        .collect()
}

// ---------------------------------------------------------------------------
// Peak pairing
// ---------------------------------------------------------------------------

/// How the two axes of a peak list are turned into index pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PairingMode {
    /// Bin both shifts of a peak together and drop the peak if either one is
    /// out of range.
    #[default]
    Joint,
    /// Bin each axis on its own and zip the survivors by position. Only
    /// equivalent to `Joint` when no peak is dropped on exactly one axis;
    /// kept to reproduce results computed that way.
    Positional,
}

/// Index pairs of one peak list under one grid, plus drop bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinnedPeaks {
    /// `(h_index, n_index)` per retained peak.
    pub pairs: Vec<(usize, usize)>,
    pub dropped_h: usize,
    pub dropped_n: usize,
}

/// Discretize `peaks` for `spec`.
pub fn bin_peaks(peaks: &[Peak], spec: &GridSpec, mode: PairingMode) -> BinnedPeaks {
    let h_size = spec.h_bin_size();
    let n_size = spec.n_bin_size();
    let h_min = spec.h_range.min;
    let n_min = spec.n_range.min;

    let binned = match mode {
        PairingMode::Joint => {
            let mut pairs = Vec::with_capacity(peaks.len());
            let mut dropped_h = 0;
            let mut dropped_n = 0;
            for peak in peaks {
                let h = bin_value(peak.h_shift, h_size, h_min, spec.h_bins);
                let n = bin_value(peak.n_shift, n_size, n_min, spec.n_bins);
                if h.is_none() {
                    dropped_h += 1;
                }
                if n.is_none() {
                    dropped_n += 1;
                }
                if let (Some(h), Some(n)) = (h, n) {
                    pairs.push((h, n));
                }
            }
            BinnedPeaks {
                pairs,
                dropped_h,
                dropped_n,
            }
        }
        PairingMode::Positional => {
            let h_shifts: Vec<f64> = peaks.iter().map(|p| p.h_shift).collect();
            let n_shifts: Vec<f64> = peaks.iter().map(|p| p.n_shift).collect();
            let h_idx = bin(&h_shifts, h_size, h_min, spec.h_bins);
            let n_idx = bin(&n_shifts, n_size, n_min, spec.n_bins);
            BinnedPeaks {
                dropped_h: peaks.len() - h_idx.len(),
                dropped_n: peaks.len() - n_idx.len(),
                pairs: h_idx.into_iter().zip(n_idx).collect(),
            }
        }
    };

    debug!(
        "grid {}: {} of {} peaks retained ({} out of 1H range, {} out of 15N range)",
        spec.name,
        binned.pairs.len(),
        peaks.len(),
        binned.dropped_h,
        binned.dropped_n
    );
    binned
}
