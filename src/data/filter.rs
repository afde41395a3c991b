use log::{debug, warn};

use super::model::{Peak, PeakList};

// ---------------------------------------------------------------------------
// Relative intensity filter
// ---------------------------------------------------------------------------

/// Default relative intensity threshold. Anything above zero passes, which
/// removes the negative (side-chain NH2) peaks of an edited HSQC.
pub const DEFAULT_THRESHOLD: f64 = 0.0;

/// Return the peaks whose relative intensity passes `threshold`.
///
/// Relative intensity is `intensity / max_intensity` over the whole list.
/// A record passes when:
/// * the list carries no intensities at all → every peak passes (plain
///   shift tables have nothing to filter on)
/// * its relative intensity is strictly greater than `threshold` → passes
/// * its intensity is missing while others have one → fails
///
/// If the maximum intensity is not positive nothing passes.
pub fn filter_by_relative_intensity(list: &PeakList, threshold: f64) -> Vec<Peak> {
    let Some(max_intensity) = list.max_intensity() else {
        return list.peaks();
    };
    if max_intensity <= 0.0 {
        warn!("maximum peak intensity is {max_intensity}; no peak passes the intensity filter");
        return Vec::new();
    }

    let kept: Vec<Peak> = list
        .records
        .iter()
        .filter(|r| r.intensity.is_some_and(|i| i / max_intensity > threshold))
        .map(|r| r.peak)
        .collect();

    let removed = list.len() - kept.len();
    if removed > 0 {
        debug!(
            "intensity filter (threshold {threshold}) removed {removed} of {} peaks",
            list.len()
        );
    }
    kept
}
