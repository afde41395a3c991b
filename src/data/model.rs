use std::fmt;

// ---------------------------------------------------------------------------
// Peak – one cross peak of the 2D spectrum
// ---------------------------------------------------------------------------

/// Position of a single 1H-15N cross peak in ppm.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Peak {
    /// 1H chemical shift (direct dimension, F2).
    pub h_shift: f64,
    /// 15N chemical shift (indirect dimension, F1).
    pub n_shift: f64,
}

impl Peak {
    pub const fn new(h_shift: f64, n_shift: f64) -> Self {
        Peak { h_shift, n_shift }
    }
}

impl fmt::Display for Peak {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3} ppm 1H, {:.2} ppm 15N)", self.h_shift, self.n_shift)
    }
}

// ---------------------------------------------------------------------------
// PeakRecord – one row of a peak source
// ---------------------------------------------------------------------------

/// A peak as read from a file, with its intensity when the source has one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeakRecord {
    pub peak: Peak,
    pub intensity: Option<f64>,
}

// ---------------------------------------------------------------------------
// PeakList – the complete loaded source
// ---------------------------------------------------------------------------

/// All records of one peak source, in file order.
#[derive(Debug, Clone, Default)]
pub struct PeakList {
    pub records: Vec<PeakRecord>,
}

impl PeakList {
    pub fn from_records(records: Vec<PeakRecord>) -> Self {
        PeakList { records }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// True when every record carries an intensity.
    pub fn has_intensities(&self) -> bool {
        !self.records.is_empty() && self.records.iter().all(|r| r.intensity.is_some())
    }

    pub fn max_intensity(&self) -> Option<f64> {
        self.records
            .iter()
            .filter_map(|r| r.intensity)
            .fold(None, |acc, v| Some(acc.map_or(v, |m: f64| m.max(v))))
    }

    /// Positions only, dropping intensities.
    pub fn peaks(&self) -> Vec<Peak> {
        self.records.iter().map(|r| r.peak).collect()
    }
}
