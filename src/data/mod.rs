/// Data layer: peak types, loading, and intensity filtering.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → PeakList
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ PeakList  │  Vec<PeakRecord>: position + optional intensity
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  relative intensity > threshold → Vec<Peak>
///   └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;

use std::path::Path;

use anyhow::Result;

use loader::PeakSourceOptions;
use model::Peak;

/// Load `path` and apply the relative intensity filter.
pub fn load_peaks(path: &Path, opts: &PeakSourceOptions, threshold: f64) -> Result<Vec<Peak>> {
    let list = loader::load_file(path, opts)?;
    Ok(filter::filter_by_relative_intensity(&list, threshold))
}
