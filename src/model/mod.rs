/// Regressor layer: the pretrained model behind a small trait.
///
/// ```text
///   model file ──load──▶ CatBoostModel (immutable, loaded once)
///                              │
///   FeatureVector (540) ──────▶│ predict ──▶ [coil, sheet, helix]
/// ```

pub mod catboost;

use std::path::Path;

use crate::error::{Result, SspError};
use crate::features::vector::FeatureVector;

pub use catboost::CatBoostModel;

/// Number of model outputs: coil, sheet, helix.
pub const OUTPUT_DIM: usize = 3;

/// A pretrained model mapping one feature vector to three raw scores.
///
/// Implementations must be pure: the same vector always yields the same
/// scores, and `predict` never mutates the model.
pub trait Regressor {
    fn predict(&self, features: &FeatureVector) -> Result<[f64; OUTPUT_DIM]>;
}

/// Load the model artifact at `path`.
///
/// Only CatBoost's JSON export is understood; a binary `.cbm` file has to be
/// re-exported with `save_model(path, format="json")` first.
pub fn load_model(path: &Path) -> Result<CatBoostModel> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "json" => CatBoostModel::load(path),
        "cbm" => Err(SspError::model_load(
            path,
            "binary CatBoost models are not supported; export the model with format=\"json\"",
        )),
        other => Err(SspError::model_load(
            path,
            format!("unsupported model file extension: .{other}"),
        )),
    }
}
