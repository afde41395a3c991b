use log::debug;
use serde::Serialize;

use crate::data::model::Peak;
use crate::error::{Result, SspError};
use crate::features::binning::PairingMode;
use crate::features::featurize;
use crate::features::vector::FeatureVector;
use crate::model::Regressor;

// ---------------------------------------------------------------------------
// Composition result
// ---------------------------------------------------------------------------

/// Predicted secondary structure fractions of one sample.
///
/// The regressor's outputs are in the order coil, sheet, helix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CompositionResult {
    pub coil: f64,
    pub sheet: f64,
    pub helix: f64,
}

impl CompositionResult {
    pub fn from_scores(scores: [f64; 3]) -> Self {
        let [coil, sheet, helix] = scores;
        CompositionResult { coil, sheet, helix }
    }

    /// Fractions rounded to three decimals, then scaled to percent.
    pub fn percentages(&self) -> Percentages {
        Percentages {
            coil: to_percent(self.coil),
            sheet: to_percent(self.sheet),
            helix: to_percent(self.helix),
        }
    }
}

/// Display percentages derived from a [`CompositionResult`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Percentages {
    pub coil: f64,
    pub sheet: f64,
    pub helix: f64,
}

/// Round to three decimals on the exact decimal expansion of `fraction`,
/// then scale. Scaling first would round twice and push values such as
/// 0.2125 (stored just below the half) up a step.
fn to_percent(fraction: f64) -> f64 {
    let rounded = format!("{fraction:.3}").parse::<f64>().unwrap_or(fraction);
    rounded * 100.0
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default)]
pub struct PipelineConfig {
    pub pairing: PairingMode,
}

/// Peak list → feature vector → composition, against a borrowed model.
///
/// Holds no per-sample state, so `run` can be called any number of times with
/// the same model and returns identical results for identical input.
pub struct PredictionPipeline<'m, R: Regressor> {
    model: &'m R,
    config: PipelineConfig,
}

impl<'m, R: Regressor> PredictionPipeline<'m, R> {
    pub fn new(model: &'m R, config: PipelineConfig) -> Self {
        PredictionPipeline { model, config }
    }

    /// Build the 540-value model input for `peaks`.
    pub fn features(&self, peaks: &[Peak]) -> Result<FeatureVector> {
        if peaks.is_empty() {
            return Err(SspError::EmptyInput);
        }
        let features = featurize(peaks, self.config.pairing)?;
        debug!(
            "feature vector: {} non-zero cells from {} peaks",
            features.nonzero(),
            peaks.len()
        );
        Ok(features)
    }

    pub fn run(&self, peaks: &[Peak]) -> Result<CompositionResult> {
        let features = self.features(peaks)?;
        let scores = self.model.predict(&features)?;
        debug!("raw scores (coil, sheet, helix): {scores:?}");
        Ok(CompositionResult::from_scores(scores))
    }
}
