//! Secondary structure composition from 1H-15N HSQC peak lists.
//!
//! Peaks are binned on three fixed grids, the occupancy counts are flattened
//! into a 540-value feature vector, and a pretrained CatBoost regressor turns
//! that vector into coil / sheet / helix fractions.

pub mod cli;
pub mod data;
pub mod error;
pub mod features;
pub mod model;
pub mod pipeline;
pub mod report;

pub use data::model::Peak;
pub use error::{Result, SspError};
pub use features::binning::PairingMode;
pub use features::vector::FeatureVector;
pub use model::{load_model, CatBoostModel, Regressor};
pub use pipeline::{CompositionResult, PipelineConfig, PredictionPipeline};
