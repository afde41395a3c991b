use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the prediction core.
///
/// Every variant is fatal for the sample being processed: the pipeline never
/// hands back a partial composition.
#[derive(Debug, Error)]
pub enum SspError {
    /// No peaks were supplied at all.
    #[error("no peaks to bin: the peak list is empty")]
    EmptyInput,

    /// Pipeline constants disagree with each other or with the loaded model.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The pretrained model artifact could not be loaded.
    #[error("failed to load model from {}: {reason}", path.display())]
    ModelLoad { path: PathBuf, reason: String },
}

impl SspError {
    pub(crate) fn configuration(msg: impl Into<String>) -> Self {
        SspError::Configuration(msg.into())
    }

    pub(crate) fn model_load(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        SspError::ModelLoad {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SspError>;
