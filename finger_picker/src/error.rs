//! Error type for the fallible parts of the core: loading and validating
//! the challenge dataset.  Touch handling itself never fails.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PickerError {
    #[error("failed to read challenge dataset {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid challenge dataset: {0}")]
    Json(#[from] serde_json::Error),

    #[error("challenge id {id} appears more than once in the dataset")]
    DuplicateChallenge { id: u32 },
}

pub type Result<T, E = PickerError> = std::result::Result<T, E>;
