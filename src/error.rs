use std::path::PathBuf;
use thiserror::Error;

use crate::constants::{MAX_CELLS, MAX_HZ, MIN_HZ};

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read manifest {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse manifest: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrequencyError {
    #[error("frequency {0} Hz is outside {min}..={max}", min = MIN_HZ, max = MAX_HZ)]
    OutOfRange(i64),
    #[error("frequency {0:?} is not a number")]
    NotANumber(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("cannot lay out {0} cells, at most {max} are supported", max = MAX_CELLS)]
    TooManyCells(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("selection already holds {max} groups", max = MAX_CELLS)]
    Full,
    #[error("unknown group {0:?}")]
    UnknownGroup(String),
}
