//! Engine Errors
//!
//! Typed failure kinds used inside the analyzer, scorer and engine. None of
//! these cross the public boundary: every public operation folds them into
//! its canonical empty result and logs the cause.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("insufficient patch history: {found} records, need at least {required}")]
    InsufficientRecords { found: usize, required: usize },

    #[error("invalid record for patch {patch}: {reason}")]
    InvalidRecord { patch: String, reason: String },

    #[error("player count {0} outside the supported range 2..=5")]
    PlayerCount(usize),

    #[error("synergy matrix is {actual}x{actual}, expected {expected}x{expected}")]
    MatrixShape { expected: usize, actual: usize },

    #[error("no usable composition candidates (empty champion pool?)")]
    NoCandidates,

    #[error("invalid patch version: {0}")]
    InvalidPatchVersion(String),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
