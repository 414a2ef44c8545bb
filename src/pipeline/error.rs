use thiserror::Error;

/// Caller mistakes detected before a batch starts. Per-candidate outcomes
/// are never errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BatchError {
    #[error("no email address found in input")]
    EmptyBatch,
}
