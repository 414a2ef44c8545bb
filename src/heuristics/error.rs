use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading an external reference dataset.
#[derive(Debug, Error)]
pub enum ReferenceDataError {
    #[error("cannot read reference list {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ReferenceDataError {
    pub(crate) fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }
}
