/// Errors raised while loading a dataset or configuration.
///
/// The query/pagination core itself never fails: invalid combinations of
/// criteria produce an empty view, and guarded or stale loads are no-ops.
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GridError {
    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("duplicate record id {0}")]
    DuplicateId(u64),
}

pub type Result<T> = std::result::Result<T, GridError>;
