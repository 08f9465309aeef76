/// Failure modes of experiment execution. Retryable variants leave no trace
/// on disk, so a later attempt starts from scratch.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed instance file
    #[error("malformed instance file {file}: {cause}")]
    Parse { file: String, cause: String },

    /// Missing or corrupt stats cache entry; recovered by recomputing
    #[error("stats cache unavailable at {path}: {cause}")]
    StatsUnavailable { path: String, cause: String },

    /// External solver exited nonzero or could not be spawned
    #[error("solver process failed: {0}")]
    SolverProcessFailure(String),

    /// Checker collaborator failed or produced no verdict
    #[error("checker failed: {0}")]
    CheckerFailure(String),

    /// Filesystem failure while persisting
    #[error("io failure at {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

impl Error {
    /// True for failures that are recovered locally rather than surfaced:
    /// a bad stats cache is recomputed, a bad checker verdict leaves the
    /// experiment uncomputed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Error::StatsUnavailable { .. } | Error::CheckerFailure(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
