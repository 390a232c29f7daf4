use thiserror::Error;

/// Per-product failures raised by the tagging pipeline
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SyncError {
    #[error("failed to find record in manifest for: {product} {eups_version}")]
    MissingManifestEntry { product: String, eups_version: String },

    #[error(
        "eups version string mismatch:\n  eups tag: {product} {candidate}\n  manifest: {product} {manifest}"
    )]
    VersionMismatch {
        product: String,
        candidate: String,
        manifest: String,
    },

    #[error("repository not found for product: {product}")]
    RepoNotFound { product: String },

    #[error("team membership policy violation for {repo}: {reason} (member of: {teams:?})")]
    TeamPolicy {
        repo: String,
        teams: Vec<String>,
        reason: String,
    },

    #[error(
        "tag {tag} already exists on {repo} with conflicting values:\n  existing:\n    sha: {existing_sha}\n    message: {existing_message}\n    tagger: {existing_tagger}\n  target:\n    sha: {target_sha}\n    message: {target_message}\n    tagger: {target_tagger}"
    )]
    TagConflict {
        repo: String,
        tag: String,
        existing_sha: String,
        existing_message: String,
        existing_tagger: String,
        target_sha: String,
        target_message: String,
        target_tagger: String,
    },

    /// Generic remote failure, wrapped with enough context to diagnose
    /// without re-running.
    #[error("host error [{context}]: {message}")]
    Host { context: String, message: String },

    /// Continuing after this is guaranteed to fail every remaining item,
    /// so it is never aggregated.
    #[error("hosting platform rate limit exceeded: {message}")]
    RateLimit { message: String },

    /// A tagger representation that cannot be compared. This indicates a
    /// programming error rather than a data problem.
    #[error("unusable tagger identity: {message}")]
    Identity { message: String },
}

impl SyncError {
    /// Fatal errors bypass aggregation and abort the run immediately.
    pub fn is_fatal(&self) -> bool {
        matches!(self, SyncError::RateLimit { .. } | SyncError::Identity { .. })
    }
}

/// Ordered bundle of per-item failures raised once per stage.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{} product(s) have errors", failures.len())]
pub struct AggregatedError {
    pub failures: Vec<SyncError>,
}

impl AggregatedError {
    pub fn new(failures: Vec<SyncError>) -> Self {
        Self { failures }
    }

    pub fn count(&self) -> usize {
        self.failures.len()
    }

    /// Process exit code: number of aggregated errors, capped at 255.
    pub fn exit_code(&self) -> u8 {
        self.failures.len().min(255) as u8
    }
}

/// Stage-level outcome: either a single fatal error or an end-of-pass bundle.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    #[error(transparent)]
    Fatal(#[from] SyncError),

    #[error(transparent)]
    Aggregated(#[from] AggregatedError),
}

pub type Result<T> = std::result::Result<T, SyncError>;
