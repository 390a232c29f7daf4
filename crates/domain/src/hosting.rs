use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::tag::{ExistingTag, TagRef, TargetTag};

/// Hosting-platform entry point.
///
/// Implementations should raise `SyncError::RateLimit` as a distinguished
/// error whenever the platform throttles the client; every other remote
/// failure maps to `SyncError::Host` with repository context.
#[async_trait]
pub trait HostClient: Send + Sync {
    async fn get_organization(&self, name: &str) -> Result<Arc<dyn HostOrg>>;

    /// (remaining, limit) of the platform's request quota, if the
    /// platform exposes one. Used only for end-of-run diagnostics.
    async fn rate_limit(&self) -> Option<(u64, u64)>;
}

/// An organization that owns the repositories to be tagged.
#[async_trait]
pub trait HostOrg: std::fmt::Debug + Send + Sync {
    fn login(&self) -> &str;

    /// Resolve a hosted repository by product name.
    /// Returns `SyncError::RepoNotFound` if the org has no such repo.
    async fn get_repo(&self, name: &str) -> Result<Arc<dyn HostRepo>>;
}

/// A single hosted repository. One remote call per method; the pipeline
/// issues them strictly sequentially.
#[async_trait]
pub trait HostRepo: std::fmt::Debug + Send + Sync {
    fn full_name(&self) -> &str;

    /// Names of the teams this repository belongs to.
    async fn team_names(&self) -> Result<Vec<String>>;

    /// Look up `refs/tags/<tag_name>`; `None` if no such ref exists.
    async fn find_tag_ref(&self, tag_name: &str) -> Result<Option<TagRef>>;

    /// Fetch the annotated tag object with the given sha.
    async fn get_git_tag(&self, sha: &str) -> Result<ExistingTag>;

    /// Create a new annotated tag object pointing at a commit.
    /// Returns the sha of the created tag object.
    async fn create_git_tag(&self, tag: &TargetTag) -> Result<String>;

    /// Create a brand-new `refs/tags/<tag_name>` pointing at `sha`.
    async fn create_tag_ref(&self, tag_name: &str, sha: &str) -> Result<()>;

    /// Force-repoint an existing `refs/tags/<tag_name>` at `sha`.
    /// Non-idempotent, history-rewriting; only invoked when a forced
    /// move was explicitly authorized.
    async fn force_update_tag_ref(&self, tag_name: &str, sha: &str) -> Result<()>;
}
