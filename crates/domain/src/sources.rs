use async_trait::async_trait;

use crate::error::Result;
use crate::product::{CandidateEntry, ManifestEntry, ProductMap};

/// Tag-candidate record: per-product version strings for a named,
/// reproducible snapshot published by the build/release service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CandidateSource: Send + Sync {
    async fn products(&self, tag: &str) -> Result<ProductMap<CandidateEntry>>;
}

/// Manifest record: exact commit hashes per product for a specific build,
/// published by the dependency build system.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ManifestSource: Send + Sync {
    async fn products(&self, build_id: &str) -> Result<ProductMap<ManifestEntry>>;
}
