use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::hosting::HostRepo;

/// Ordered mapping keyed by product name, preserving first-appearance order.
/// Every pipeline stage consumes one of these and re-emits a (possibly
/// smaller) mapping of the same shape.
pub type ProductMap<T> = IndexMap<String, T>;

/// Per-product entry from the tag-candidate record (build/release service).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateEntry {
    pub eups_version: String,
}

/// Per-product entry from the manifest record (dependency build system).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub eups_version: String,
    pub sha: String,
}

/// Result of cross-referencing a candidate entry against a manifest entry.
///
/// The merge only succeeds when a manifest entry exists, so the commit sha
/// is always present here (unlike the two source records, where only the
/// manifest side carries it).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductVersion {
    pub name: String,
    pub eups_version: String,
    pub sha: String,
}

impl ProductVersion {
    /// Merge a candidate entry with its manifest counterpart.
    /// Manifest fields extend candidate fields; the caller has already
    /// validated that the version tokens agree.
    pub fn merged(name: impl Into<String>, candidate: &CandidateEntry, manifest: &ManifestEntry) -> Self {
        Self {
            name: name.into(),
            eups_version: candidate.eups_version.clone(),
            sha: manifest.sha.clone(),
        }
    }
}

/// A product version bound to its hosted repository after the team
/// membership policy check passed.
#[derive(Clone)]
pub struct ResolvedProduct {
    pub product: ProductVersion,
    pub repo: Arc<dyn HostRepo>,
    /// True if the repository belongs to at least one configured
    /// "external" team. External repos follow a different tag naming
    /// convention (no leading digit).
    pub is_external: bool,
}

impl std::fmt::Debug for ResolvedProduct {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedProduct")
            .field("product", &self.product)
            .field("repo", &self.repo.full_name())
            .field("is_external", &self.is_external)
            .finish()
    }
}
