use domain::{
    CandidateEntry, ManifestEntry, PipelineError, ProductMap, ProductVersion, SyncError,
};
use tracing::debug;

use crate::report::ErrorAggregator;

/// Merges the tag-candidate and manifest version records into one
/// per-product record, validating that both sources agree on the
/// version token.
pub struct ProductCrossReferencer {
    ignore_version: bool,
    fail_fast: bool,
}

impl ProductCrossReferencer {
    pub fn new(ignore_version: bool, fail_fast: bool) -> Self {
        Self {
            ignore_version,
            fail_fast,
        }
    }

    /// Cross reference candidate and manifest data and return the merged
    /// result, keyed by product name in candidate order.
    pub fn cross_reference(
        &self,
        candidates: &ProductMap<CandidateEntry>,
        manifest: &ProductMap<ManifestEntry>,
    ) -> Result<ProductMap<ProductVersion>, PipelineError> {
        let mut report = ErrorAggregator::new(self.fail_fast);
        let mut products = ProductMap::new();

        for (name, candidate) in candidates {
            let Some(entry) = manifest.get(name) else {
                report.collect(SyncError::MissingManifestEntry {
                    product: name.clone(),
                    eups_version: candidate.eups_version.clone(),
                })?;
                continue;
            };

            let mut entry = entry.clone();
            if self.ignore_version {
                // Ignore the manifest version string by simply setting it
                // to the candidate value. This ensures the candidate value
                // is passed through.
                entry.eups_version = candidate.eups_version.clone();
            }

            if candidate.eups_version != entry.eups_version {
                report.collect(SyncError::VersionMismatch {
                    product: name.clone(),
                    candidate: candidate.eups_version.clone(),
                    manifest: entry.eups_version.clone(),
                })?;
                continue;
            }

            products.insert(name.clone(), ProductVersion::merged(name, candidate, &entry));
        }

        debug!(
            merged = products.len(),
            candidates = candidates.len(),
            "cross referenced products"
        );

        report.finish()?;
        Ok(products)
    }
}
