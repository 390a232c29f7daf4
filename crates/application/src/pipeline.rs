use std::sync::Arc;

use domain::hosting::HostClient;
use domain::sources::{CandidateSource, ManifestSource};
use domain::{PipelineError, ProductMap, TagPlan, TagTemplate};
use tracing::{debug, info};

use crate::apply::TagApplier;
use crate::cross_reference::ProductCrossReferencer;
use crate::plan::TagPlanner;
use crate::resolve::RepositoryResolver;

/// Everything the pipeline needs to know about one run.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    pub org: String,
    /// Identifier of the tag-candidate record (already normalized for
    /// the candidate service's naming rules).
    pub candidate: String,
    /// Identifier of the manifest record.
    pub manifest: String,
    pub allow_teams: Vec<String>,
    pub deny_teams: Vec<String>,
    pub external_teams: Vec<String>,
    pub ignore_version: bool,
    pub force_tag: bool,
    pub dry_run: bool,
    pub limit: Option<usize>,
    pub fail_fast: bool,
}

/// The full tagging pipeline: cross-reference, resolve, plan, apply.
///
/// Control flows strictly downstream; each stage consumes the mapping
/// produced by the previous one. Processing is strictly sequential so
/// aggregation order stays deterministic.
pub struct TagPipeline {
    client: Arc<dyn HostClient>,
    candidates: Arc<dyn CandidateSource>,
    manifest: Arc<dyn ManifestSource>,
    opts: SyncOptions,
}

impl TagPipeline {
    pub fn new(
        client: Arc<dyn HostClient>,
        candidates: Arc<dyn CandidateSource>,
        manifest: Arc<dyn ManifestSource>,
        opts: SyncOptions,
    ) -> Self {
        Self {
            client,
            candidates,
            manifest,
            opts,
        }
    }

    /// Run the pipeline to completion. Returns the number of plans that
    /// were applied (or would have been, on a dry run).
    pub async fn run(&self, template: &TagTemplate) -> Result<usize, PipelineError> {
        let opts = &self.opts;

        let org = self.client.get_organization(&opts.org).await?;
        debug!(org = %org.login(), "tagging repos in org");

        let eups_products = self.candidates.products(&opts.candidate).await?;
        let manifest_products = self.manifest.products(&opts.manifest).await?;
        info!(
            candidate = %opts.candidate,
            manifest = %opts.manifest,
            products = eups_products.len(),
            "version records fetched"
        );

        // Read-only passes never fail fast so every product is attempted
        // and reported; --fail-fast applies to the write stage.
        let products = ProductCrossReferencer::new(opts.ignore_version, false)
            .cross_reference(&eups_products, &manifest_products)?;

        let products = match opts.limit {
            Some(n) => {
                let mut capped = products;
                capped.truncate(n);
                capped
            }
            None => products,
        };

        let resolved = RepositoryResolver::new(
            opts.allow_teams.clone(),
            opts.deny_teams.clone(),
            opts.external_teams.clone(),
            false,
        )
        .resolve(org.as_ref(), products)
        .await?;

        let plans: ProductMap<TagPlan> = TagPlanner::new(opts.force_tag, false)
            .plan(resolved, template)
            .await?;

        TagApplier::new(opts.dry_run, opts.fail_fast)
            .apply(&plans)
            .await?;

        Ok(plans.len())
    }
}

/// End-of-run diagnostic: how much of the hosting platform's request
/// quota is left. The binary passes its client handle here after the
/// pipeline finishes, successfully or not.
pub async fn log_rate_limit(client: &dyn HostClient) {
    match client.rate_limit().await {
        Some((remaining, limit)) => {
            debug!(remaining, limit, "hosting platform rate limit");
        }
        None => debug!("hosting platform rate limit unavailable"),
    }
}
