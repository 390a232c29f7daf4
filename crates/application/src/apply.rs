use domain::{PipelineError, ProductMap, TagPlan};
use tracing::{debug, info};

use crate::report::ErrorAggregator;

/// Executes the plan: creates annotated tag objects and creates or
/// force-repoints the tag references.
pub struct TagApplier {
    dry_run: bool,
    fail_fast: bool,
}

impl TagApplier {
    pub fn new(dry_run: bool, fail_fast: bool) -> Self {
        Self {
            dry_run,
            fail_fast,
        }
    }

    /// One repository's failure never aborts tagging of the remaining
    /// repositories (unless fail-fast is configured).
    pub async fn apply(&self, plans: &ProductMap<TagPlan>) -> Result<(), PipelineError> {
        let mut report = ErrorAggregator::new(self.fail_fast);

        for plan in plans.values() {
            let tag = &plan.target_tag;
            info!(
                repo = %plan.resolved.repo.full_name(),
                sha = %tag.sha,
                tag = %tag.name,
                eups_version = %plan.resolved.product.eups_version,
                external = plan.resolved.is_external,
                replace_existing = plan.update_tag,
                "tagging repo"
            );

            if self.dry_run {
                info!("  (noop)");
                continue;
            }

            if let Err(e) = apply_one(plan).await {
                report.collect(e)?;
            }
        }

        report.finish()
    }
}

async fn apply_one(plan: &TagPlan) -> Result<(), domain::SyncError> {
    let repo = plan.resolved.repo.as_ref();
    let tag = &plan.target_tag;

    // 1. Create the annotated tag object pointing at the commit.
    let tag_obj_sha = repo.create_git_tag(tag).await?;
    debug!(sha = %tag_obj_sha, "  created tag object");

    // 2. Point a ref at it: repoint the existing one only when a forced
    // move was planned, otherwise create a brand-new ref.
    if plan.update_tag {
        repo.force_update_tag_ref(&tag.name, &tag_obj_sha).await?;
        debug!(tag = %tag.name, "  updated existing ref");
    } else {
        repo.create_tag_ref(&tag.name, &tag_obj_sha).await?;
        debug!(tag = %tag.name, "  created ref");
    }

    Ok(())
}
