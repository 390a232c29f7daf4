use domain::hosting::HostRepo;
use domain::{
    PipelineError, ProductMap, ResolvedProduct, SyncError, TagPlan, TagState, TagTemplate,
    TargetTag,
};
use tracing::{debug, info, warn};

use crate::report::ErrorAggregator;

/// Decides, per resolved product, whether the target tag is already in
/// sync, conflicts with an existing tag, or can be newly created.
pub struct TagPlanner {
    force_tag: bool,
    fail_fast: bool,
}

impl TagPlanner {
    pub fn new(force_tag: bool, fail_fast: bool) -> Self {
        Self {
            force_tag,
            fail_fast,
        }
    }

    /// Returns the mapping of plans requiring action. Products whose tag
    /// is already in sync are skipped without producing a plan.
    pub async fn plan(
        &self,
        products: ProductMap<ResolvedProduct>,
        template: &TagTemplate,
    ) -> Result<ProductMap<TagPlan>, PipelineError> {
        let mut report = ErrorAggregator::new(self.fail_fast);
        let mut plans = ProductMap::new();

        for (name, resolved) in products {
            let target_tag = template.for_product(&resolved.product.sha, resolved.is_external);

            let update_tag = match check_existing_tag(resolved.repo.as_ref(), &target_tag).await {
                Ok(TagState::Absent) => false,
                Ok(TagState::InSync) => {
                    info!(
                        repo = %resolved.repo.full_name(),
                        tag = %target_tag.name,
                        "no action, existing tag is already in sync"
                    );
                    continue;
                }
                Ok(TagState::Conflict(existing)) => {
                    if self.force_tag {
                        warn!(
                            repo = %resolved.repo.full_name(),
                            tag = %target_tag.name,
                            "existing tag WILL BE MOVED"
                        );
                        true
                    } else {
                        report.collect(SyncError::TagConflict {
                            repo: resolved.repo.full_name().to_string(),
                            tag: target_tag.name.clone(),
                            existing_sha: existing.object_sha,
                            existing_message: existing.message,
                            existing_tagger: existing.tagger.to_string(),
                            target_sha: target_tag.sha.clone(),
                            target_message: target_tag.message.clone(),
                            target_tagger: target_tag.tagger.to_string(),
                        })?;
                        continue;
                    }
                }
                Err(e) => {
                    // collect() propagates rate-limit and identity errors
                    // immediately; anything else is a per-repo failure.
                    report.collect(e)?;
                    continue;
                }
            };

            plans.insert(
                name,
                TagPlan {
                    resolved,
                    target_tag,
                    update_tag,
                },
            );
        }

        report.finish()?;
        Ok(plans)
    }
}

/// Look up the target tag name on the repository and classify the result.
pub async fn check_existing_tag(
    repo: &dyn HostRepo,
    target: &TargetTag,
) -> Result<TagState, SyncError> {
    debug!(tag = %target.name, "looking for existing tag");

    let Some(existing_ref) = repo.find_tag_ref(&target.name).await? else {
        debug!(tag = %target.name, "  not found");
        return Ok(TagState::Absent);
    };

    let existing = repo.get_git_tag(&existing_ref.object_sha).await?;
    debug!(tag = %existing.name, sha = %existing.sha, "  found existing tag");

    if existing.in_sync_with(target)? {
        Ok(TagState::InSync)
    } else {
        Ok(TagState::Conflict(existing))
    }
}
