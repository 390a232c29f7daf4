use domain::hosting::HostOrg;
use domain::{PipelineError, ProductMap, ProductVersion, ResolvedProduct, SyncError};
use tracing::debug;

use crate::report::ErrorAggregator;

/// Maps each cross-referenced product to a hosted repository, enforcing
/// the allow/deny team-membership policy and flagging external products.
pub struct RepositoryResolver {
    allow_teams: Vec<String>,
    deny_teams: Vec<String>,
    external_teams: Vec<String>,
    fail_fast: bool,
}

impl RepositoryResolver {
    pub fn new(
        allow_teams: Vec<String>,
        deny_teams: Vec<String>,
        external_teams: Vec<String>,
        fail_fast: bool,
    ) -> Self {
        Self {
            allow_teams,
            deny_teams,
            external_teams,
            fail_fast,
        }
    }

    pub async fn resolve(
        &self,
        org: &dyn HostOrg,
        products: ProductMap<ProductVersion>,
    ) -> Result<ProductMap<ResolvedProduct>, PipelineError> {
        debug!(allow = ?self.allow_teams, deny = ?self.deny_teams, external = ?self.external_teams, "team policy");

        let mut report = ErrorAggregator::new(self.fail_fast);
        let mut resolved = ProductMap::new();

        for (name, product) in products {
            debug!(product = %name, version = %product.eups_version, "looking for git repo");

            let repo = match org.get_repo(&name).await {
                Ok(repo) => repo,
                Err(e) => {
                    report.collect(e)?;
                    continue;
                }
            };
            debug!(repo = %repo.full_name(), "  found");

            let team_names = match repo.team_names().await {
                Ok(teams) => teams,
                Err(e) => {
                    report.collect(e)?;
                    continue;
                }
            };
            debug!(teams = ?team_names, "  teams");

            if let Err(e) = self.check_team_policy(repo.full_name(), &team_names) {
                report.collect(e)?;
                continue;
            }

            let is_external = team_names
                .iter()
                .any(|t| self.external_teams.contains(t));
            debug!(external = is_external, "  external repo");

            resolved.insert(
                name,
                ResolvedProduct {
                    product,
                    repo,
                    is_external,
                },
            );
        }

        report.finish()?;
        Ok(resolved)
    }

    /// Policy, in order: (1) the repo's teams must intersect the
    /// allow-list; (2) they must not intersect the deny-list.
    fn check_team_policy(&self, repo: &str, team_names: &[String]) -> Result<(), SyncError> {
        if !team_names.iter().any(|t| self.allow_teams.contains(t)) {
            return Err(SyncError::TeamPolicy {
                repo: repo.to_string(),
                teams: team_names.to_vec(),
                reason: format!("not a member of any allowed team {:?}", self.allow_teams),
            });
        }

        let denied: Vec<&String> = team_names
            .iter()
            .filter(|t| self.deny_teams.contains(t))
            .collect();
        if !denied.is_empty() {
            return Err(SyncError::TeamPolicy {
                repo: repo.to_string(),
                teams: team_names.to_vec(),
                reason: format!("member of denied team(s) {denied:?}"),
            });
        }

        Ok(())
    }
}
