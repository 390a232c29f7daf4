use std::sync::Arc;

use async_trait::async_trait;
use domain::hosting::{HostClient, HostOrg, HostRepo};
use domain::{ExistingTag, SyncError, TagRef, TargetTag};
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::models::{
    CreateRefBody, CreateTagBody, GitTagDto, OrgDto, RateLimitDto, RefDto, RepoDto, TeamDto,
    UpdateRefBody,
};
use crate::http::{check_response, transport_error};

/// GitHub REST client backing the hosting-platform ports.
///
/// Cheap to clone; the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct GithubClient {
    http: reqwest::Client,
    base_url: String,
}

impl GithubClient {
    pub fn new(base_url: &str, token: &str) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert(USER_AGENT, HeaderValue::from_static("tag-sync"));
        let mut auth = HeaderValue::from_str(&format!("token {token}"))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, context: &str) -> Result<T, SyncError> {
        let resp = self
            .http
            .get(self.url(path))
            .send()
            .await
            .map_err(|e| transport_error(context, e))?;
        let resp = check_response(context, resp).await?;
        resp.json().await.map_err(|e| transport_error(context, e))
    }

    /// Like `get_json`, but a 404 becomes `Ok(None)` so callers can treat
    /// absence as data rather than failure.
    async fn get_json_opt<T: DeserializeOwned>(
        &self,
        path: &str,
        context: &str,
    ) -> Result<Option<T>, SyncError> {
        let resp = self
            .http
            .get(self.url(path))
            .send()
            .await
            .map_err(|e| transport_error(context, e))?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let resp = check_response(context, resp).await?;
        resp.json()
            .await
            .map(Some)
            .map_err(|e| transport_error(context, e))
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        context: &str,
    ) -> Result<T, SyncError> {
        let resp = self
            .http
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| transport_error(context, e))?;
        let resp = check_response(context, resp).await?;
        resp.json().await.map_err(|e| transport_error(context, e))
    }

    async fn patch_json<B: Serialize>(
        &self,
        path: &str,
        body: &B,
        context: &str,
    ) -> Result<(), SyncError> {
        let resp = self
            .http
            .patch(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| transport_error(context, e))?;
        check_response(context, resp).await?;
        Ok(())
    }
}

#[async_trait]
impl HostClient for GithubClient {
    async fn get_organization(&self, name: &str) -> Result<Arc<dyn HostOrg>, SyncError> {
        let org: OrgDto = self.get_json(&format!("/orgs/{name}"), name).await?;
        Ok(Arc::new(GithubOrg {
            client: self.clone(),
            login: org.login,
        }))
    }

    async fn rate_limit(&self) -> Option<(u64, u64)> {
        let dto: RateLimitDto = self.get_json("/rate_limit", "rate_limit").await.ok()?;
        Some((dto.resources.core.remaining, dto.resources.core.limit))
    }
}

#[derive(Debug)]
pub struct GithubOrg {
    client: GithubClient,
    login: String,
}

#[async_trait]
impl HostOrg for GithubOrg {
    fn login(&self) -> &str {
        &self.login
    }

    async fn get_repo(&self, name: &str) -> Result<Arc<dyn HostRepo>, SyncError> {
        let path = format!("/repos/{}/{name}", self.login);
        let repo: Option<RepoDto> = self.client.get_json_opt(&path, name).await?;
        match repo {
            Some(repo) => Ok(Arc::new(GithubRepo {
                client: self.client.clone(),
                full_name: repo.full_name,
            })),
            None => Err(SyncError::RepoNotFound {
                product: name.to_string(),
            }),
        }
    }
}

#[derive(Debug)]
pub struct GithubRepo {
    client: GithubClient,
    full_name: String,
}

#[async_trait]
impl HostRepo for GithubRepo {
    fn full_name(&self) -> &str {
        &self.full_name
    }

    async fn team_names(&self) -> Result<Vec<String>, SyncError> {
        let teams: Vec<TeamDto> = self
            .client
            .get_json(&format!("/repos/{}/teams", self.full_name), &self.full_name)
            .await?;
        Ok(teams.into_iter().map(|t| t.name).collect())
    }

    async fn find_tag_ref(&self, tag_name: &str) -> Result<Option<TagRef>, SyncError> {
        let path = format!(
            "/repos/{}/git/ref/tags/{}",
            self.full_name,
            urlencoding::encode(tag_name)
        );
        let found: Option<RefDto> = self.client.get_json_opt(&path, &self.full_name).await?;
        Ok(found.map(|r| TagRef {
            object_sha: r.object.sha,
        }))
    }

    async fn get_git_tag(&self, sha: &str) -> Result<ExistingTag, SyncError> {
        let dto: GitTagDto = self
            .client
            .get_json(
                &format!("/repos/{}/git/tags/{sha}", self.full_name),
                &self.full_name,
            )
            .await?;
        Ok(dto.into())
    }

    async fn create_git_tag(&self, tag: &TargetTag) -> Result<String, SyncError> {
        let body = CreateTagBody::from_target(tag)?;
        let created: GitTagDto = self
            .client
            .post_json(
                &format!("/repos/{}/git/tags", self.full_name),
                &body,
                &self.full_name,
            )
            .await?;
        debug!(repo = %self.full_name, sha = %created.sha, "created tag object");
        Ok(created.sha)
    }

    async fn create_tag_ref(&self, tag_name: &str, sha: &str) -> Result<(), SyncError> {
        let body = CreateRefBody {
            ref_name: format!("refs/tags/{tag_name}"),
            sha: sha.to_string(),
        };
        let _: serde_json::Value = self
            .client
            .post_json(
                &format!("/repos/{}/git/refs", self.full_name),
                &body,
                &self.full_name,
            )
            .await?;
        Ok(())
    }

    async fn force_update_tag_ref(&self, tag_name: &str, sha: &str) -> Result<(), SyncError> {
        let body = UpdateRefBody {
            sha: sha.to_string(),
            force: true,
        };
        self.client
            .patch_json(
                &format!(
                    "/repos/{}/git/refs/tags/{}",
                    self.full_name,
                    urlencoding::encode(tag_name)
                ),
                &body,
                &self.full_name,
            )
            .await
    }
}
