//! Hand-rolled mock collaborators for pipeline tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use domain::hosting::{HostClient, HostOrg, HostRepo};
use domain::sources::{CandidateSource, ManifestSource};
use domain::{
    CandidateEntry, ExistingTag, ManifestEntry, ProductMap, SyncError, TagRef, TargetTag,
};

// --- Hosting platform mocks (ports) ---

pub struct MockHost {
    pub org: Arc<MockOrg>,
}

impl MockHost {
    pub fn new(org: Arc<MockOrg>) -> Arc<Self> {
        Arc::new(Self { org })
    }
}

#[async_trait]
impl HostClient for MockHost {
    async fn get_organization(&self, _name: &str) -> Result<Arc<dyn HostOrg>, SyncError> {
        Ok(self.org.clone())
    }

    async fn rate_limit(&self) -> Option<(u64, u64)> {
        Some((4999, 5000))
    }
}

#[derive(Debug)]
pub struct MockOrg {
    login: String,
    repos: Mutex<HashMap<String, Arc<MockRepo>>>,
}

impl MockOrg {
    pub fn new(login: &str) -> Arc<Self> {
        Arc::new(Self {
            login: login.to_string(),
            repos: Mutex::new(HashMap::new()),
        })
    }

    pub fn add_repo(&self, repo: Arc<MockRepo>) {
        let name = repo
            .full_name
            .split('/')
            .next_back()
            .expect("repo full name")
            .to_string();
        self.repos.lock().unwrap().insert(name, repo);
    }
}

#[async_trait]
impl HostOrg for MockOrg {
    fn login(&self) -> &str {
        &self.login
    }

    async fn get_repo(&self, name: &str) -> Result<Arc<dyn HostRepo>, SyncError> {
        match self.repos.lock().unwrap().get(name) {
            Some(repo) => Ok(repo.clone() as Arc<dyn HostRepo>),
            None => Err(SyncError::RepoNotFound {
                product: name.to_string(),
            }),
        }
    }
}

/// Scriptable repository: holds remote state behind mutexes and records
/// every mutation for assertions.
#[derive(Debug)]
pub struct MockRepo {
    pub full_name: String,
    pub teams: Vec<String>,
    pub existing_tag: Mutex<Option<ExistingTag>>,
    pub created_tags: Mutex<Vec<TargetTag>>,
    pub created_refs: Mutex<Vec<(String, String)>>,
    pub updated_refs: Mutex<Vec<(String, String)>>,
    pub fail_lookup: Option<SyncError>,
    pub fail_create: Option<SyncError>,
}

impl MockRepo {
    pub fn new(full_name: &str, teams: &[&str]) -> Self {
        Self {
            full_name: full_name.to_string(),
            teams: teams.iter().map(|t| t.to_string()).collect(),
            existing_tag: Mutex::new(None),
            created_tags: Mutex::new(Vec::new()),
            created_refs: Mutex::new(Vec::new()),
            updated_refs: Mutex::new(Vec::new()),
            fail_lookup: None,
            fail_create: None,
        }
    }

    pub fn with_existing_tag(self, existing: ExistingTag) -> Self {
        *self.existing_tag.lock().unwrap() = Some(existing);
        self
    }

    pub fn with_lookup_failure(mut self, err: SyncError) -> Self {
        self.fail_lookup = Some(err);
        self
    }

    pub fn with_create_failure(mut self, err: SyncError) -> Self {
        self.fail_create = Some(err);
        self
    }

    pub fn build(self) -> Arc<Self> {
        Arc::new(self)
    }
}

#[async_trait]
impl HostRepo for MockRepo {
    fn full_name(&self) -> &str {
        &self.full_name
    }

    async fn team_names(&self) -> Result<Vec<String>, SyncError> {
        Ok(self.teams.clone())
    }

    async fn find_tag_ref(&self, tag_name: &str) -> Result<Option<TagRef>, SyncError> {
        if let Some(err) = &self.fail_lookup {
            return Err(err.clone());
        }
        Ok(self
            .existing_tag
            .lock()
            .unwrap()
            .as_ref()
            .filter(|t| t.name == tag_name)
            .map(|t| TagRef {
                object_sha: t.sha.clone(),
            }))
    }

    async fn get_git_tag(&self, sha: &str) -> Result<ExistingTag, SyncError> {
        self.existing_tag
            .lock()
            .unwrap()
            .as_ref()
            .filter(|t| t.sha == sha)
            .cloned()
            .ok_or_else(|| SyncError::Host {
                context: self.full_name.clone(),
                message: format!("no tag object {sha}"),
            })
    }

    async fn create_git_tag(&self, tag: &TargetTag) -> Result<String, SyncError> {
        if let Some(err) = &self.fail_create {
            return Err(err.clone());
        }
        self.created_tags.lock().unwrap().push(tag.clone());
        Ok(format!("tagobj-{}", tag.sha))
    }

    async fn create_tag_ref(&self, tag_name: &str, sha: &str) -> Result<(), SyncError> {
        self.created_refs
            .lock()
            .unwrap()
            .push((tag_name.to_string(), sha.to_string()));
        Ok(())
    }

    async fn force_update_tag_ref(&self, tag_name: &str, sha: &str) -> Result<(), SyncError> {
        self.updated_refs
            .lock()
            .unwrap()
            .push((tag_name.to_string(), sha.to_string()));
        Ok(())
    }
}

// --- Version record source mocks ---

pub struct StaticCandidates(pub ProductMap<CandidateEntry>);

#[async_trait]
impl CandidateSource for StaticCandidates {
    async fn products(&self, _tag: &str) -> Result<ProductMap<CandidateEntry>, SyncError> {
        Ok(self.0.clone())
    }
}

pub struct StaticManifest(pub ProductMap<ManifestEntry>);

#[async_trait]
impl ManifestSource for StaticManifest {
    async fn products(&self, _build_id: &str) -> Result<ProductMap<ManifestEntry>, SyncError> {
        Ok(self.0.clone())
    }
}

// --- Shared fixtures ---

pub fn candidate_map(entries: &[(&str, &str)]) -> ProductMap<CandidateEntry> {
    entries
        .iter()
        .map(|(name, v)| {
            (
                name.to_string(),
                CandidateEntry {
                    eups_version: v.to_string(),
                },
            )
        })
        .collect()
}

pub fn manifest_map(entries: &[(&str, &str, &str)]) -> ProductMap<ManifestEntry> {
    entries
        .iter()
        .map(|(name, v, sha)| {
            (
                name.to_string(),
                ManifestEntry {
                    eups_version: v.to_string(),
                    sha: sha.to_string(),
                },
            )
        })
        .collect()
}
