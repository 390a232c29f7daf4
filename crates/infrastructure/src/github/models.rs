//! Wire types for the GitHub REST v3 endpoints the client touches.

use chrono::{DateTime, Utc};
use domain::{ExistingTag, SyncError, Tagger, TaggerIdentity, TargetTag};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct OrgDto {
    pub login: String,
}

#[derive(Debug, Deserialize)]
pub struct RepoDto {
    pub full_name: String,
}

#[derive(Debug, Deserialize)]
pub struct TeamDto {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct ObjectDto {
    pub sha: String,
}

#[derive(Debug, Deserialize)]
pub struct RefDto {
    pub object: ObjectDto,
}

#[derive(Debug, Deserialize)]
pub struct GitTagDto {
    pub sha: String,
    pub tag: String,
    pub message: String,
    pub tagger: TaggerDto,
    pub object: ObjectDto,
}

impl From<GitTagDto> for ExistingTag {
    fn from(dto: GitTagDto) -> Self {
        ExistingTag {
            sha: dto.sha,
            name: dto.tag,
            message: dto.message,
            tagger: Tagger {
                identity: TaggerIdentity::direct(dto.tagger.name, dto.tagger.email),
                date: dto.tagger.date,
            },
            object_sha: dto.object.sha,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TaggerDto {
    pub name: String,
    pub email: String,
    pub date: DateTime<Utc>,
}

impl TryFrom<&Tagger> for TaggerDto {
    type Error = SyncError;

    fn try_from(tagger: &Tagger) -> Result<Self, SyncError> {
        let (name, email) = tagger.identity.identity()?;
        Ok(Self {
            name: name.to_string(),
            email: email.to_string(),
            date: tagger.date,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct CreateTagBody {
    pub tag: String,
    pub message: String,
    pub object: String,
    #[serde(rename = "type")]
    pub object_type: String,
    pub tagger: TaggerDto,
}

impl CreateTagBody {
    pub fn from_target(tag: &TargetTag) -> Result<Self, SyncError> {
        Ok(Self {
            tag: tag.name.clone(),
            message: tag.message.clone(),
            object: tag.sha.clone(),
            object_type: "commit".to_string(),
            tagger: TaggerDto::try_from(&tag.tagger)?,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct CreateRefBody {
    #[serde(rename = "ref")]
    pub ref_name: String,
    pub sha: String,
}

#[derive(Debug, Serialize)]
pub struct UpdateRefBody {
    pub sha: String,
    pub force: bool,
}

#[derive(Debug, Deserialize)]
pub struct RateLimitDto {
    pub resources: RateLimitResources,
}

#[derive(Debug, Deserialize)]
pub struct RateLimitResources {
    pub core: RateLimitCore,
}

#[derive(Debug, Deserialize)]
pub struct RateLimitCore {
    pub remaining: u64,
    pub limit: u64,
}
