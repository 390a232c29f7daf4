use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::tag::tagger::Tagger;
use crate::tag::target::TargetTag;

/// A tag reference (`refs/tags/<name>`) as seen on the hosting platform.
/// `object_sha` is the sha of the annotated tag object the ref points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagRef {
    pub object_sha: String,
}

/// An existing annotated tag object fetched from a repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExistingTag {
    /// Sha of the tag object itself.
    pub sha: String,
    pub name: String,
    pub message: String,
    pub tagger: Tagger,
    /// Sha of the commit the tag object points at.
    pub object_sha: String,
}

impl ExistingTag {
    /// An existing tag is in sync when its commit sha, message, and tagger
    /// identity all match the target. Timestamps are ignored.
    pub fn in_sync_with(&self, target: &TargetTag) -> Result<bool> {
        Ok(self.object_sha == target.sha
            && self.message == target.message
            && self.tagger.identity.matches(&target.tagger.identity)?)
    }
}

/// Outcome of looking up the target tag name on a repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagState {
    /// No reference with the target name exists.
    Absent,
    /// The existing tag matches the target exactly; nothing to do.
    InSync,
    /// The existing tag differs from the target.
    Conflict(ExistingTag),
}
