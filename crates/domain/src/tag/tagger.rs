use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SyncError};

/// Tagger identity in one of the two shapes the hosting platform hands
/// back. Comparison normalizes both to a (name, email) pair; any shape
/// that cannot produce one is a programming error and fails loudly
/// instead of silently comparing unequal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaggerIdentity {
    /// Direct name/email fields, as returned on existing tag objects.
    Direct { name: String, email: String },
    /// Keyed field view, as used for tag-creation input payloads.
    /// May carry extra keys (e.g. a date) which identity comparison ignores.
    Keyed { fields: BTreeMap<String, String> },
}

impl TaggerIdentity {
    pub fn direct(name: impl Into<String>, email: impl Into<String>) -> Self {
        TaggerIdentity::Direct {
            name: name.into(),
            email: email.into(),
        }
    }

    /// Extract the (name, email) pair this identity resolves to.
    pub fn identity(&self) -> Result<(&str, &str)> {
        match self {
            TaggerIdentity::Direct { name, email } => Ok((name, email)),
            TaggerIdentity::Keyed { fields } => {
                let name = fields.get("name").ok_or_else(|| SyncError::Identity {
                    message: "keyed tagger identity has no 'name' field".to_string(),
                })?;
                let email = fields.get("email").ok_or_else(|| SyncError::Identity {
                    message: "keyed tagger identity has no 'email' field".to_string(),
                })?;
                Ok((name, email))
            }
        }
    }

    /// Compare two identities, ignoring everything but name and email.
    pub fn matches(&self, other: &TaggerIdentity) -> Result<bool> {
        Ok(self.identity()? == other.identity()?)
    }
}

impl std::fmt::Display for TaggerIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.identity() {
            Ok((name, email)) => write!(f, "{name} <{email}>"),
            Err(_) => write!(f, "<unusable tagger identity>"),
        }
    }
}

/// Who creates a tag, and when. The timestamp is carried for tag creation
/// but never participates in identity comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tagger {
    pub identity: TaggerIdentity,
    pub date: DateTime<Utc>,
}

impl Tagger {
    pub fn new(name: impl Into<String>, email: impl Into<String>, date: DateTime<Utc>) -> Self {
        Self {
            identity: TaggerIdentity::direct(name, email),
            date,
        }
    }
}

impl std::fmt::Display for Tagger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.identity)
    }
}
