//! EUPS tag-candidate source: per-product version strings for a named
//! distribution snapshot, published as a plaintext `.list` file.

use async_trait::async_trait;
use domain::sources::CandidateSource;
use domain::{CandidateEntry, ProductMap, SyncError};
use tracing::debug;

use crate::http::{check_response, transport_error};

pub struct EupsTagSource {
    http: reqwest::Client,
    base_url: String,
}

impl EupsTagSource {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl CandidateSource for EupsTagSource {
    async fn products(&self, tag: &str) -> Result<ProductMap<CandidateEntry>, SyncError> {
        let url = format!("{}/{tag}.list", self.base_url);
        debug!(%url, "fetching eups tag list");

        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| transport_error("eupstag", e))?;
        let resp = check_response("eupstag", resp).await?;
        let body = resp.text().await.map_err(|e| transport_error("eupstag", e))?;

        Ok(parse_tag_list(&body))
    }
}

/// EUPS rejects semantic-versioning markup in tag names; dots and hyphens
/// become underscores.
pub fn eups_tag_name(candidate: &str) -> String {
    candidate
        .chars()
        .map(|c| if c == '.' || c == '-' { '_' } else { c })
        .collect()
}

/// Parse a `.list` file: comment and header lines are skipped, data lines
/// are whitespace-separated `product flavor version` columns.
pub fn parse_tag_list(text: &str) -> ProductMap<CandidateEntry> {
    let mut products = ProductMap::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 3 {
            continue;
        }
        // "EUPS distribution <tag> list" header line
        if fields[0] == "EUPS" {
            continue;
        }
        products.insert(
            fields[0].to_string(),
            CandidateEntry {
                eups_version: fields[2].to_string(),
            },
        );
    }

    products
}
