//! Manifest source: exact commit hashes per product for a specific build,
//! published as a plaintext manifest by the dependency build system.

use async_trait::async_trait;
use domain::sources::ManifestSource;
use domain::{ManifestEntry, ProductMap, SyncError};
use tracing::debug;

use crate::http::{check_response, transport_error};

pub struct VersionDbSource {
    http: reqwest::Client,
    base_url: String,
}

impl VersionDbSource {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl ManifestSource for VersionDbSource {
    async fn products(&self, build_id: &str) -> Result<ProductMap<ManifestEntry>, SyncError> {
        let url = format!("{}/manifests/{build_id}.txt", self.base_url);
        debug!(%url, "fetching manifest");

        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| transport_error("versiondb", e))?;
        let resp = check_response("versiondb", resp).await?;
        let body = resp
            .text()
            .await
            .map_err(|e| transport_error("versiondb", e))?;

        Ok(parse_manifest(&body))
    }
}

/// Parse a manifest file: comment, blank, and `BUILD=` lines are skipped,
/// data lines are whitespace-separated `product sha eups_version [deps]`.
pub fn parse_manifest(text: &str) -> ProductMap<ManifestEntry> {
    let mut products = ProductMap::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with("BUILD=") {
            continue;
        }
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 3 {
            continue;
        }
        products.insert(
            fields[0].to_string(),
            ManifestEntry {
                sha: fields[1].to_string(),
                eups_version: fields[2].to_string(),
            },
        );
    }

    products
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_skips_comments_and_build_line() {
        let body = "\
# manifest for build b3595
BUILD=b3595
afw abc123 15.0-9-gabcdef+1 base,utils
pipe_base def456 15.0-3-g123456
";
        let products = parse_manifest(body);
        assert_eq!(products.len(), 2);
        assert_eq!(products["afw"].sha, "abc123");
        assert_eq!(products["afw"].eups_version, "15.0-9-gabcdef+1");
        assert_eq!(products["pipe_base"].sha, "def456");
    }

    #[test]
    fn test_parse_ignores_short_lines() {
        let products = parse_manifest("afw abc123\n");
        assert!(products.is_empty());
    }
}
