use config::{Config, ConfigError, Environment};
use serde::{Deserialize, Serialize};

/// Service endpoints and credential location, resolved from defaults and
/// environment variables (e.g. `TAG_SYNC__VERSIONDB_BASE_URL=...`).
/// CLI flags override these after loading.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SyncConfig {
    pub github_api_url: String,
    pub eupstag_base_url: String,
    pub versiondb_base_url: String,
    pub token_path: String,
}

impl SyncConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .set_default("github_api_url", "https://api.github.com")?
            .set_default("eupstag_base_url", "https://eups.lsst.codes/stack/src/tags")?
            .set_default(
                "versiondb_base_url",
                "https://raw.githubusercontent.com/lsst/versiondb/main",
            )?
            .set_default("token_path", "~/.github_token")?
            .add_source(Environment::with_prefix("TAG_SYNC").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
