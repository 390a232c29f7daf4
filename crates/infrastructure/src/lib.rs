//! Infrastructure layer - Remote service clients and configuration

pub mod config;
pub mod credentials;
pub mod eups;
pub mod github;
pub mod http;
pub mod versiondb;

pub use config::SyncConfig;
pub use eups::EupsTagSource;
pub use github::GithubClient;
pub use versiondb::VersionDbSource;
