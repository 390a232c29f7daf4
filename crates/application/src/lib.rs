//! Application layer - The tag synchronization pipeline

pub mod apply;
pub mod cross_reference;
pub mod pipeline;
pub mod plan;
pub mod report;
pub mod resolve;

pub use apply::TagApplier;
pub use cross_reference::ProductCrossReferencer;
pub use pipeline::{SyncOptions, TagPipeline, log_rate_limit};
pub use plan::TagPlanner;
pub use report::ErrorAggregator;
pub use resolve::RepositoryResolver;
