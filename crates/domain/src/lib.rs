//! Domain layer - Pure tagging model with no I/O dependencies
//!
//! This crate contains:
//! - Value records (ProductVersion, TargetTag, TagPlan)
//! - The pipeline error taxonomy
//! - Collaborator ports (traits) for the hosting platform and the two
//!   version-record sources
//!
//! Principles:
//! - No dependencies on infrastructure
//! - Entities are immutable; stages copy-and-extend, never mutate
//! - Testable in isolation

pub mod error;
pub mod hosting;
pub mod product;
pub mod sources;
pub mod tag;

// Re-export commonly used types
pub use error::{AggregatedError, PipelineError, SyncError};
pub use product::{CandidateEntry, ManifestEntry, ProductMap, ProductVersion, ResolvedProduct};
pub use tag::{ExistingTag, TagPlan, TagRef, TagState, TagTemplate, Tagger, TaggerIdentity, TargetTag};
