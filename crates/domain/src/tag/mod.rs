pub mod state;
pub mod tagger;
pub mod target;

pub use state::{ExistingTag, TagRef, TagState};
pub use tagger::{Tagger, TaggerIdentity};
pub use target::{TagPlan, TagTemplate, TargetTag};
