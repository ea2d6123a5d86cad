mod engine;
mod error;
mod types;

pub use engine::{Engine, Session};
pub use error::{CoreError, CoreErrorCode};
pub use types::{
    AbilityEntry, AllocationSummary, ClassSummary, FeatEntry, FeatOption, ItemKind,
    ResolvedInventoryEntry, SkillEntry, Snapshot,
};
