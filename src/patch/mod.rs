//! Patch Module
//!
//! Patch identifiers, per-patch performance records and the helpers that
//! derive them from raw match history.

pub mod history;
mod record;
mod version;

pub use history::{meta_impacts, ImpactDirection, MatchRecord, MetaImpact, PatchHistoryBuilder};
pub use record::PatchRecord;
pub use version::PatchVersion;
