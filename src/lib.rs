//! Synergy Scope
//!
//! Player analytics for team-based competitive games:
//! - Patch adaptation analysis (transitions, adaptation periods, resilience)
//! - Player chemistry from co-play synergy scores
//! - Team composition prediction from champion pools and player synergy
//! - Pluggable collaborators for history, graphs, inference and narration

pub mod adaptation;
pub mod chemistry;
pub mod composition;
pub mod config;
pub mod engine;
pub mod error;
pub mod patch;
pub mod providers;
pub mod utils;

// Re-exports for convenience
pub use adaptation::{AdaptationAnalyzer, AdaptationReport};
pub use chemistry::ChemistryReport;
pub use composition::{CompositionScorer, PredictionReport};
pub use config::{ConfigManager, EngineConfig};
pub use engine::{Collaborators, SynergyEngine};
pub use error::EngineError;
pub use patch::{PatchRecord, PatchVersion};
