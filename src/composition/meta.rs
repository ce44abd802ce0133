use serde::{Deserialize, Serialize};

/// Snapshot of the balance state a composition is scored against.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetaContext {
    pub patch_version: String,
    #[serde(default)]
    pub dominant_champions: Vec<String>,
    #[serde(default)]
    pub dominant_roles: Vec<String>,
    #[serde(default)]
    pub trends: Vec<String>,
}

impl MetaContext {
    pub fn patch_or_latest(&self) -> &str {
        if self.patch_version.trim().is_empty() {
            "latest"
        } else {
            &self.patch_version
        }
    }

    pub fn headline_trend(&self) -> &str {
        self.trends.first().map(String::as_str).unwrap_or("synergy")
    }
}
