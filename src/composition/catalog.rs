//! Champion Catalog
//!
//! Immutable champion -> role and champion -> substitutes tables. The
//! catalog carries a version string so a replacement table can be swapped in
//! without touching scoring.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Top,
    Jungle,
    Middle,
    Bottom,
    Utility,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChampionCatalog {
    pub version: String,
    roles: HashMap<String, Role>,
    alternatives: HashMap<String, Vec<String>>,
    #[serde(default = "default_fallback_role")]
    fallback_role: Role,
    #[serde(default = "default_generic_alternatives")]
    generic_alternatives: Vec<String>,
}

fn default_fallback_role() -> Role {
    Role::Middle
}

fn default_generic_alternatives() -> Vec<String> {
    vec!["Alternative 1".to_string(), "Alternative 2".to_string()]
}

impl Default for ChampionCatalog {
    fn default() -> Self {
        let roles = [
            ("Jinx", Role::Bottom),
            ("Caitlyn", Role::Bottom),
            ("Ezreal", Role::Bottom),
            ("Thresh", Role::Utility),
            ("Leona", Role::Utility),
            ("Nautilus", Role::Utility),
            ("Lee Sin", Role::Jungle),
            ("Graves", Role::Jungle),
            ("Zed", Role::Middle),
            ("Ahri", Role::Middle),
            ("Orianna", Role::Middle),
            ("Syndra", Role::Middle),
            ("Darius", Role::Top),
            ("Garen", Role::Top),
            ("Fiora", Role::Top),
            ("Jax", Role::Top),
            ("Camille", Role::Top),
            ("Renekton", Role::Top),
        ]
        .into_iter()
        .map(|(name, role)| (name.to_string(), role))
        .collect();

        let alternatives = [
            ("Jinx", ["Caitlyn", "Tristana", "Aphelios"]),
            ("Caitlyn", ["Jinx", "Ashe", "Jhin"]),
            ("Thresh", ["Nautilus", "Leona", "Blitzcrank"]),
            ("Lee Sin", ["Graves", "Jarvan IV", "Xin Zhao"]),
        ]
        .into_iter()
        .map(|(name, alts)| (name.to_string(), alts.iter().map(|a| a.to_string()).collect()))
        .collect();

        Self {
            version: "builtin-1".to_string(),
            roles,
            alternatives,
            fallback_role: default_fallback_role(),
            generic_alternatives: default_generic_alternatives(),
        }
    }
}

impl ChampionCatalog {
    /// Load a catalog from a JSON file.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read champion catalog {}", path.display()))?;
        let catalog = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse champion catalog {}", path.display()))?;
        Ok(catalog)
    }

    pub fn role_for(&self, champion: &str) -> Role {
        self.roles.get(champion).copied().unwrap_or(self.fallback_role)
    }

    pub fn alternatives_for(&self, champion: &str) -> Vec<String> {
        self.alternatives
            .get(champion)
            .cloned()
            .unwrap_or_else(|| self.generic_alternatives.clone())
    }

    /// Every champion with a known role.
    pub fn champions(&self) -> impl Iterator<Item = &str> {
        self.roles.keys().map(String::as_str)
    }
}
