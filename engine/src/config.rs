use std::{fs, path::Path};

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::collab::{MonsterRegistry, PreferenceStore};
use crate::error::CcsError;

/// Reference data for a matching session: which monsters are known and the
/// preference values (notably `lastAdventure`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SessionConfig {
    #[serde(default)]
    pub monsters: Vec<String>,
    #[serde(default)]
    pub preferences: IndexMap<String, String>,
}

impl SessionConfig {
    /// Reads YAML for `.yaml`/`.yml` paths and JSON for anything else.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read session config: {}", path.display()))?;
        let yaml = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml" | "yml")
        );
        let cfg = if yaml {
            Self::from_yaml(&text)
        } else {
            Self::from_json(&text)
        };
        cfg.with_context(|| format!("failed to parse session config: {}", path.display()))
    }

    pub fn from_yaml(text: &str) -> Result<Self, CcsError> {
        serde_yaml::from_str(text).map_err(|e| CcsError::Config(e.to_string()))
    }

    pub fn from_json(text: &str) -> Result<Self, CcsError> {
        serde_json::from_str(text).map_err(|e| CcsError::Config(e.to_string()))
    }

    pub fn into_collaborators(self) -> (MonsterRegistry, PreferenceStore) {
        let monsters = self.monsters.iter().collect();
        let mut prefs = PreferenceStore::new();
        for (key, value) in self.preferences {
            prefs.set_string(key, value);
        }
        (monsters, prefs)
    }
}
