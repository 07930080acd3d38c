use attrmark_dom::ApplierOptions;
use attrmark_editor::EngineOptions;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

pub const DEFAULT_CONFIG_NAME: &str = "attrmark.config.json";

/// attrmark configuration file format
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Element classes the tree applier recognizes
    #[serde(default)]
    pub applier: ApplierOptions,

    /// Live decoration engine settings
    #[serde(default)]
    pub editor: EngineOptions,
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &str) -> anyhow::Result<Self> {
        let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            debug!(path = %config_path.display(), "Loaded config");
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use attrmark_editor::{RebuildMode, RevealScope};

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "applier": {
                "markers": { "callout": "admonition", "mathBlock": ["katex"] }
            },
            "editor": {
                "codeMarkers": ["code", "fence"],
                "cacheCapacity": 64,
                "reveal": "token",
                "rebuild": "deferred"
            }
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.applier.markers.callout, "admonition");
        assert_eq!(config.applier.markers.collapse_indicator, "collapse-indicator");
        assert_eq!(config.applier.markers.math_block, vec!["katex"]);
        assert_eq!(config.editor.builder.code_markers, vec!["code", "fence"]);
        assert_eq!(config.editor.builder.cache_capacity, 64);
        assert_eq!(config.editor.builder.reveal, RevealScope::Token);
        assert_eq!(config.editor.rebuild, RebuildMode::Deferred);
    }

    #[test]
    fn test_default_config() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.editor.rebuild, RebuildMode::Immediate);
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().display().to_string()).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_rejects_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(DEFAULT_CONFIG_NAME), "{ not json").unwrap();
        assert!(Config::load(&dir.path().display().to_string()).is_err());
    }
}
