//! Resolver configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AnchorError, Result};

/// Configuration for a [`crate::TrustAnchorResolver`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Anchor files or directories, read in the order given.
    #[serde(default)]
    pub sources: Vec<PathBuf>,

    /// Longest chain accepted by validation (default: 8).
    #[serde(default = "default_max_chain_depth")]
    pub max_chain_depth: usize,

    /// Trust chains that stop one step below an anchor (root omitted).
    #[serde(default = "default_anchor_completion")]
    pub anchor_completion: bool,

    /// Accept sources that yield zero anchors.
    #[serde(default)]
    pub allow_empty: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            sources: Vec::new(),
            max_chain_depth: default_max_chain_depth(),
            anchor_completion: default_anchor_completion(),
            allow_empty: false,
        }
    }
}

impl ResolverConfig {
    /// Load config from a TOML file, falling back to defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .map_err(|e| AnchorError::io(path.display().to_string(), e))?;
            Self::from_toml(&content)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse and check a TOML document.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| AnchorError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.max_chain_depth == 0 {
            return Err(AnchorError::Config(
                "max_chain_depth must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

// Default value functions for serde.
const fn default_max_chain_depth() -> usize {
    8
}

const fn default_anchor_completion() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = ResolverConfig::default();
        assert!(config.sources.is_empty());
        assert_eq!(config.max_chain_depth, 8);
        assert!(config.anchor_completion);
        assert!(!config.allow_empty);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = ResolverConfig::from_toml(
            r#"
            sources = ["/etc/anchors/isrg-root-x1.der", "/etc/anchors/extra"]
            anchor_completion = false
            "#,
        )
        .unwrap();
        assert_eq!(config.sources.len(), 2);
        assert_eq!(config.max_chain_depth, 8);
        assert!(!config.anchor_completion);
    }

    #[test]
    fn test_zero_depth_rejected() {
        let err = ResolverConfig::from_toml("max_chain_depth = 0").unwrap_err();
        assert!(matches!(err, AnchorError::Config(_)));
    }

    #[test]
    fn test_bad_toml_rejected() {
        assert!(matches!(
            ResolverConfig::from_toml("sources = 3"),
            Err(AnchorError::Config(_))
        ));
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let config = ResolverConfig::load(Path::new("/nonexistent/trust-anchor.toml")).unwrap();
        assert_eq!(config, ResolverConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let mut tmp = NamedTempFile::new().unwrap();
        writeln!(tmp, "max_chain_depth = 4\nallow_empty = true").unwrap();
        tmp.flush().unwrap();

        let config = ResolverConfig::load(tmp.path()).unwrap();
        assert_eq!(config.max_chain_depth, 4);
        assert!(config.allow_empty);
    }
}
