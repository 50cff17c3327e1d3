//! Engine settings.
//!
//! Every field has a default so a bare `EngineConfig::default()` loads SNAP-style
//! undirected edge lists with `#` comments and no memory cap.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::graph::Orientation;

/// Settings that shape how an edge list is loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub orientation: Orientation,
    /// Lines starting with this marker (after leading whitespace) are skipped.
    pub comment_prefix: String,
    /// Upper bound on the estimated footprint of a loaded graph, in MiB.
    pub max_memory_mb: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            orientation: Orientation::Undirected,
            comment_prefix: "#".to_string(),
            max_memory_mb: None,
        }
    }
}

impl EngineConfig {
    pub fn directed() -> Self {
        Self {
            orientation: Orientation::Directed,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.comment_prefix.trim().is_empty() {
            return Err(Error::Config("comment_prefix must not be empty".into()));
        }
        // lines are matched after trimming, so edge whitespace could never match
        if self.comment_prefix.trim() != self.comment_prefix {
            return Err(Error::Config(format!(
                "comment_prefix {:?} must not start or end with whitespace",
                self.comment_prefix
            )));
        }
        if self.max_memory_mb == Some(0) {
            return Err(Error::Config("max_memory_mb must be at least 1".into()));
        }
        Ok(())
    }

    /// Memory cap in bytes, if one is set.
    pub fn max_memory_bytes(&self) -> Option<u64> {
        self.max_memory_mb.map(|mb| mb.saturating_mul(1024 * 1024))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.orientation, Orientation::Undirected);
        assert_eq!(cfg.comment_prefix, "#");
        assert_eq!(cfg.max_memory_bytes(), None);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_blank_prefix() {
        let cfg = EngineConfig {
            comment_prefix: "  ".into(),
            ..EngineConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_validate_rejects_padded_prefix() {
        for prefix in [" #", "#\t", "\n%"] {
            let cfg = EngineConfig {
                comment_prefix: prefix.into(),
                ..EngineConfig::default()
            };
            assert!(matches!(cfg.validate(), Err(Error::Config(_))), "{prefix:?}");
        }
        let cfg = EngineConfig {
            comment_prefix: "//".into(),
            ..EngineConfig::default()
        };
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_memory_cap() {
        let cfg = EngineConfig {
            max_memory_mb: Some(0),
            ..EngineConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_max_memory_bytes() {
        let cfg = EngineConfig {
            max_memory_mb: Some(3),
            ..EngineConfig::default()
        };
        assert_eq!(cfg.max_memory_bytes(), Some(3 * 1024 * 1024));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let cfg: EngineConfig = serde_json::from_str(r#"{"orientation":"directed"}"#).unwrap();
        assert_eq!(cfg.orientation, Orientation::Directed);
        assert_eq!(cfg.comment_prefix, "#");
        assert_eq!(cfg, EngineConfig::directed());
    }
}
