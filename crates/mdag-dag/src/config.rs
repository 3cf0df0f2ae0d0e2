//! Slicing parameters and their TOML representation.

use std::path::Path;

use serde::{Deserialize, Serialize};

use mdag_crypto::{ContentHasher, HashAlgorithm};

use crate::error::{DagError, DagResult};

/// Maximum number of content bytes in one leaf block (256 KiB).
pub const LEAF_SIZE: usize = 256 * 1024;

/// Maximum number of children of one internal node.
pub const FANOUT: usize = 4096;

/// How the block tree height is derived from the leaf count.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeightRule {
    /// Count repeated divisions by the fanout until the quotient is zero.
    ///
    /// An exact multiple of the fanout gets one level more than it needs,
    /// which yields a root with a single internal child. Keys produced under
    /// this rule match existing deployments.
    #[default]
    Compat,
    /// Smallest height whose capacity holds every leaf.
    Minimal,
}

/// Configuration for slicing files and directories into a DAG.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SliceConfig {
    /// Maximum bytes per leaf block.
    pub leaf_size: usize,
    /// Maximum children per internal node.
    pub fanout: usize,
    /// Tree height derivation.
    pub height_rule: HeightRule,
    /// Hash function used for every key.
    pub hash: HashAlgorithm,
}

impl Default for SliceConfig {
    fn default() -> Self {
        Self {
            leaf_size: LEAF_SIZE,
            fanout: FANOUT,
            height_rule: HeightRule::Compat,
            hash: HashAlgorithm::Blake3,
        }
    }
}

impl SliceConfig {
    /// Parse a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(s: &str) -> DagResult<Self> {
        let config: Self = toml::from_str(s).map_err(|e| DagError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML configuration file.
    pub fn load(path: impl AsRef<Path>) -> DagResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Reject parameters the builder cannot work with.
    pub fn validate(&self) -> DagResult<()> {
        if self.leaf_size == 0 {
            return Err(DagError::InvalidConfig("leaf_size must be positive".into()));
        }
        if self.fanout < 2 {
            return Err(DagError::InvalidConfig(format!(
                "fanout must be at least 2, got {}",
                self.fanout
            )));
        }
        Ok(())
    }

    /// A fresh hasher for the configured algorithm.
    pub fn hasher(&self) -> Box<dyn ContentHasher> {
        self.hash.hasher()
    }
}
