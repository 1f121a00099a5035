//! Walk configuration types.

use std::path::PathBuf;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// Default number of entries buffered between the walker and its consumer.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 100;

/// Configuration for a directory walk.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct WalkConfig {
    /// Root path to walk. Never emitted itself.
    pub root: PathBuf,

    /// Suffixes a file name must end with (extensions including the dot,
    /// or full file names). Empty means every file matches.
    #[builder(default)]
    #[serde(default)]
    pub extensions: Vec<String>,

    /// Capacity of the bounded entry channel.
    #[builder(default = "DEFAULT_CHANNEL_CAPACITY")]
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,

    /// Follow symbolic links.
    #[builder(default = "false")]
    #[serde(default)]
    pub follow_symlinks: bool,

    /// Visit each directory's children in name order instead of listing order.
    #[builder(default = "true")]
    #[serde(default = "default_true")]
    pub sort_entries: bool,
}

fn default_true() -> bool {
    true
}

fn default_channel_capacity() -> usize {
    DEFAULT_CHANNEL_CAPACITY
}

impl WalkConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(ref root) = self.root {
            if root.as_os_str().is_empty() {
                return Err("Root path cannot be empty".to_string());
            }
        } else {
            return Err("Root path is required".to_string());
        }
        if self.channel_capacity == Some(0) {
            return Err("Channel capacity must be at least 1".to_string());
        }
        Ok(())
    }
}

impl WalkConfig {
    /// Create a new walk config builder.
    pub fn builder() -> WalkConfigBuilder {
        WalkConfigBuilder::default()
    }

    /// Create an unfiltered config for walking a path.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extensions: Vec::new(),
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            follow_symlinks: false,
            sort_entries: true,
        }
    }

    /// Check if a file name passes the extension filter.
    pub fn matches_file(&self, name: &str) -> bool {
        self.extensions.is_empty() || self.extensions.iter().any(|ext| name.ends_with(ext.as_str()))
    }
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self::new(".")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = WalkConfig::builder()
            .root("/roms")
            .extensions(vec![".d64".to_string(), ".zip".to_string()])
            .channel_capacity(8usize)
            .build()
            .unwrap();

        assert_eq!(config.root, PathBuf::from("/roms"));
        assert_eq!(config.extensions.len(), 2);
        assert_eq!(config.channel_capacity, 8);
        assert!(!config.follow_symlinks);
        assert!(config.sort_entries);
    }

    #[test]
    fn test_config_builder_rejects_missing_root() {
        assert!(WalkConfig::builder().build().is_err());
        assert!(WalkConfig::builder().root("").build().is_err());
    }

    #[test]
    fn test_config_builder_rejects_zero_capacity() {
        let result = WalkConfig::builder()
            .root("/roms")
            .channel_capacity(0usize)
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_config_simple() {
        let config = WalkConfig::new("/roms");
        assert_eq!(config.root, PathBuf::from("/roms"));
        assert!(config.extensions.is_empty());
        assert_eq!(config.channel_capacity, DEFAULT_CHANNEL_CAPACITY);
    }

    #[test]
    fn test_matches_file() {
        let mut config = WalkConfig::new("/roms");
        assert!(config.matches_file("anything.txt"));

        config.extensions = vec![".d64".to_string(), "README".to_string()];
        assert!(config.matches_file("Zynaps (1987)(Hewson).d64"));
        assert!(config.matches_file("README"));
        assert!(!config.matches_file("notes.txt"));
    }
}
