//! Platform registry mapping platform identifiers to file extensions.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Archive extensions accepted alongside any non-empty platform filter.
pub const ARCHIVE_EXTENSIONS: &[&str] = &[".zip", ".rar", ".7z", ".tar", ".gz", ".bz2"];

/// A platform and the file extensions its images use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Platform {
    /// Identifier used on the command line (e.g. `c64`).
    pub name: String,
    /// Human-readable description.
    #[serde(default)]
    pub description: String,
    /// Extensions including the leading dot.
    pub extensions: Vec<String>,
}

impl Platform {
    /// Create a new platform entry.
    pub fn new(name: impl Into<String>, description: impl Into<String>, extensions: &[&str]) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            extensions: extensions.iter().map(|ext| (*ext).to_string()).collect(),
        }
    }

    /// The walk filter for this platform: its own extensions followed by
    /// [`ARCHIVE_EXTENSIONS`]. An empty extension list stays empty.
    pub fn filter_with_archives(&self) -> Vec<String> {
        if self.extensions.is_empty() {
            return Vec::new();
        }
        let mut filter = self.extensions.clone();
        for archive in ARCHIVE_EXTENSIONS {
            if !filter.iter().any(|ext| ext == archive) {
                filter.push((*archive).to_string());
            }
        }
        filter
    }
}

/// Lookup table of known platforms.
///
/// Passed explicitly to whatever needs it; there is no global registry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlatformRegistry {
    platforms: BTreeMap<String, Platform>,
}

impl PlatformRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in platform table.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for platform in [
            Platform::new("nes", "Nintendo Entertainment System", &[".nes", ".fds"]),
            Platform::new("snes", "Super Nintendo Entertainment System", &[".smc", ".sfc", ".fig"]),
            Platform::new("genesis", "Sega Genesis / Mega Drive", &[".gen", ".md", ".smd", ".bin"]),
            Platform::new("gameboy", "Nintendo Game Boy", &[".gb", ".gbc", ".gba"]),
            Platform::new("atari2600", "Atari 2600", &[".a26", ".bin"]),
            Platform::new("c64", "Commodore 64", &[".d64", ".t64", ".prg", ".crt"]),
            Platform::new("amiga", "Commodore Amiga", &[".adf", ".dms", ".ipf", ".lha", ".lzx"]),
            Platform::new("atari", "Atari ST", &[".st", ".msa"]),
            Platform::new("psx", "Sony PlayStation", &[".iso", ".bin", ".cue"]),
            Platform::new("coleco", "ColecoVision", &[".col", ".rom"]),
        ] {
            registry.insert(platform);
        }
        registry
    }

    /// Parse a registry from a JSON array of platforms.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        let platforms: Vec<Platform> = serde_json::from_str(json)?;
        let mut registry = Self::new();
        for platform in platforms {
            registry.insert(platform);
        }
        Ok(registry)
    }

    /// Load a registry from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Add or replace a platform.
    pub fn insert(&mut self, platform: Platform) {
        self.platforms.insert(platform.name.clone(), platform);
    }

    /// Look up a platform, failing with the list of known names.
    pub fn get(&self, name: &str) -> Result<&Platform, ConfigError> {
        self.platforms
            .get(name)
            .ok_or_else(|| ConfigError::UnknownPlatform {
                name: name.to_string(),
                known: self.names(),
            })
    }

    /// Sorted platform identifiers.
    pub fn names(&self) -> Vec<String> {
        self.platforms.keys().cloned().collect()
    }

    /// Iterate platforms in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Platform> {
        self.platforms.values()
    }

    /// Number of registered platforms.
    pub fn len(&self) -> usize {
        self.platforms.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.platforms.is_empty()
    }
}
