//! Catalogue views over a TOSEC-named folder.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, warn};

use romkit_core::{
    ConfigError, DEFAULT_CHANNEL_CAPACITY, Entry, ParseFailure, Platform, PlatformRegistry, Stats,
    StatsError, TraversalError, WalkConfig,
};
use romkit_scan::{CancellationToken, TreeWalker, WalkStream, aggregate};

use crate::name::{TosecFile, parse_file_name};

/// A root folder bound to an optional platform filter.
#[derive(Debug, Clone)]
pub struct TosecFolder {
    root: PathBuf,
    platform: Option<Platform>,
    extensions: Vec<String>,
    channel_capacity: usize,
    cancel: Option<CancellationToken>,
}

/// Files parsed from a folder, plus the names that did not parse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FileListing {
    pub files: Vec<TosecFile>,
    pub failures: Vec<ParseFailure>,
}

impl FileListing {
    /// Check if every file name parsed.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

impl TosecFolder {
    /// Folder without an extension filter: every file is considered.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            platform: None,
            extensions: Vec::new(),
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            cancel: None,
        }
    }

    /// Folder filtered to a platform's extensions plus common archives.
    pub fn with_platform(root: impl Into<PathBuf>, platform: Platform) -> Self {
        let mut folder = Self::new(root);
        folder.extensions = platform.filter_with_archives();
        folder.platform = Some(platform);
        folder
    }

    /// Look up `name` in `registry` and filter by that platform.
    pub fn for_platform(
        root: impl Into<PathBuf>,
        registry: &PlatformRegistry,
        name: &str,
    ) -> Result<Self, ConfigError> {
        let platform = registry.get(name)?.clone();
        Ok(Self::with_platform(root, platform))
    }

    /// Override the walker buffer size.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity;
        self
    }

    /// Stop walks started from this folder when `token` is cancelled.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn platform(&self) -> Option<&Platform> {
        self.platform.as_ref()
    }

    /// The effective extension filter. Empty means all files.
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Walker configuration for this folder.
    pub fn walk_config(&self) -> WalkConfig {
        let mut config = WalkConfig::new(&self.root);
        config.extensions = self.extensions.clone();
        config.channel_capacity = self.channel_capacity.max(1);
        config
    }

    /// Stream the raw entries of the folder.
    pub fn tree(&self) -> Result<WalkStream, TraversalError> {
        let walker = TreeWalker::new(self.walk_config());
        let walker = match &self.cancel {
            Some(token) => walker.with_cancellation(token.clone()),
            None => walker,
        };
        walker.walk()
    }

    /// Parse every matching file name.
    ///
    /// Names that do not follow the grammar are collected in
    /// [`FileListing::failures`]; only a traversal failure is an error.
    pub fn files(&self) -> Result<FileListing, TraversalError> {
        let mut stream = self.tree()?;
        let mut listing = FileListing::default();

        for entry in stream.by_ref().filter(Entry::is_file) {
            match parse_file_name(&entry.name) {
                Ok(file) => listing.files.push(file),
                Err(error) => {
                    warn!(file_name = %entry.name, "skipping file with invalid TOSEC name");
                    listing.failures.push(ParseFailure::new(entry.name.as_str(), error));
                }
            }
        }
        stream.finish()?;

        if !listing.is_clean() {
            warn!(
                failed = listing.failures.len(),
                parsed = listing.files.len(),
                "failed to parse some file names"
            );
        }
        debug!(root = %self.root.display(), parsed = listing.files.len(), "file listing built");
        Ok(listing)
    }

    /// Count files per directory.
    pub fn stats(&self) -> Result<Stats, StatsError> {
        let stream = self.tree().map_err(|source| StatsError {
            partial: Stats::new(),
            source,
        })?;
        aggregate(stream)
    }

    /// Render the folder as indented text lines.
    ///
    /// The first line names the root. A traversal failure becomes a final
    /// `Error: ...` line.
    pub fn tree_lines(&self) -> Result<TreeLines, TraversalError> {
        Ok(TreeLines {
            header: Some(format!("Showing file tree for: {}", self.root.display())),
            stream: Some(self.tree()?),
        })
    }
}

/// Format one entry as a tree line: two spaces per depth level,
/// directories suffixed with `/`.
pub fn format_entry(entry: &Entry) -> String {
    let indent = "  ".repeat(entry.depth as usize);
    if entry.is_dir() {
        format!("{indent}{}/", entry.name)
    } else {
        format!("{indent}{}", entry.name)
    }
}

/// Lazily formatted tree lines produced by [`TosecFolder::tree_lines`].
pub struct TreeLines {
    header: Option<String>,
    stream: Option<WalkStream>,
}

impl Iterator for TreeLines {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if let Some(header) = self.header.take() {
            return Some(header);
        }
        let stream = self.stream.as_mut()?;
        if let Some(entry) = stream.next() {
            return Some(format_entry(&entry));
        }
        let stream = self.stream.take()?;
        match stream.finish() {
            Ok(()) => None,
            Err(err) => Some(format!("Error: {err}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_entry() {
        assert_eq!(format_entry(&Entry::file("a.zip", 0, "/")), "a.zip");
        assert_eq!(
            format_entry(&Entry::directory("games/demos", 1, "games")),
            "  games/demos/"
        );
        assert_eq!(format_entry(&Entry::file("b.zip", 2, "x/y")), "    b.zip");
    }

    #[test]
    fn test_folder_without_platform_has_empty_filter() {
        let folder = TosecFolder::new("/roms");
        assert!(folder.platform().is_none());
        assert!(folder.extensions().is_empty());
        assert!(folder.walk_config().extensions.is_empty());
    }

    #[test]
    fn test_folder_platform_filter_includes_archives() {
        let registry = PlatformRegistry::builtin();
        let folder = TosecFolder::for_platform("/roms", &registry, "c64").unwrap();

        assert_eq!(folder.platform().unwrap().name, "c64");
        assert!(folder.extensions().iter().any(|e| e == ".d64"));
        assert!(folder.extensions().iter().any(|e| e == ".zip"));
    }

    #[test]
    fn test_folder_unknown_platform_fails_fast() {
        let registry = PlatformRegistry::builtin();
        let result = TosecFolder::for_platform("/roms", &registry, "dreamcast");
        assert!(matches!(result, Err(ConfigError::UnknownPlatform { .. })));
    }

    #[test]
    fn test_channel_capacity_never_zero() {
        let folder = TosecFolder::new("/roms").with_channel_capacity(0);
        assert_eq!(folder.walk_config().channel_capacity, 1);
    }
}
