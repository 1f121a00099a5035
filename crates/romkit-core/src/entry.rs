//! Walk entry types.

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// Folder name used for the walk root in `parent_folder` and stats keys.
pub const ROOT_FOLDER: &str = "/";

/// Type of file system node discovered by a walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryKind {
    /// Regular file (or anything that is not a directory).
    File,
    /// Directory.
    Directory,
}

/// A single node emitted by a directory walk.
///
/// Paths stored in `name` and `parent_folder` are relative to the walk root
/// and always use `/` as the separator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Relative path for directories, base name for files.
    pub name: CompactString,

    /// Number of separators between the walk root and this node.
    /// Direct children of the root have depth 0.
    pub depth: u32,

    /// Node type.
    pub kind: EntryKind,

    /// Relative path of the containing folder, [`ROOT_FOLDER`] at depth 0.
    pub parent_folder: CompactString,
}

impl Entry {
    /// Create a file entry.
    pub fn file(
        name: impl Into<CompactString>,
        depth: u32,
        parent_folder: impl Into<CompactString>,
    ) -> Self {
        Self {
            name: name.into(),
            depth,
            kind: EntryKind::File,
            parent_folder: parent_folder.into(),
        }
    }

    /// Create a directory entry. `path` is the directory's relative path.
    pub fn directory(
        path: impl Into<CompactString>,
        depth: u32,
        parent_folder: impl Into<CompactString>,
    ) -> Self {
        Self {
            name: path.into(),
            depth,
            kind: EntryKind::Directory,
            parent_folder: parent_folder.into(),
        }
    }

    /// Build an entry from the components of a path relative to the walk
    /// root.
    ///
    /// Returns `None` for an empty component list (the root itself).
    pub fn from_components<S: AsRef<str>>(components: &[S], kind: EntryKind) -> Option<Self> {
        let (last, parents) = components.split_last()?;
        let depth = parents.len() as u32;
        let parent_folder = if parents.is_empty() {
            CompactString::from(ROOT_FOLDER)
        } else {
            join_components(parents)
        };

        let entry = match kind {
            EntryKind::Directory => Self::directory(join_components(components), depth, parent_folder),
            EntryKind::File => Self::file(last.as_ref(), depth, parent_folder),
        };
        Some(entry)
    }

    /// Check if this entry is a directory.
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    /// Check if this entry is a file.
    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }

    /// Check if this entry sits directly under the walk root.
    pub fn is_top_level(&self) -> bool {
        self.depth == 0
    }
}

fn join_components<S: AsRef<str>>(parts: &[S]) -> CompactString {
    let mut joined = CompactString::default();
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            joined.push('/');
        }
        joined.push_str(part.as_ref());
    }
    joined
}
