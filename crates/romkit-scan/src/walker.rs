//! Threaded directory walker streaming entries over a bounded channel.

use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};

use jwalk::{Parallelism, WalkDir};
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use romkit_core::{Entry, EntryKind, TraversalError, WalkConfig};

/// Directory walker running each traversal on its own thread.
///
/// Entries are produced depth-first, pre-order, and handed to the consumer
/// through a bounded channel so a slow consumer throttles the walk.
pub struct TreeWalker {
    config: WalkConfig,
    cancel: CancellationToken,
}

impl TreeWalker {
    /// Create a walker for the given configuration.
    pub fn new(config: WalkConfig) -> Self {
        Self {
            config,
            cancel: CancellationToken::new(),
        }
    }

    /// Tie every walk started by this walker to an external token.
    ///
    /// Cancelling `token` stops running walks; cancelling or dropping a
    /// single [`WalkStream`] does not cancel `token`.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// The configuration this walker uses.
    pub fn config(&self) -> &WalkConfig {
        &self.config
    }

    /// Start a walk on a background thread.
    ///
    /// Traversal failures, including an unreadable root, are reported by
    /// [`WalkStream::finish`] once the stream is exhausted. The only error
    /// returned here is a failure to spawn the producer thread.
    pub fn walk(&self) -> Result<WalkStream, TraversalError> {
        let (entry_tx, entry_rx) = mpsc::channel(self.config.channel_capacity.max(1));
        let (error_tx, error_rx) = oneshot::channel();
        let cancel = self.cancel.child_token();

        let producer = Producer {
            config: self.config.clone(),
            entries: entry_tx,
            error: error_tx,
            cancel: cancel.clone(),
        };

        let handle = thread::Builder::new()
            .name("romkit-walker".to_string())
            .spawn(move || producer.run())
            .map_err(|e| TraversalError::io(&self.config.root, e))?;

        Ok(WalkStream {
            entries: entry_rx,
            error: Some(error_rx),
            cancel,
            stopped_here: false,
            producer: Some(handle),
        })
    }
}

/// Walk `root` with an extension filter using default settings.
pub fn walk(
    root: impl Into<PathBuf>,
    extensions: impl IntoIterator<Item = impl Into<String>>,
) -> Result<WalkStream, TraversalError> {
    let mut config = WalkConfig::new(root);
    config.extensions = extensions.into_iter().map(Into::into).collect();
    TreeWalker::new(config).walk()
}

/// Consumer side of a running walk.
///
/// Iterating blocks the current thread while the buffer is empty, so the
/// [`Iterator`] impl must not be used from inside an async runtime; use
/// [`WalkStream::recv`] and [`WalkStream::wait`] there instead.
///
/// Dropping the stream cancels the walk.
pub struct WalkStream {
    entries: mpsc::Receiver<Entry>,
    error: Option<oneshot::Receiver<TraversalError>>,
    cancel: CancellationToken,
    /// Set by [`WalkStream::cancel`]; such a walk finishes with `Ok(())`.
    stopped_here: bool,
    producer: Option<JoinHandle<()>>,
}

impl WalkStream {
    /// Receive the next entry, waiting asynchronously.
    pub async fn recv(&mut self) -> Option<Entry> {
        if self.cancel.is_cancelled() {
            return None;
        }
        self.entries.recv().await
    }

    /// Stop the walk. Entries still buffered are discarded.
    pub fn cancel(&mut self) {
        self.stopped_here = true;
        self.cancel.cancel();
        self.entries.close();
    }

    /// Check whether the walk has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Token that cancels this walk when triggered.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Close the stream and report how the walk ended.
    ///
    /// Call after draining the entries. Any entries not yet consumed are
    /// discarded. A walk stopped with [`WalkStream::cancel`] reports
    /// `Ok(())`; one stopped through an outside token reports
    /// [`TraversalError::Interrupted`].
    pub fn finish(mut self) -> Result<(), TraversalError> {
        self.entries.close();
        let outcome = match self.error.take() {
            Some(error) => error.blocking_recv().map_or(Ok(()), Err),
            None => Ok(()),
        };
        if let Some(handle) = self.producer.take() {
            let _ = handle.join();
        }
        self.outcome(outcome)
    }

    /// Async counterpart of [`WalkStream::finish`].
    ///
    /// The producer thread is joined on the blocking pool.
    pub async fn wait(mut self) -> Result<(), TraversalError> {
        self.entries.close();
        let outcome = match self.error.take() {
            Some(error) => error.await.map_or(Ok(()), Err),
            None => Ok(()),
        };
        if let Some(handle) = self.producer.take() {
            let _ = tokio::task::spawn_blocking(move || handle.join()).await;
        }
        self.outcome(outcome)
    }

    fn outcome(&self, outcome: Result<(), TraversalError>) -> Result<(), TraversalError> {
        match outcome {
            Err(TraversalError::Interrupted { .. }) if self.stopped_here => Ok(()),
            other => other,
        }
    }
}

impl Iterator for WalkStream {
    type Item = Entry;

    fn next(&mut self) -> Option<Entry> {
        if self.cancel.is_cancelled() {
            return None;
        }
        self.entries.blocking_recv()
    }
}

impl Drop for WalkStream {
    fn drop(&mut self) {
        self.cancel.cancel();
        self.entries.close();
    }
}

/// How a producer run ended without error.
enum WalkEnd {
    Completed,
    /// The cancellation token fired.
    Cancelled,
    /// The consumer closed the stream.
    Closed,
}

struct Producer {
    config: WalkConfig,
    entries: mpsc::Sender<Entry>,
    error: oneshot::Sender<TraversalError>,
    cancel: CancellationToken,
}

impl Producer {
    fn run(self) {
        let Producer {
            config,
            entries,
            error,
            cancel,
        } = self;

        let mut emitted = 0u64;
        let outcome = walk_tree(&config, &cancel, |entry| {
            if entries.blocking_send(entry).is_err() {
                return false;
            }
            emitted += 1;
            true
        });

        // The entry stream closes before the error signal.
        drop(entries);

        match outcome {
            Ok(WalkEnd::Completed) => {
                debug!(root = %config.root.display(), emitted, "walk completed");
            }
            Ok(WalkEnd::Cancelled) => {
                debug!(root = %config.root.display(), emitted, "walk cancelled");
                let _ = error.send(TraversalError::Interrupted {
                    path: config.root.clone(),
                });
            }
            Ok(WalkEnd::Closed) => {
                debug!(root = %config.root.display(), emitted, "walk closed by consumer");
            }
            Err(err) => {
                warn!(root = %config.root.display(), emitted, error = %err, "walk failed");
                let _ = error.send(err);
            }
        }
    }
}

/// Traverse `config.root`, handing every emitted entry to `emit`.
///
/// `emit` returns `false` when the consumer is gone. A directory whose
/// children cannot be read ends the walk after the directory itself has
/// been emitted.
fn walk_tree(
    config: &WalkConfig,
    cancel: &CancellationToken,
    mut emit: impl FnMut(Entry) -> bool,
) -> Result<WalkEnd, TraversalError> {
    let root = config.root.as_path();
    debug!(root = %root.display(), extensions = ?config.extensions, "walk started");

    let metadata = std::fs::metadata(root).map_err(|e| TraversalError::io(root, e))?;
    if !metadata.is_dir() {
        return Err(TraversalError::NotADirectory {
            path: root.to_path_buf(),
        });
    }
    // Surface an unreadable root as an error before the walk starts.
    std::fs::read_dir(root).map_err(|e| TraversalError::io(root, e))?;

    let walker = WalkDir::new(root)
        .parallelism(Parallelism::Serial)
        .skip_hidden(true)
        .follow_links(config.follow_symlinks)
        .sort(config.sort_entries)
        .min_depth(1);

    for entry_result in walker {
        if cancel.is_cancelled() {
            return Ok(WalkEnd::Cancelled);
        }

        let mut dir_entry = entry_result.map_err(|err| traversal_error(root, err))?;
        let file_name = dir_entry.file_name().to_string_lossy().into_owned();

        let kind = if dir_entry.file_type().is_dir() {
            EntryKind::Directory
        } else {
            EntryKind::File
        };
        if kind == EntryKind::File && !config.matches_file(&file_name) {
            continue;
        }

        let path = dir_entry.path();
        let Some(entry) = relative_entry(root, &path, kind)? else {
            continue;
        };

        if !emit(entry) {
            // A cancel() closes the receiver too; the token tells the two apart.
            if cancel.is_cancelled() {
                return Ok(WalkEnd::Cancelled);
            }
            return Ok(WalkEnd::Closed);
        }

        if let Some(err) = dir_entry.read_children_error.take() {
            return Err(traversal_error(root, err));
        }
    }

    Ok(WalkEnd::Completed)
}

/// Build an entry from a path below `root`.
fn relative_entry(
    root: &Path,
    path: &Path,
    kind: EntryKind,
) -> Result<Option<Entry>, TraversalError> {
    let relative = path.strip_prefix(root).map_err(|_| TraversalError::Other {
        path: path.to_path_buf(),
        message: "entry is outside the walk root".to_string(),
    })?;
    let components: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Ok(Entry::from_components(&components, kind))
}

fn traversal_error(root: &Path, err: jwalk::Error) -> TraversalError {
    let path = err
        .path()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| root.to_path_buf());
    let message = err.to_string();
    match err.into_io_error() {
        Some(source) => TraversalError::io(path, source),
        None => TraversalError::Other { path, message },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_tree() -> TempDir {
        let temp = TempDir::new().unwrap();
        let root = temp.path();

        fs::create_dir_all(root.join(".git")).unwrap();
        fs::create_dir_all(root.join("subdir/nested")).unwrap();

        fs::write(root.join(".git/config"), "[core]").unwrap();
        fs::write(root.join("README.md"), "readme").unwrap();
        fs::write(root.join("file1.txt"), "one").unwrap();
        fs::write(root.join("file2.jpg"), "two").unwrap();
        fs::write(root.join("subdir/file3.txt"), "three").unwrap();
        fs::write(root.join("subdir/file4.png"), "four").unwrap();
        fs::write(root.join("subdir/nested/file5.txt"), "five").unwrap();

        temp
    }

    fn names(config: WalkConfig) -> Vec<String> {
        let mut stream = TreeWalker::new(config).walk().unwrap();
        let names = stream.by_ref().map(|e| e.name.to_string()).collect();
        stream.finish().unwrap();
        names
    }

    #[test]
    fn test_walk_without_filter_is_preorder() {
        let temp = create_test_tree();
        let names = names(WalkConfig::new(temp.path()));

        assert_eq!(
            names,
            vec![
                "README.md",
                "file1.txt",
                "file2.jpg",
                "subdir",
                "file3.txt",
                "file4.png",
                "subdir/nested",
                "file5.txt",
            ]
        );
    }

    #[test]
    fn test_walk_filter_keeps_directories() {
        let temp = create_test_tree();
        let mut config = WalkConfig::new(temp.path());
        config.extensions = vec![".txt".to_string()];

        assert_eq!(
            names(config),
            vec!["file1.txt", "subdir", "file3.txt", "subdir/nested", "file5.txt"]
        );
    }

    #[test]
    fn test_walk_filter_by_full_name() {
        let temp = create_test_tree();
        let mut config = WalkConfig::new(temp.path());
        config.extensions = vec!["README.md".to_string()];

        assert_eq!(names(config), vec!["README.md", "subdir", "subdir/nested"]);
    }

    #[test]
    fn test_walk_depth_and_parent_folder() {
        let temp = create_test_tree();
        let mut stream = TreeWalker::new(WalkConfig::new(temp.path())).walk().unwrap();
        let entries: Vec<Entry> = stream.by_ref().collect();
        stream.finish().unwrap();

        let file5 = entries.iter().find(|e| e.name == "file5.txt").unwrap();
        assert_eq!(file5.depth, 2);
        assert_eq!(file5.parent_folder, "subdir/nested");

        let nested = entries.iter().find(|e| e.name == "subdir/nested").unwrap();
        assert!(nested.is_dir());
        assert_eq!(nested.depth, 1);
        assert_eq!(nested.parent_folder, "subdir");

        let readme = entries.iter().find(|e| e.name == "README.md").unwrap();
        assert_eq!(readme.depth, 0);
        assert_eq!(readme.parent_folder, romkit_core::ROOT_FOLDER);
    }

    #[test]
    fn test_walk_missing_root() {
        let temp = TempDir::new().unwrap();
        let mut stream = walk(temp.path().join("missing"), Vec::<String>::new()).unwrap();

        assert!(stream.next().is_none());
        assert!(matches!(
            stream.finish(),
            Err(TraversalError::NotFound { .. })
        ));
    }

    #[test]
    fn test_walk_file_as_root() {
        let temp = create_test_tree();
        let mut stream = walk(temp.path().join("README.md"), Vec::<String>::new()).unwrap();

        assert!(stream.next().is_none());
        assert!(matches!(
            stream.finish(),
            Err(TraversalError::NotADirectory { .. })
        ));
    }
}
