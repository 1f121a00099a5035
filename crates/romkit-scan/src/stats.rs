//! Folding a walk into per-directory file counts.

use tracing::debug;

use romkit_core::{Stats, StatsError};

use crate::walker::WalkStream;

/// Consume a walk to completion and count its files.
///
/// If the walk fails or is interrupted by an outside token, the counts
/// gathered so far travel in [`StatsError::partial`].
pub fn aggregate(mut stream: WalkStream) -> Result<Stats, StatsError> {
    let mut stats = Stats::new();
    for entry in stream.by_ref() {
        stats.record(&entry);
    }
    finish(stats, stream.finish())
}

/// Async counterpart of [`aggregate`].
pub async fn aggregate_async(mut stream: WalkStream) -> Result<Stats, StatsError> {
    let mut stats = Stats::new();
    while let Some(entry) = stream.recv().await {
        stats.record(&entry);
    }
    finish(stats, stream.wait().await)
}

fn finish(
    stats: Stats,
    outcome: Result<(), romkit_core::TraversalError>,
) -> Result<Stats, StatsError> {
    match outcome {
        Ok(()) => {
            debug!(
                total_files = stats.total_files,
                directories = stats.total_dirs(),
                "stats aggregated"
            );
            Ok(stats)
        }
        Err(source) => Err(StatsError {
            partial: stats,
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::walker::walk;
    use romkit_core::ROOT_FOLDER;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_aggregate_counts_root_and_nested() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("a/b")).unwrap();
        fs::create_dir_all(root.join("empty")).unwrap();
        fs::write(root.join("top.zip"), "").unwrap();
        fs::write(root.join("a/b/deep.zip"), "").unwrap();

        let stats = aggregate(walk(root, Vec::<String>::new()).unwrap()).unwrap();

        assert_eq!(stats.total_files, 2);
        assert_eq!(stats.count_for(ROOT_FOLDER), Some(1));
        assert_eq!(stats.count_for("a"), Some(0));
        assert_eq!(stats.count_for("a/b"), Some(1));
        assert_eq!(stats.count_for("empty"), Some(0));
        assert!(stats.is_consistent());
    }

    #[test]
    fn test_aggregate_reports_partial_stats_on_failure() {
        let temp = TempDir::new().unwrap();
        let stream = walk(temp.path().join("nope"), Vec::<String>::new()).unwrap();

        let err = aggregate(stream).unwrap_err();
        assert_eq!(err.partial, Stats::new());
        assert!(matches!(
            err.source,
            romkit_core::TraversalError::NotFound { .. }
        ));
    }
}
