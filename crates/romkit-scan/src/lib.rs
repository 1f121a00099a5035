//! Streaming directory walker for romkit.
//!
//! This crate walks a directory tree on a background thread and streams
//! [`Entry`] values to the caller through a bounded channel.
//!
//! # Overview
//!
//! - **Pre-order, depth-first** traversal via jwalk (serial)
//! - **Backpressure** from a bounded channel (100 entries by default)
//! - **Extension filtering** of files; directories are always emitted
//! - **Hidden entries** (names starting with `.`) are skipped with their
//!   descendants
//! - **Cancellation** through a [`CancellationToken`]; dropping the stream
//!   stops the producer thread
//!
//! # Example
//!
//! ```rust,no_run
//! use romkit_scan::{TreeWalker, WalkConfig};
//!
//! let config = WalkConfig::builder()
//!     .root("/roms/c64")
//!     .extensions(vec![".d64".to_string()])
//!     .build()
//!     .unwrap();
//!
//! let mut stream = TreeWalker::new(config).walk().unwrap();
//! for entry in stream.by_ref() {
//!     println!("{}{}", "  ".repeat(entry.depth as usize), entry.name);
//! }
//! stream.finish().unwrap();
//! ```
//!
//! # Stats
//!
//! ```rust,no_run
//! use romkit_scan::{aggregate, walk};
//!
//! let stats = aggregate(walk("/roms", Vec::<String>::new()).unwrap()).unwrap();
//! println!("Total files: {}", stats.total_files);
//! ```

mod stats;
mod walker;

pub use stats::{aggregate, aggregate_async};
pub use walker::{TreeWalker, WalkStream, walk};

pub use tokio_util::sync::CancellationToken;

// Re-export core types for convenience
pub use romkit_core::{
    Entry, EntryKind, ROOT_FOLDER, Stats, StatsError, TraversalError, WalkConfig,
    WalkConfigBuilder,
};
