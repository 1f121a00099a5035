//! Core types and configuration for romkit.
//!
//! This crate provides the value types shared by the walker, the stats
//! aggregator and the TOSEC name parser, together with the error taxonomy
//! and the platform registry used to derive extension filters.

mod config;
mod entry;
mod error;
mod platform;
mod stats;

pub use config::{WalkConfig, WalkConfigBuilder, DEFAULT_CHANNEL_CAPACITY};
pub use entry::{Entry, EntryKind, ROOT_FOLDER};
pub use error::{ConfigError, ParseError, ParseFailure, StatsError, TraversalError};
pub use platform::{ARCHIVE_EXTENSIONS, Platform, PlatformRegistry};
pub use stats::Stats;
