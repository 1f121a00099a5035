//! TOSEC catalogue support for romkit.
//!
//! This crate decodes TOSEC-style file names and exposes catalogue views
//! over a folder:
//!
//! - **Name parsing** - `Title (Date)(Publisher)(options)[flags].ext` into a
//!   [`TosecFile`], with first-match region and language classification
//! - **Folder facade** - raw entry stream, parsed file listing, per-directory
//!   stats and an indented tree rendering for one root and platform filter
//!
//! # Parsing
//!
//! ```rust
//! use romkit_tosec::{Region, parse_file_name};
//!
//! let file = parse_file_name("Zynaps (1987)(Hewson Consultants)(Europe)(en).zip").unwrap();
//! assert_eq!(file.title, "Zynaps");
//! assert_eq!(file.region, Some(Region::Europe));
//! assert_eq!(file.language.as_deref(), Some("en"));
//! ```
//!
//! # Folders
//!
//! ```rust,no_run
//! use romkit_tosec::{PlatformRegistry, TosecFolder};
//!
//! let registry = PlatformRegistry::builtin();
//! let folder = TosecFolder::for_platform("/roms/c64", &registry, "c64").unwrap();
//!
//! let listing = folder.files().unwrap();
//! println!("{} parsed, {} failed", listing.files.len(), listing.failures.len());
//!
//! let stats = folder.stats().unwrap();
//! println!("Total files: {}", stats.total_files);
//! ```

mod folder;
pub mod name;

pub use folder::{FileListing, TosecFolder, TreeLines, format_entry};
pub use name::{LANGUAGE_CODES, Region, TosecFile, is_language, parse_file_name};

// Re-export core types
pub use romkit_core::{
    ConfigError, ParseError, ParseFailure, Platform, PlatformRegistry, Stats, StatsError,
    TraversalError,
};
