//! romkit - scan and catalogue TOSEC-named ROM collections.
//!
//! Usage:
//!   romkit show <PATH>       Print the folder tree
//!   romkit stats <PATH>      Count files per directory
//!   romkit files <PATH>      Parse every TOSEC file name
//!   romkit parse <NAME>      Parse a single file name
//!   romkit platforms         List known platforms
//!   romkit --help            Show help

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Context, Result};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use romkit_tosec::{FileListing, PlatformRegistry, Stats, TosecFile, TosecFolder, parse_file_name};

#[derive(Parser)]
#[command(
    name = "romkit",
    version,
    about = "Scan and catalogue TOSEC-named ROM collections",
    long_about = "romkit walks a ROM collection, decodes TOSEC file names \
                  (Title (Date)(Publisher)(options)[flags].ext) and reports \
                  per-directory statistics."
)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// JSON file with additional platform definitions
    #[arg(long, global = true, value_name = "FILE")]
    platforms: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the folder as an indented tree
    Show {
        /// Root folder
        path: PathBuf,

        /// Only show files of this platform (plus archives)
        #[arg(short, long)]
        platform: Option<String>,
    },

    /// Count files per directory
    Stats {
        /// Root folder
        path: PathBuf,

        /// Only count files of this platform (plus archives)
        #[arg(short, long)]
        platform: Option<String>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Parse every file name in a folder
    Files {
        /// Root folder
        path: PathBuf,

        /// Only parse files of this platform (plus archives)
        #[arg(short, long)]
        platform: Option<String>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Parse a single file name
    Parse {
        /// File name such as "Zynaps (1987)(Hewson Consultants).zip"
        name: String,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// List known platforms
    Platforms,
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let registry = load_registry(cli.platforms.as_deref())?;

    match cli.command {
        Command::Show { path, platform } => {
            let folder = open_folder(path, &registry, platform.as_deref())?;
            run_show(&folder)?;
        }
        Command::Stats {
            path,
            platform,
            format,
        } => {
            let folder = open_folder(path, &registry, platform.as_deref())?;
            run_stats(&folder, format)?;
        }
        Command::Files {
            path,
            platform,
            format,
        } => {
            let folder = open_folder(path, &registry, platform.as_deref())?;
            run_files(&folder, format)?;
        }
        Command::Parse { name, format } => {
            run_parse(&name, format)?;
        }
        Command::Platforms => {
            run_platforms(&registry);
        }
    }

    Ok(())
}

fn setup_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("romkit=debug,warn")
    } else {
        EnvFilter::new("romkit=info,warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}

/// Built-in platforms, extended or overridden by a user file.
fn load_registry(path: Option<&Path>) -> Result<PlatformRegistry> {
    let mut registry = PlatformRegistry::builtin();
    if let Some(path) = path {
        let extra = PlatformRegistry::load(path)
            .wrap_err_with(|| format!("Failed to load platforms from {}", path.display()))?;
        debug!(path = %path.display(), count = extra.len(), "loaded platform definitions");
        for platform in extra.iter() {
            registry.insert(platform.clone());
        }
    }
    Ok(registry)
}

fn open_folder(
    path: PathBuf,
    registry: &PlatformRegistry,
    platform: Option<&str>,
) -> Result<TosecFolder> {
    match platform {
        Some(name) => Ok(TosecFolder::for_platform(path, registry, name)?),
        None => Ok(TosecFolder::new(path)),
    }
}

/// Print the folder tree.
fn run_show(folder: &TosecFolder) -> Result<()> {
    for line in folder.tree_lines()? {
        println!("{line}");
    }
    Ok(())
}

/// Print per-directory file counts.
fn run_stats(folder: &TosecFolder, format: OutputFormat) -> Result<()> {
    let stats = folder.stats().context("Failed to collect stats")?;

    match format {
        OutputFormat::Text => print_stats(&stats),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&stats)?),
    }
    Ok(())
}

fn print_stats(stats: &Stats) {
    println!("Total files: {}", stats.total_files);
    for (dir, count) in &stats.directory_counts {
        println!("{dir} ({count})");
    }
}

/// Parse and print every file name in the folder.
fn run_files(folder: &TosecFolder, format: OutputFormat) -> Result<()> {
    let listing = folder.files().context("Failed to list files")?;

    match format {
        OutputFormat::Text => print_listing(&listing),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&listing)?),
    }
    Ok(())
}

fn print_listing(listing: &FileListing) {
    for file in &listing.files {
        print_file(file);
    }

    if !listing.is_clean() {
        println!();
        println!("{} file(s) could not be parsed:", listing.failures.len());
        for failure in &listing.failures {
            println!("  {}", failure.file_name);
        }
    }
}

fn print_file(file: &TosecFile) {
    println!("{}", file.file_name);
    println!("  Title:     {}", file.title);
    println!("  Date:      {}", file.date);
    println!("  Publisher: {}", file.publisher);
    println!("  Format:    {}", file.format);
    if let Some(region) = file.region {
        println!("  Region:    {region}");
    }
    if let Some(language) = &file.language {
        println!("  Language:  {language}");
    }
    if !file.flags.is_empty() {
        println!("  Flags:     {}", file.flags.join(", "));
    }
}

/// Parse a single file name.
fn run_parse(name: &str, format: OutputFormat) -> Result<()> {
    let file = parse_file_name(name)?;

    match format {
        OutputFormat::Text => print_file(&file),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&file)?),
    }
    Ok(())
}

fn run_platforms(registry: &PlatformRegistry) {
    for platform in registry.iter() {
        println!(
            "{:<10} {:<40} {}",
            platform.name,
            platform.description,
            platform.extensions.join(" ")
        );
    }
}
