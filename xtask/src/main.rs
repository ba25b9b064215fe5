//! Build automation tasks for the core icon preloader
//!
//! Usage:
//!   cargo xtask manifest        # Regenerate assets/cores/manifest.txt
//!   cargo xtask check           # Compare icon group counts with expectations

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use core_icon_preload::preload::{core_groups, AssetGroup, Manifest, ASSET_ROOT, MANIFEST_FILE};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Build automation for the core icon preloader")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Regenerate the icon manifest used by WASM builds
    Manifest {
        /// Icon root (defaults to assets/cores)
        #[arg(long)]
        dir: Option<PathBuf>,
    },
    /// Report per-group icon counts and fail on a mismatch
    Check {
        /// Icon root (defaults to assets/cores)
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Manifest { dir } => write_manifest(&icon_root(dir)?),
        Commands::Check { dir } => check_counts(&icon_root(dir)?),
    }
}

/// Get the project root directory
fn project_root() -> Result<PathBuf> {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .map(Path::to_path_buf)
        .context("xtask has no parent directory")
}

fn icon_root(dir: Option<PathBuf>) -> Result<PathBuf> {
    match dir {
        Some(dir) => Ok(dir),
        None => Ok(project_root()?.join(ASSET_ROOT)),
    }
}

fn scan(dir: &Path) -> Result<Manifest> {
    Manifest::scan(dir).with_context(|| format!("Failed to scan {}", dir.display()))
}

/// Write the manifest for `dir`
fn write_manifest(dir: &Path) -> Result<()> {
    let manifest = scan(dir)?;
    let path = dir.join(MANIFEST_FILE);
    std::fs::write(&path, manifest.render())
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!(
        "Wrote {} ({} groups, {} icons)",
        path.display(),
        manifest.groups().len(),
        manifest.len()
    );
    Ok(())
}

/// Number of manifest entries each group's pattern picks up, the same
/// entries the preload pass would load
fn group_counts(manifest: &Manifest, groups: &[AssetGroup]) -> Result<Vec<usize>> {
    groups
        .iter()
        .map(|group| {
            let matched = manifest
                .matching(&group.pattern)
                .with_context(|| format!("Bad pattern for group {}", group.name))?;
            Ok(matched.len())
        })
        .collect()
}

/// Compare each core group's icon count against its expectation
fn check_counts(dir: &Path) -> Result<()> {
    let manifest = scan(dir)?;
    let groups = core_groups();
    let counts = group_counts(&manifest, &groups)?;
    let mut mismatches = 0;

    for (group, found) in groups.iter().zip(counts) {
        match group.expected {
            Some(expected) if expected != found => {
                println!("  MISMATCH {:<24} {:>4} (expected {})", group.name, found, expected);
                mismatches += 1;
            }
            Some(expected) => println!("  ok       {:<24} {:>4} (expected {})", group.name, found, expected),
            None => println!("  ok       {:<24} {:>4}", group.name, found),
        }
    }

    if mismatches > 0 {
        anyhow::bail!("{} icon group(s) don't match their expected count", mismatches);
    }
    println!("All icon groups match");
    Ok(())
}
