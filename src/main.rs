//! Core icon preloader
//!
//! Preloads every RPG core icon group at startup, then shows the resident
//! icons in a grid, one row block per group. A group whose icon count
//! differs from what it should hold is highlighted.

use core_icon_preload::config::PreloadConfig;
use core_icon_preload::preload::{preload_groups, GroupReport, IconCache, IconImage, PreloadError};
#[cfg(not(target_arch = "wasm32"))]
use core_icon_preload::preload::{LoaderMap, Resolution, Resolver};
use core_icon_preload::VERSION;
use macroquad::prelude::*;

const ICON_SIZE: f32 = 32.0;
const PADDING: f32 = 6.0;
const HEADER_HEIGHT: f32 = 24.0;
const SCROLL_SPEED: f32 = 24.0;

/// A preloaded group and the cache paths it produced
struct LoadedGroup {
    report: GroupReport,
    paths: Vec<String>,
}

/// A group's icons uploaded to the GPU
struct GroupTextures {
    report: GroupReport,
    textures: Vec<Texture2D>,
}

fn window_conf() -> Conf {
    Conf {
        window_title: format!("Core Icon Preload v{}", VERSION),
        window_width: 1280,
        window_height: 720,
        window_resizable: true,
        high_dpi: true,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    // Initialize crash logging FIRST (before any other code)
    #[cfg(not(target_arch = "wasm32"))]
    crashlog::setup!(crashlog::cargo_metadata!().capitalized(), false);

    println!("=== Core Icon Preload v{} ===", VERSION);

    let mut cache = IconCache::new();
    let preloaded = match load_config() {
        Ok(config) => run_preload(&config, &mut cache).await,
        Err(e) => Err(e),
    };

    let groups = match preloaded {
        Ok(loaded) => {
            log_resident(&cache);
            Ok(upload_groups(loaded, &cache))
        }
        Err(e) => {
            eprintln!("Preload failed: {}", e);
            if let Some(code) = failure_exit_code() {
                std::process::exit(code);
            }
            Err(e)
        }
    };

    let mut scroll = 0.0f32;
    loop {
        clear_background(Color::from_rgba(24, 24, 28, 255));

        match &groups {
            Ok(groups) => {
                let wheel = mouse_wheel().1;
                if wheel != 0.0 {
                    scroll = (scroll + wheel.signum() * SCROLL_SPEED).min(0.0);
                }
                draw_groups(groups, scroll);
            }
            Err(e) => draw_error(e),
        }

        next_frame().await
    }
}

/// Config path from the first argument, else `preload.ron`
#[cfg(not(target_arch = "wasm32"))]
fn load_config() -> Result<PreloadConfig, PreloadError> {
    use core_icon_preload::config::CONFIG_FILE;
    use std::path::PathBuf;

    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE));
    PreloadConfig::load_or_default(&path)
}

#[cfg(target_arch = "wasm32")]
fn load_config() -> Result<PreloadConfig, PreloadError> {
    Ok(PreloadConfig::default())
}

/// Exit status after a failed preload
///
/// Native builds exit; the browser has nowhere to exit to, so WASM keeps
/// the window up with the error on it.
fn failure_exit_code() -> Option<i32> {
    if cfg!(target_arch = "wasm32") {
        None
    } else {
        Some(1)
    }
}

/// Grows the progress bar as each group resolves
#[cfg(not(target_arch = "wasm32"))]
struct ProgressResolver<'a, R> {
    inner: &'a R,
    pb: &'a indicatif::ProgressBar,
}

#[cfg(not(target_arch = "wasm32"))]
impl<R: Resolver> Resolver for ProgressResolver<'_, R> {
    fn resolve(
        &self,
        pattern: &str,
        resolution: Resolution,
    ) -> Result<LoaderMap<IconImage, PreloadError>, PreloadError> {
        let loaders = self.inner.resolve(pattern, resolution)?;
        self.pb.inc_length(loaders.len() as u64);
        Ok(loaders)
    }
}

/// Scan the asset root and preload every group, with a progress bar
#[cfg(not(target_arch = "wasm32"))]
async fn run_preload(
    config: &PreloadConfig,
    cache: &mut IconCache,
) -> Result<Vec<LoadedGroup>, PreloadError> {
    use core_icon_preload::preload::DirectoryResolver;
    use indicatif::{ProgressBar, ProgressStyle};

    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("Preloading icons [{bar:30}] {pos}/{len} {msg}")
            .map(|style| style.progress_chars("█▓░"))
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let directory = DirectoryResolver::new(&config.asset_root);
    let resolver = ProgressResolver { inner: &directory, pb: &pb };

    let mut members: Vec<Vec<String>> = vec![Vec::new(); config.groups.len()];
    let result = preload_groups(
        &resolver,
        &config.groups,
        config.resolution,
        |index, _, path, icon| {
            pb.set_message(format!("{} ({}x{})", path, icon.width, icon.height));
            pb.inc(1);
            members[index].push(path.clone());
            cache.insert(path, icon);
        },
    );

    match &result {
        Ok(_) => pb.finish_with_message(format!("Loaded {} icons", cache.len())),
        Err(e) => pb.abandon_with_message(format!("Error: {}", e)),
    }

    Ok(with_members(result?, members))
}

/// Fetch the manifest and every listed icon, then preload from memory
#[cfg(target_arch = "wasm32")]
async fn run_preload(
    config: &PreloadConfig,
    cache: &mut IconCache,
) -> Result<Vec<LoadedGroup>, PreloadError> {
    use core_icon_preload::preload::{Manifest, ManifestResolver, MANIFEST_FILE};
    use std::collections::HashMap;

    let root = config.asset_root.to_string_lossy().to_string();
    let manifest_path = format!("{}/{}", root, MANIFEST_FILE);
    let text = load_string(&manifest_path)
        .await
        .map_err(|e| PreloadError::Io(format!("{}: {}", manifest_path, e)))?;
    let manifest = Manifest::parse(&text)?;

    let mut prefetched = HashMap::new();
    for key in manifest.entries() {
        let path = format!("{}/{}", root, key);
        let bytes = load_file(&path)
            .await
            .map_err(|e| PreloadError::Io(format!("{}: {}", path, e)))?;
        prefetched.insert(key, bytes);
    }
    println!("WASM: fetched {} icons from manifest", prefetched.len());

    let resolver = ManifestResolver::new(&config.asset_root, manifest).with_prefetched(prefetched);

    let mut members: Vec<Vec<String>> = vec![Vec::new(); config.groups.len()];
    let reports = preload_groups(
        &resolver,
        &config.groups,
        config.resolution,
        |index, _, path, icon| {
            members[index].push(path.clone());
            cache.insert(path, icon);
        },
    )?;

    Ok(with_members(reports, members))
}

/// Pair each report with the paths its group loaded; both are in group order
fn with_members(reports: Vec<GroupReport>, members: Vec<Vec<String>>) -> Vec<LoadedGroup> {
    reports
        .into_iter()
        .zip(members)
        .map(|(report, paths)| LoadedGroup { report, paths })
        .collect()
}

fn log_resident(cache: &IconCache) {
    println!(
        "Preload: {} icons resident ({:.1} KB decoded)",
        cache.len(),
        cache.total_bytes() as f64 / 1024.0
    );
    if let Some(usage) = memory_stats::memory_stats() {
        println!(
            "Memory: {:.1} MB physical after preload",
            usage.physical_mem as f64 / (1024.0 * 1024.0)
        );
    }
}

fn upload_icon(icon: &IconImage) -> Option<Texture2D> {
    let (Ok(width), Ok(height)) = (u16::try_from(icon.width), u16::try_from(icon.height)) else {
        eprintln!("Skipping {}: {}x{} is too large for a texture", icon.name, icon.width, icon.height);
        return None;
    };
    let texture = Texture2D::from_rgba8(width, height, &icon.rgba);
    texture.set_filter(FilterMode::Nearest);
    Some(texture)
}

fn upload_groups(groups: Vec<LoadedGroup>, cache: &IconCache) -> Vec<GroupTextures> {
    groups
        .into_iter()
        .map(|group| GroupTextures {
            textures: group
                .paths
                .iter()
                .filter_map(|path| cache.get(path))
                .filter_map(upload_icon)
                .collect(),
            report: group.report,
        })
        .collect()
}

fn draw_groups(groups: &[GroupTextures], scroll: f32) {
    let cell = ICON_SIZE + PADDING;
    let per_row = ((screen_width() - PADDING) / cell).floor().max(1.0) as usize;

    let mut y = PADDING + scroll;
    for group in groups {
        let report = &group.report;
        let header = match report.expected {
            Some(expected) => format!("{} ({}/{})", report.name, report.loaded, expected),
            None => format!("{} ({})", report.name, report.loaded),
        };
        let color = if report.matches_expected() { WHITE } else { ORANGE };
        draw_text(&header, PADDING, y + 16.0, 20.0, color);
        y += HEADER_HEIGHT;

        for (i, texture) in group.textures.iter().enumerate() {
            let x = PADDING + (i % per_row) as f32 * cell;
            let ty = y + (i / per_row) as f32 * cell;
            draw_texture_ex(
                texture,
                x,
                ty,
                WHITE,
                DrawTextureParams {
                    dest_size: Some(vec2(ICON_SIZE, ICON_SIZE)),
                    ..Default::default()
                },
            );
        }

        let rows = group.textures.len().div_ceil(per_row);
        y += rows as f32 * cell + PADDING;
    }
}

fn draw_error(error: &PreloadError) {
    draw_text("Preload failed", PADDING, 40.0, 32.0, RED);
    draw_text(&error.to_string(), PADDING, 70.0, 20.0, LIGHTGRAY);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(name: &str, loaded: usize) -> GroupReport {
        GroupReport {
            name: name.to_string(),
            loaded,
            expected: None,
        }
    }

    #[test]
    fn test_with_members_keeps_same_named_groups_apart() {
        let reports = vec![report("meter", 1), report("meter", 2)];
        let members = vec![
            vec!["a/m0.png".to_string()],
            vec!["b/m0.png".to_string(), "b/m1.png".to_string()],
        ];

        let loaded = with_members(reports, members);
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].paths, vec!["a/m0.png"]);
        assert_eq!(loaded[1].paths, vec!["b/m0.png", "b/m1.png"]);
        assert_eq!(loaded[1].report.loaded, 2);
    }

    #[test]
    fn test_native_failure_exits_non_zero() {
        assert_eq!(failure_exit_code(), Some(1));
    }
}
