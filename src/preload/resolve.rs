//! Pattern resolution - turns an asset group's glob into a loader map
//!
//! Keys are paths relative to the asset root with `/` separators
//! (`rpg_meter/meter_042.png`), whichever resolver produced them.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::icon::{file_stem, IconImage};
use super::manifest::{match_options, Manifest};
use super::{Loader, LoaderMap, PreloadError};

/// When an asset's bytes are read
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resolution {
    /// Read while the loader map is built; loaders only decode
    #[default]
    Eager,
    /// Read when the loader is invoked
    Deferred,
}

/// Produces loader maps from glob patterns
pub trait Resolver {
    fn resolve(
        &self,
        pattern: &str,
        resolution: Resolution,
    ) -> Result<LoaderMap<IconImage, PreloadError>, PreloadError>;
}

/// Full glob for `pattern` under `root`; an empty root is the working directory
#[cfg(not(target_arch = "wasm32"))]
fn root_pattern(root: &Path, pattern: &str) -> String {
    let root = root.to_string_lossy();
    if root.is_empty() {
        return pattern.to_string();
    }
    let root = glob::Pattern::escape(&root);
    format!("{}/{}", root.trim_end_matches('/'), pattern)
}

/// Key for `path` relative to `root`
fn asset_key(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().to_string())
        .collect::<Vec<_>>()
        .join("/")
}

fn bytes_loader(bytes: Vec<u8>, name: String) -> Loader<IconImage, PreloadError> {
    Box::new(move || IconImage::from_bytes(&bytes, name))
}

#[cfg(not(target_arch = "wasm32"))]
fn file_loader(
    path: PathBuf,
    resolution: Resolution,
) -> Result<Loader<IconImage, PreloadError>, PreloadError> {
    match resolution {
        Resolution::Eager => {
            let bytes = std::fs::read(&path)
                .map_err(|e| PreloadError::Io(format!("{}: {}", path.display(), e)))?;
            Ok(bytes_loader(bytes, file_stem(&path)))
        }
        Resolution::Deferred => Ok(Box::new(move || IconImage::from_file(&path))),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn disk_loader(
    path: PathBuf,
    resolution: Resolution,
) -> Result<Loader<IconImage, PreloadError>, PreloadError> {
    file_loader(path, resolution)
}

/// No filesystem on WASM; everything has to be prefetched
#[cfg(target_arch = "wasm32")]
fn disk_loader(
    path: PathBuf,
    _resolution: Resolution,
) -> Result<Loader<IconImage, PreloadError>, PreloadError> {
    Err(PreloadError::Io(format!("{}: not fetched", path.display())))
}

/// Resolves patterns by scanning the filesystem under `root`
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct DirectoryResolver {
    root: PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl DirectoryResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Resolver for DirectoryResolver {
    fn resolve(
        &self,
        pattern: &str,
        resolution: Resolution,
    ) -> Result<LoaderMap<IconImage, PreloadError>, PreloadError> {
        let full = root_pattern(&self.root, pattern);
        let paths = glob::glob_with(&full, match_options())
            .map_err(|e| PreloadError::Pattern(format!("{}: {}", pattern, e)))?;

        let mut loaders: LoaderMap<IconImage, PreloadError> = HashMap::new();
        for entry in paths {
            let path = entry.map_err(|e| PreloadError::Io(e.to_string()))?;
            if !path.is_file() {
                continue;
            }
            let key = asset_key(&self.root, &path);
            loaders.insert(key, file_loader(path, resolution)?);
        }

        Ok(loaders)
    }
}

/// Resolves patterns against a build-time [`Manifest`]
///
/// Bytes for an entry come from the prefetched set when present (WASM
/// fetches them up front), otherwise from `root` on disk.
#[derive(Debug, Clone, Default)]
pub struct ManifestResolver {
    root: PathBuf,
    manifest: Manifest,
    prefetched: HashMap<String, Vec<u8>>,
}

impl ManifestResolver {
    pub fn new(root: impl Into<PathBuf>, manifest: Manifest) -> Self {
        Self {
            root: root.into(),
            manifest,
            prefetched: HashMap::new(),
        }
    }

    /// Supply already-fetched bytes keyed by `group/file`
    pub fn with_prefetched(mut self, prefetched: HashMap<String, Vec<u8>>) -> Self {
        self.prefetched = prefetched;
        self
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    fn loader_for(
        &self,
        key: &str,
        resolution: Resolution,
    ) -> Result<Loader<IconImage, PreloadError>, PreloadError> {
        let path = self.root.join(key);
        match self.prefetched.get(key) {
            Some(bytes) => Ok(bytes_loader(bytes.clone(), file_stem(&path))),
            None => disk_loader(path, resolution),
        }
    }
}

impl Resolver for ManifestResolver {
    fn resolve(
        &self,
        pattern: &str,
        resolution: Resolution,
    ) -> Result<LoaderMap<IconImage, PreloadError>, PreloadError> {
        let mut loaders: LoaderMap<IconImage, PreloadError> = HashMap::new();
        for key in self.manifest.matching(pattern)? {
            let loader = self.loader_for(&key, resolution)?;
            loaders.insert(key, loader);
        }

        Ok(loaders)
    }
}
