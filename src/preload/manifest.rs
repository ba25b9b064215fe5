//! Build-time manifest of icon groups
//!
//! WASM builds can't list directories, so `build.rs` writes a manifest of
//! every group folder and its PNG files:
//!
//! ```text
//! [rpg_core_health]
//! core_00.png
//! core_01.png
//!
//! [rpg_meter]
//! meter_000.png
//! ```
//!
//! Blank lines and `#` comments are ignored.

#[cfg(not(target_arch = "wasm32"))]
use std::path::Path;

use glob::{MatchOptions, Pattern};

use super::PreloadError;

/// Manifest file name inside the asset root
pub const MANIFEST_FILE: &str = "manifest.txt";

/// Glob options shared by the manifest and the directory scan
///
/// `*` stays inside one folder, and extensions match in any case since the
/// scan accepts `.png` in any case.
pub(crate) fn match_options() -> MatchOptions {
    MatchOptions {
        case_sensitive: false,
        require_literal_separator: true,
        require_literal_leading_dot: false,
    }
}

/// One `[group]` section of the manifest
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestGroup {
    pub name: String,
    pub files: Vec<String>,
}

/// Listing of group folders and their files
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    groups: Vec<ManifestGroup>,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse manifest text
    pub fn parse(text: &str) -> Result<Self, PreloadError> {
        let mut groups: Vec<ManifestGroup> = Vec::new();

        for (index, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some(header) = line.strip_prefix('[') {
                let name = header.strip_suffix(']').map(str::trim).unwrap_or("");
                if name.is_empty() {
                    return Err(PreloadError::Manifest(format!(
                        "line {}: malformed group header '{}'",
                        index + 1,
                        line
                    )));
                }
                if groups.iter().any(|g| g.name == name) {
                    return Err(PreloadError::Manifest(format!(
                        "line {}: group '{}' listed twice",
                        index + 1,
                        name
                    )));
                }
                groups.push(ManifestGroup {
                    name: name.to_string(),
                    files: Vec::new(),
                });
                continue;
            }

            if line.contains('/') || line.contains('\\') {
                return Err(PreloadError::Manifest(format!(
                    "line {}: entry '{}' is not a plain file name",
                    index + 1,
                    line
                )));
            }

            match groups.last_mut() {
                Some(group) => group.files.push(line.to_string()),
                None => {
                    return Err(PreloadError::Manifest(format!(
                        "line {}: entry '{}' before any [group] header",
                        index + 1,
                        line
                    )))
                }
            }
        }

        Ok(Self { groups })
    }

    /// Scan `dir` for group folders holding PNG files
    ///
    /// Folders and files are sorted by name; folders without PNGs are skipped.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn scan(dir: &Path) -> Result<Self, PreloadError> {
        let mut folders: Vec<_> = std::fs::read_dir(dir)?
            .filter_map(|e| e.ok())
            .filter(|e| e.path().is_dir())
            .collect();
        folders.sort_by_key(|e| e.file_name());

        let mut manifest = Self::new();
        for folder in folders {
            let mut files: Vec<String> = std::fs::read_dir(folder.path())?
                .filter_map(|e| e.ok())
                .map(|e| e.path())
                .filter(|p| {
                    p.is_file()
                        && p.extension()
                            .map(|ext| ext.to_ascii_lowercase() == "png")
                            .unwrap_or(false)
                })
                .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().to_string()))
                .collect();
            files.sort();

            if !files.is_empty() {
                manifest.push_group(folder.file_name().to_string_lossy(), files);
            }
        }

        Ok(manifest)
    }

    /// Render in the on-disk format
    pub fn render(&self) -> String {
        let mut out = String::new();
        for group in self.groups.iter().filter(|g| !g.files.is_empty()) {
            out.push_str(&format!("[{}]\n", group.name));
            for file in &group.files {
                out.push_str(file);
                out.push('\n');
            }
            out.push('\n');
        }
        out
    }

    pub fn push_group(&mut self, name: impl Into<String>, files: Vec<String>) {
        self.groups.push(ManifestGroup {
            name: name.into(),
            files,
        });
    }

    pub fn groups(&self) -> &[ManifestGroup] {
        &self.groups
    }

    pub fn group(&self, name: &str) -> Option<&ManifestGroup> {
        self.groups.iter().find(|g| g.name == name)
    }

    /// All entries as `group/file` paths relative to the asset root
    pub fn entries(&self) -> impl Iterator<Item = String> + '_ {
        self.groups
            .iter()
            .flat_map(|g| g.files.iter().map(move |f| format!("{}/{}", g.name, f)))
    }

    /// Entries matching `pattern`, as `group/file` paths
    pub fn matching(&self, pattern: &str) -> Result<Vec<String>, PreloadError> {
        let compiled = Pattern::new(pattern)
            .map_err(|e| PreloadError::Pattern(format!("{}: {}", pattern, e)))?;
        Ok(self
            .entries()
            .filter(|key| compiled.matches_with(key, match_options()))
            .collect())
    }

    /// Total number of files listed
    pub fn len(&self) -> usize {
        self.groups.iter().map(|g| g.files.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
