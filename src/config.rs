//! Preload configuration
//!
//! Read from `preload.ron` next to the executable's working directory.
//! Every field is optional; a missing file means the built-in core groups
//! under `assets/cores`.
//!
//! ```ron
//! (
//!     asset_root: "assets/cores",
//!     resolution: Eager,
//!     groups: [
//!         (name: "rpg_meter", pattern: "rpg_meter/*.png", expected: Some(100)),
//!     ],
//! )
//! ```

#[cfg(not(target_arch = "wasm32"))]
use std::path::Path;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::preload::{core_groups, AssetGroup, PreloadError, Resolution, ASSET_ROOT};

/// Default config file name
pub const CONFIG_FILE: &str = "preload.ron";

fn default_asset_root() -> PathBuf {
    PathBuf::from(ASSET_ROOT)
}

/// What to preload and from where
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreloadConfig {
    /// Directory all group patterns are relative to
    #[serde(default = "default_asset_root")]
    pub asset_root: PathBuf,
    #[serde(default)]
    pub resolution: Resolution,
    #[serde(default = "core_groups")]
    pub groups: Vec<AssetGroup>,
}

impl Default for PreloadConfig {
    fn default() -> Self {
        Self {
            asset_root: default_asset_root(),
            resolution: Resolution::default(),
            groups: core_groups(),
        }
    }
}

impl PreloadConfig {
    pub fn from_ron(text: &str) -> Result<Self, PreloadError> {
        ron::from_str(text).map_err(|e| PreloadError::Config(e.to_string()))
    }

    pub fn to_ron(&self) -> Result<String, PreloadError> {
        let config = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .indentor("  ".to_string());
        ron::ser::to_string_pretty(self, config).map_err(|e| PreloadError::Config(e.to_string()))
    }

    /// Load the config at `path`, or the defaults if there is no such file
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_or_default(path: &Path) -> Result<Self, PreloadError> {
        if !path.exists() {
            println!("Config: {} not found, using built-in core groups", path.display());
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(path)
            .map_err(|e| PreloadError::Io(format!("{}: {}", path.display(), e)))?;
        let config: Self = ron::from_str(&text)
            .map_err(|e| PreloadError::Config(format!("{}: {}", path.display(), e)))?;
        println!("Config: loaded {} ({} groups)", path.display(), config.groups.len());
        Ok(config)
    }
}
