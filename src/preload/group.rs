//! Asset groups - the icon folders preloaded at startup

use serde::{Deserialize, Serialize};

/// Directory the core icon folders live in
pub const ASSET_ROOT: &str = "assets/cores";

/// A named set of icons sharing a directory
///
/// `pattern` is a glob relative to the asset root, e.g. `rpg_meter/*.png`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetGroup {
    pub name: String,
    pub pattern: String,
    /// Number of icons the folder is known to hold. Informational only:
    /// a different count is logged, never rejected.
    #[serde(default)]
    pub expected: Option<usize>,
}

impl AssetGroup {
    pub fn new(name: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pattern: pattern.into(),
            expected: None,
        }
    }

    /// Group covering every PNG directly inside `folder`
    pub fn png_folder(folder: &str) -> Self {
        Self::new(folder, format!("{}/*.png", folder))
    }

    pub fn with_expected(mut self, count: usize) -> Self {
        self.expected = Some(count);
        self
    }

    /// Leading directory of the pattern (everything before the last `/`)
    pub fn directory(&self) -> &str {
        self.pattern
            .rsplit_once('/')
            .map(|(dir, _)| dir)
            .unwrap_or("")
    }
}

/// The core icon groups, in preload order
pub fn core_groups() -> Vec<AssetGroup> {
    vec![
        // 16 fill levels each
        AssetGroup::png_folder("rpg_core_health").with_expected(16),
        AssetGroup::png_folder("rpg_core_stamina").with_expected(16),
        AssetGroup::png_folder("rpg_core_horse_health").with_expected(16),
        AssetGroup::png_folder("rpg_core_horse_stamina").with_expected(16),
        AssetGroup::png_folder("rpg_meter").with_expected(100),
        AssetGroup::png_folder("rpg_meter_track").with_expected(10),
        // Status effects, count varies
        AssetGroup::png_folder("rpg_textures"),
    ]
}
