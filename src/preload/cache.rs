//! Icon cache - preloaded icons kept resident for drawing

use std::collections::HashMap;

use super::icon::IconImage;

/// Preloaded icons keyed by asset path (`group/file.png`)
#[derive(Debug, Default)]
pub struct IconCache {
    icons: HashMap<String, IconImage>,
    /// Paths in insertion order (for iteration order)
    paths: Vec<String>,
}

impl IconCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an icon
    ///
    /// If the path is already cached, the icon is replaced in place.
    pub fn insert(&mut self, path: String, icon: IconImage) {
        if !self.icons.contains_key(&path) {
            self.paths.push(path.clone());
        }
        self.icons.insert(path, icon);
    }

    pub fn get(&self, path: &str) -> Option<&IconImage> {
        self.icons.get(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.icons.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.icons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }

    /// Iterate over all icons in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &IconImage)> {
        self.paths
            .iter()
            .filter_map(|path| self.icons.get(path).map(|icon| (path.as_str(), icon)))
    }

    /// Icons whose path sits directly under `directory`
    pub fn group<'a>(&'a self, directory: &'a str) -> impl Iterator<Item = (&'a str, &'a IconImage)> + 'a {
        self.iter().filter(move |(path, _)| {
            path.rsplit_once('/')
                .map(|(dir, _)| dir == directory)
                .unwrap_or(directory.is_empty())
        })
    }

    /// Decoded pixel bytes held by the cache
    pub fn total_bytes(&self) -> usize {
        self.icons.values().map(IconImage::byte_len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn icon(name: &str, size: u32) -> IconImage {
        IconImage {
            name: name.to_string(),
            width: size,
            height: size,
            rgba: vec![0; (size * size * 4) as usize],
        }
    }

    #[test]
    fn test_cache_operations() {
        let mut cache = IconCache::new();
        assert!(cache.is_empty());

        cache.insert("rpg_meter/meter_001.png".into(), icon("meter_001", 2));
        cache.insert("rpg_meter/meter_000.png".into(), icon("meter_000", 2));
        cache.insert("rpg_meter_track/track_0.png".into(), icon("track_0", 4));

        assert_eq!(cache.len(), 3);
        assert!(cache.contains("rpg_meter/meter_000.png"));
        assert_eq!(cache.get("rpg_meter_track/track_0.png").unwrap().width, 4);
        assert_eq!(cache.total_bytes(), 16 + 16 + 64);

        // Insertion order is kept
        let names: Vec<_> = cache.iter().map(|(_, icon)| icon.name.as_str()).collect();
        assert_eq!(names, vec!["meter_001", "meter_000", "track_0"]);
    }

    #[test]
    fn test_replace_keeps_position() {
        let mut cache = IconCache::new();
        cache.insert("a/x.png".into(), icon("x", 1));
        cache.insert("a/y.png".into(), icon("y", 1));
        cache.insert("a/x.png".into(), icon("x", 3));

        assert_eq!(cache.len(), 2);
        let paths: Vec<_> = cache.iter().map(|(path, _)| path).collect();
        assert_eq!(paths, vec!["a/x.png", "a/y.png"]);
        assert_eq!(cache.get("a/x.png").unwrap().width, 3);
    }

    #[test]
    fn test_group_filter() {
        let mut cache = IconCache::new();
        cache.insert("rpg_meter/meter_000.png".into(), icon("meter_000", 1));
        cache.insert("rpg_meter_track/track_0.png".into(), icon("track_0", 1));
        cache.insert("loose.png".into(), icon("loose", 1));

        let meter: Vec<_> = cache.group("rpg_meter").map(|(path, _)| path).collect();
        assert_eq!(meter, vec!["rpg_meter/meter_000.png"]);

        let root: Vec<_> = cache.group("").map(|(path, _)| path).collect();
        assert_eq!(root, vec!["loose.png"]);
    }
}
