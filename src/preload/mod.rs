//! Eager preloading of icon asset groups
//!
//! A preload pass takes a [`LoaderMap`] (asset path -> loader) and invokes
//! every loader once. Loader maps come from a [`Resolver`], which expands an
//! [`AssetGroup`]'s glob pattern either against the filesystem or against the
//! build-time [`Manifest`].
//!
//! ## Startup sequence
//!
//! [`preload_groups`] walks the groups in order. For each one it resolves a
//! loader map, runs it, and records a [`GroupReport`] before moving to the
//! next group. Cardinality mismatches are logged only.
//!
//! Any failure halts the pass and is returned to the caller.

use std::collections::HashMap;

mod cache;
mod group;
mod icon;
mod manifest;
mod resolve;

pub use cache::IconCache;
pub use group::{core_groups, AssetGroup, ASSET_ROOT};
pub use icon::IconImage;
pub use manifest::{Manifest, ManifestGroup, MANIFEST_FILE};
pub use resolve::{ManifestResolver, Resolution, Resolver};
#[cfg(not(target_arch = "wasm32"))]
pub use resolve::DirectoryResolver;

/// Error type for preload operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreloadError {
    /// File I/O error
    Io(String),
    /// Image decoding error
    Decode(String),
    /// Invalid glob pattern
    Pattern(String),
    /// Malformed manifest
    Manifest(String),
    /// Unparsable config
    Config(String),
}

impl std::fmt::Display for PreloadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PreloadError::Io(msg) => write!(f, "I/O error: {}", msg),
            PreloadError::Decode(msg) => write!(f, "Decode error: {}", msg),
            PreloadError::Pattern(msg) => write!(f, "Pattern error: {}", msg),
            PreloadError::Manifest(msg) => write!(f, "Manifest error: {}", msg),
            PreloadError::Config(msg) => write!(f, "Config error: {}", msg),
        }
    }
}

impl std::error::Error for PreloadError {}

impl From<std::io::Error> for PreloadError {
    fn from(e: std::io::Error) -> Self {
        PreloadError::Io(e.to_string())
    }
}

/// A zero-argument loader that produces the resident form of one asset
pub type Loader<T, E> = Box<dyn FnOnce() -> Result<T, E>>;

/// Asset path -> loader. Iteration order carries no meaning.
pub type LoaderMap<T, E> = HashMap<String, Loader<T, E>>;

/// Invoke every loader in the map
///
/// Stops at the first failing loader and returns its error.
pub fn preload<T, E>(loaders: LoaderMap<T, E>) -> Result<(), E> {
    preload_into(loaders, |_, _| {})
}

/// Invoke every loader in the map, handing each loaded value to `sink`
///
/// Entries run in path order so callers that keep the values see a stable
/// layout between runs.
pub fn preload_into<T, E, F>(loaders: LoaderMap<T, E>, mut sink: F) -> Result<(), E>
where
    F: FnMut(String, T),
{
    let mut entries: Vec<_> = loaders.into_iter().collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));

    for (path, loader) in entries {
        let value = loader()?;
        sink(path, value);
    }
    Ok(())
}

/// Outcome of preloading one group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupReport {
    pub name: String,
    pub loaded: usize,
    pub expected: Option<usize>,
}

impl GroupReport {
    /// True when the group has no expectation or the count matches it
    pub fn matches_expected(&self) -> bool {
        self.expected.map_or(true, |n| n == self.loaded)
    }
}

/// Preload every group, one at a time and in order
///
/// Each group is resolved and then fully loaded before the next group is
/// resolved, so with [`Resolution::Eager`] only one group's bytes are held
/// at once and a failure leaves later groups untouched.
///
/// `on_loaded` receives the group's index in `groups`, the group, and every
/// icon as it is decoded. A group whose count differs from its expected
/// cardinality is reported but does not fail.
pub fn preload_groups<R, F>(
    resolver: &R,
    groups: &[AssetGroup],
    resolution: Resolution,
    mut on_loaded: F,
) -> Result<Vec<GroupReport>, PreloadError>
where
    R: Resolver + ?Sized,
    F: FnMut(usize, &AssetGroup, String, IconImage),
{
    let mut reports = Vec::with_capacity(groups.len());

    for (index, group) in groups.iter().enumerate() {
        let loaders = resolver.resolve(&group.pattern, resolution)?;

        let mut loaded = 0;
        preload_into(loaders, |path, icon| {
            loaded += 1;
            on_loaded(index, group, path, icon);
        })?;

        let report = GroupReport {
            name: group.name.clone(),
            loaded,
            expected: group.expected,
        };
        match report.expected {
            Some(expected) if !report.matches_expected() => {
                eprintln!(
                    "Preload: group '{}' loaded {} icons, expected {}",
                    report.name, report.loaded, expected
                );
            }
            _ => println!("Preload: {} ({} icons)", report.name, report.loaded),
        }
        reports.push(report);
    }

    Ok(reports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn counting_loader(counter: &Rc<Cell<u32>>) -> Loader<(), String> {
        let counter = Rc::clone(counter);
        Box::new(move || {
            counter.set(counter.get() + 1);
            Ok(())
        })
    }

    #[test]
    fn test_preload_invokes_each_loader_once() {
        let a = Rc::new(Cell::new(0));
        let b = Rc::new(Cell::new(0));

        let mut loaders: LoaderMap<(), String> = HashMap::new();
        loaders.insert("a.png".to_string(), counting_loader(&a));
        loaders.insert("b.png".to_string(), counting_loader(&b));

        assert!(preload(loaders).is_ok());
        assert_eq!(a.get(), 1);
        assert_eq!(b.get(), 1);
    }

    #[test]
    fn test_preload_many_loaders() {
        let counters: Vec<_> = (0..100).map(|_| Rc::new(Cell::new(0))).collect();
        let loaders: LoaderMap<(), String> = counters
            .iter()
            .enumerate()
            .map(|(i, c)| (format!("meter_{:03}.png", i), counting_loader(c)))
            .collect();

        preload(loaders).unwrap();
        assert!(counters.iter().all(|c| c.get() == 1));
    }

    #[test]
    fn test_preload_empty_map() {
        let loaders: LoaderMap<(), String> = HashMap::new();
        assert_eq!(preload(loaders), Ok(()));
    }

    #[test]
    fn test_preload_propagates_failure() {
        let mut loaders: LoaderMap<(), String> = HashMap::new();
        loaders.insert("ok.png".to_string(), Box::new(|| Ok(())));
        loaders.insert(
            "missing.png".to_string(),
            Box::new(|| Err("missing.png: not found".to_string())),
        );

        assert_eq!(preload(loaders), Err("missing.png: not found".to_string()));
    }

    #[test]
    fn test_preload_into_sorted_values() {
        let mut loaders: LoaderMap<u32, String> = HashMap::new();
        loaders.insert("b.png".to_string(), Box::new(|| Ok(2)));
        loaders.insert("a.png".to_string(), Box::new(|| Ok(1)));

        let mut seen = Vec::new();
        preload_into(loaders, |path, value| seen.push((path, value))).unwrap();

        assert_eq!(seen, vec![("a.png".to_string(), 1), ("b.png".to_string(), 2)]);
    }

    /// Resolver that hands back fixed icons for known patterns
    #[derive(Default)]
    struct FixedResolver {
        calls: Cell<usize>,
    }

    impl Resolver for FixedResolver {
        fn resolve(
            &self,
            pattern: &str,
            _resolution: Resolution,
        ) -> Result<LoaderMap<IconImage, PreloadError>, PreloadError> {
            self.calls.set(self.calls.get() + 1);
            let mut loaders: LoaderMap<IconImage, PreloadError> = HashMap::new();
            match pattern {
                "health/*.png" => {
                    for i in 0..2 {
                        let name = format!("core_{:02}", i);
                        let path = format!("health/{}.png", name);
                        loaders.insert(
                            path,
                            Box::new(move || {
                                Ok(IconImage { name, width: 1, height: 1, rgba: vec![0; 4] })
                            }),
                        );
                    }
                }
                "broken/*.png" => {
                    loaders.insert(
                        "broken/x.png".to_string(),
                        Box::new(|| Err(PreloadError::Decode("broken/x.png".to_string()))),
                    );
                }
                "bad[" => return Err(PreloadError::Pattern("bad[".to_string())),
                _ => {}
            }
            Ok(loaders)
        }
    }

    #[test]
    fn test_preload_groups_reports() {
        let groups = vec![
            AssetGroup::new("health", "health/*.png").with_expected(2),
            AssetGroup::new("meter", "meter/*.png").with_expected(100),
        ];

        let mut cache = IconCache::new();
        let mut indices = Vec::new();
        let resolver = FixedResolver::default();
        let reports = preload_groups(&resolver, &groups, Resolution::Eager, |index, _, path, icon| {
            indices.push(index);
            cache.insert(path, icon);
        })
        .unwrap();

        assert_eq!(cache.len(), 2);
        assert!(cache.contains("health/core_00.png"));
        assert_eq!(indices, vec![0, 0]);
        assert!(reports[0].matches_expected());
        // Mismatch is reported, not failed
        assert_eq!(reports[1].loaded, 0);
        assert!(!reports[1].matches_expected());
    }

    #[test]
    fn test_preload_groups_loads_each_group_before_resolving_next() {
        let groups = vec![
            AssetGroup::new("health", "health/*.png"),
            AssetGroup::new("meter", "meter/*.png"),
        ];
        let resolver = FixedResolver::default();

        let mut order = Vec::new();
        preload_groups(&resolver, &groups, Resolution::Eager, |_, group, _, _| {
            order.push(format!("load {} after {} resolves", group.name, resolver.calls.get()));
        })
        .unwrap();

        // Both health icons load while only the first group has been resolved
        assert_eq!(order, vec!["load health after 1 resolves", "load health after 1 resolves"]);
        assert_eq!(resolver.calls.get(), 2);
    }

    #[test]
    fn test_preload_groups_halts_on_failure() {
        let groups = vec![
            AssetGroup::new("broken", "broken/*.png"),
            AssetGroup::new("bad", "bad["),
            AssetGroup::new("health", "health/*.png"),
        ];
        let resolver = FixedResolver::default();

        let mut loaded = 0;
        let result = preload_groups(&resolver, &groups, Resolution::Eager, |_, _, _, _| loaded += 1);

        // The first group's decode failure wins; later groups are never resolved
        assert_eq!(result, Err(PreloadError::Decode("broken/x.png".to_string())));
        assert_eq!(loaded, 0);
        assert_eq!(resolver.calls.get(), 1);
    }

    #[test]
    fn test_preload_groups_propagates_pattern_error() {
        let groups = vec![
            AssetGroup::new("health", "health/*.png"),
            AssetGroup::new("bad", "bad["),
        ];

        let mut loaded = 0;
        let resolver = FixedResolver::default();
        let result = preload_groups(&resolver, &groups, Resolution::Deferred, |_, _, _, _| loaded += 1);
        assert!(matches!(result, Err(PreloadError::Pattern(_))));
        assert_eq!(loaded, 2);
    }
}
