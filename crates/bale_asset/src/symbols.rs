//! Symbol table views over asset and dependency records.
//!
//! Three accessor types share one underlying mapping per record: a
//! read-only export view, a mutable export view with last-write-wins
//! semantics, and a weak-aware per-dependency view that merges repeated
//! writes. Views are cheap borrow handles bound to their record; they
//! own no storage, so a mutation through any view over a record is
//! visible through every other view over that record. Call sites pick
//! the concrete view statically — there is no dynamic dispatch across
//! the three.
//!
//! Callers must not mutate a record's symbol mapping from concurrent
//! tasks; the views add no locking of their own (the borrow checker
//! enforces this for same-thread use).

use bale_common::SourceLocation;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::asset::Asset;
use crate::dependency::Dependency;

/// An exported binding on an asset: the local name behind an export name.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct AssetSymbol {
    /// The local binding name within the asset.
    pub local: String,
    /// Where the binding was declared, when known.
    pub loc: Option<SourceLocation>,
}

/// An imported/re-exported binding on a dependency edge.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct DependencySymbol {
    /// The local binding name within the importing asset.
    pub local: String,
    /// Where the import/re-export was written, when known.
    pub loc: Option<SourceLocation>,
    /// Whether this binding alone must not force inclusion of what it
    /// refers to (a blind re-export). See
    /// [`MutableDependencySymbols::set`] for the merge rule.
    pub is_weak: bool,
}

/// Read-only view over an asset's exported symbols.
///
/// An unanalyzed asset (`symbols: None`) reads as empty.
#[derive(Clone, Copy)]
pub struct AssetSymbols<'a> {
    symbols: Option<&'a BTreeMap<String, AssetSymbol>>,
}

impl<'a> AssetSymbols<'a> {
    pub(crate) fn new(asset: &'a Asset) -> Self {
        Self {
            symbols: asset.symbols.as_ref(),
        }
    }

    /// Looks up the binding for an export name.
    pub fn get(&self, export_symbol: &str) -> Option<&'a AssetSymbol> {
        self.symbols.and_then(|map| map.get(export_symbol))
    }

    /// Returns `true` if the asset exports the given name.
    pub fn has_export_symbol(&self, export_symbol: &str) -> bool {
        self.symbols
            .is_some_and(|map| map.contains_key(export_symbol))
    }

    /// Returns `true` if any export is backed by the given local name.
    /// Linear scan.
    pub fn has_local_symbol(&self, local: &str) -> bool {
        self.symbols
            .is_some_and(|map| map.values().any(|s| s.local == local))
    }

    /// Iterates over exported names.
    ///
    /// Reflects the mapping at call time; callers must not mutate the
    /// record while iterating.
    pub fn export_symbols(&self) -> impl Iterator<Item = &'a str> {
        self.symbols.into_iter().flatten().map(|(k, _)| k.as_str())
    }

    /// Iterates over `(export name, binding)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a AssetSymbol)> {
        self.symbols
            .into_iter()
            .flatten()
            .map(|(k, v)| (k.as_str(), v))
    }
}

/// Mutable view over an asset's exported symbols.
///
/// Writes are unconditional: `set` overwrites any existing binding for
/// the export name (last write wins). The weak-merge rule exists only on
/// dependency edges.
pub struct MutableAssetSymbols<'a> {
    asset: &'a mut Asset,
}

impl<'a> MutableAssetSymbols<'a> {
    pub(crate) fn new(asset: &'a mut Asset) -> Self {
        Self { asset }
    }

    /// Inserts or overwrites the binding for an export name.
    pub fn set(&mut self, export_symbol: impl Into<String>, local: impl Into<String>, loc: Option<SourceLocation>) {
        self.asset.symbols.get_or_insert_with(BTreeMap::new).insert(
            export_symbol.into(),
            AssetSymbol {
                local: local.into(),
                loc,
            },
        );
    }

    /// Removes all exports, leaving the asset analyzed-and-empty.
    pub fn clear(&mut self) {
        match &mut self.asset.symbols {
            Some(map) => map.clear(),
            None => self.asset.symbols = Some(BTreeMap::new()),
        }
    }

    /// Looks up the binding for an export name.
    pub fn get(&self, export_symbol: &str) -> Option<&AssetSymbol> {
        self.asset
            .symbols
            .as_ref()
            .and_then(|map| map.get(export_symbol))
    }

    /// Returns `true` if the asset exports the given name.
    pub fn has_export_symbol(&self, export_symbol: &str) -> bool {
        self.asset
            .symbols
            .as_ref()
            .is_some_and(|map| map.contains_key(export_symbol))
    }

    /// Returns `true` if any export is backed by the given local name.
    pub fn has_local_symbol(&self, local: &str) -> bool {
        self.asset
            .symbols
            .as_ref()
            .is_some_and(|map| map.values().any(|s| s.local == local))
    }

    /// Iterates over exported names.
    pub fn export_symbols(&self) -> impl Iterator<Item = &str> {
        self.asset
            .symbols
            .iter()
            .flatten()
            .map(|(k, _)| k.as_str())
    }

    /// Iterates over `(export name, binding)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AssetSymbol)> {
        self.asset
            .symbols
            .iter()
            .flatten()
            .map(|(k, v)| (k.as_str(), v))
    }
}

/// Mutable, weak-aware view over a dependency edge's symbols.
///
/// The underlying mapping is lazily allocated: reads of an unallocated
/// mapping see it as empty without allocating, and [`Self::is_cleared`]
/// reports whether allocation has happened at all.
pub struct MutableDependencySymbols<'a> {
    dep: &'a mut Dependency,
}

impl<'a> MutableDependencySymbols<'a> {
    pub(crate) fn new(dep: &'a mut Dependency) -> Self {
        Self { dep }
    }

    /// Allocates an empty mapping if none exists yet. Idempotent.
    pub fn ensure(&mut self) {
        if self.dep.symbols.is_none() {
            self.dep.symbols = Some(BTreeMap::new());
        }
    }

    /// Returns `true` iff no symbol mapping has ever been allocated.
    ///
    /// Distinct from present-and-empty: an edge that was written to and
    /// then emptied still reports `false`.
    pub fn is_cleared(&self) -> bool {
        self.dep.symbols.is_none()
    }

    /// Records a symbol on this edge, merging the weak flag.
    ///
    /// The stored flag is `previous AND incoming`, where a missing
    /// previous entry counts as weak and an unspecified incoming flag
    /// counts as strong. Weakness is therefore monotonically
    /// non-increasing: one strong write (a real, used-if-referenced
    /// import) permanently overrides any number of weak re-exports of
    /// the same name, and a symbol stays weak only if every write to it
    /// was weak.
    pub fn set(
        &mut self,
        export_symbol: impl Into<String>,
        local: impl Into<String>,
        loc: Option<SourceLocation>,
        is_weak: Option<bool>,
    ) {
        let symbols = self.dep.symbols.get_or_insert_with(BTreeMap::new);
        let export_symbol = export_symbol.into();
        let previous_weak = symbols
            .get(&export_symbol)
            .map(|s| s.is_weak)
            .unwrap_or(true);
        symbols.insert(
            export_symbol,
            DependencySymbol {
                local: local.into(),
                loc,
                is_weak: previous_weak && is_weak.unwrap_or(false),
            },
        );
    }

    /// Looks up the binding for an export name.
    pub fn get(&self, export_symbol: &str) -> Option<&DependencySymbol> {
        self.dep
            .symbols
            .as_ref()
            .and_then(|map| map.get(export_symbol))
    }

    /// Returns `true` if this edge records the given export name.
    pub fn has_export_symbol(&self, export_symbol: &str) -> bool {
        self.dep
            .symbols
            .as_ref()
            .is_some_and(|map| map.contains_key(export_symbol))
    }

    /// Returns `true` if any recorded symbol is bound to the given local
    /// name.
    pub fn has_local_symbol(&self, local: &str) -> bool {
        self.dep
            .symbols
            .as_ref()
            .is_some_and(|map| map.values().any(|s| s.local == local))
    }

    /// Iterates over recorded export names.
    pub fn export_symbols(&self) -> impl Iterator<Item = &str> {
        self.dep.symbols.iter().flatten().map(|(k, _)| k.as_str())
    }

    /// Iterates over `(export name, binding)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &DependencySymbol)> {
        self.dep
            .symbols
            .iter()
            .flatten()
            .map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::{create_asset, AssetOptions, SymbolsInit};
    use std::path::PathBuf;

    fn test_asset() -> Asset {
        create_asset(AssetOptions {
            id_base: Some("src/a.js".to_string()),
            file_path: PathBuf::from("src/a.js"),
            kind: "js".to_string(),
            is_source: true,
            ..Default::default()
        })
        .unwrap()
    }

    fn unanalyzed_asset() -> Asset {
        create_asset(AssetOptions {
            id_base: Some("src/a.js".to_string()),
            file_path: PathBuf::from("src/a.js"),
            kind: "js".to_string(),
            is_source: true,
            symbols: SymbolsInit::Unanalyzed,
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn unanalyzed_asset_reads_empty() {
        let asset = unanalyzed_asset();
        let view = asset.symbols_view();
        assert!(view.get("default").is_none());
        assert!(!view.has_export_symbol("default"));
        assert!(!view.has_local_symbol("x"));
        assert_eq!(view.export_symbols().count(), 0);
        // Reads never allocate the mapping.
        assert!(asset.symbols.is_none());
    }

    #[test]
    fn mutable_set_then_read() {
        let mut asset = test_asset();
        asset.symbols_view_mut().set("default", "_default", None);

        let view = asset.symbols_view();
        assert_eq!(view.get("default").unwrap().local, "_default");
        assert!(view.has_export_symbol("default"));
        assert!(view.has_local_symbol("_default"));
        assert!(!view.has_local_symbol("default"));
    }

    #[test]
    fn set_overwrites_unconditionally() {
        let mut asset = test_asset();
        let mut view = asset.symbols_view_mut();
        view.set("x", "first", None);
        view.set("x", "second", None);
        assert_eq!(view.get("x").unwrap().local, "second");
    }

    #[test]
    fn clear_removes_all_exports() {
        let mut asset = test_asset();
        let mut view = asset.symbols_view_mut();
        view.set("a", "a", None);
        view.set("b", "b", None);
        view.clear();
        assert_eq!(view.export_symbols().count(), 0);
        // Cleared is analyzed-and-empty, not unanalyzed.
        assert!(asset.symbols.is_some());
    }

    #[test]
    fn location_is_stored() {
        let mut asset = test_asset();
        let loc = SourceLocation::on_line("src/a.js", 4, 1, 20);
        asset
            .symbols_view_mut()
            .set("util", "util", Some(loc.clone()));
        assert_eq!(asset.symbols_view().get("util").unwrap().loc, Some(loc));
    }

    #[test]
    fn iteration_yields_pairs() {
        let mut asset = test_asset();
        let mut view = asset.symbols_view_mut();
        view.set("a", "localA", None);
        view.set("b", "localB", None);

        let pairs: Vec<(String, String)> = asset
            .symbols_view()
            .iter()
            .map(|(k, v)| (k.to_string(), v.local.clone()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("a".to_string(), "localA".to_string()),
                ("b".to_string(), "localB".to_string()),
            ]
        );
    }

    #[test]
    fn mutations_visible_through_fresh_views() {
        let mut asset = test_asset();
        asset.symbols_view_mut().set("x", "x1", None);
        assert!(asset.symbols_view().has_export_symbol("x"));
        asset.symbols_view_mut().set("y", "y1", None);
        assert!(asset.symbols_view().has_export_symbol("y"));
        assert!(asset.symbols_view().has_export_symbol("x"));
    }

    mod dependency_view {
        use super::*;
        use crate::dependency::Dependency;

        #[test]
        fn untouched_edge_is_cleared() {
            let mut dep = Dependency::new("d1", "./utils");
            let view = dep.symbols_view_mut();
            assert!(view.is_cleared());
            assert!(view.get("x").is_none());
            assert!(!view.has_export_symbol("x"));
            assert_eq!(view.export_symbols().count(), 0);
            // Reads never allocate.
            assert!(dep.symbols.is_none());
        }

        #[test]
        fn ensure_allocates_once() {
            let mut dep = Dependency::new("d1", "./utils");
            let mut view = dep.symbols_view_mut();
            view.ensure();
            assert!(!view.is_cleared());
            assert_eq!(view.export_symbols().count(), 0);
            view.ensure();
            assert!(!view.is_cleared());
        }

        #[test]
        fn set_allocates_lazily() {
            let mut dep = Dependency::new("d1", "./utils");
            let mut view = dep.symbols_view_mut();
            assert!(view.is_cleared());
            view.set("x", "localX", None, Some(false));
            assert!(!view.is_cleared());
            assert_eq!(view.get("x").unwrap().local, "localX");
        }

        #[test]
        fn unspecified_weak_defaults_to_strong() {
            // Documented default: an unspecified flag on write means a
            // strong (real) import, not a weak re-export.
            let mut dep = Dependency::new("d1", "./utils");
            let mut view = dep.symbols_view_mut();
            view.set("x", "localX", None, None);
            assert!(!view.get("x").unwrap().is_weak);
        }

        #[test]
        fn all_weak_writes_stay_weak() {
            let mut dep = Dependency::new("d1", "./utils");
            let mut view = dep.symbols_view_mut();
            view.set("x", "localX", None, Some(true));
            view.set("x", "localX", None, Some(true));
            assert!(view.get("x").unwrap().is_weak);
        }

        #[test]
        fn weakness_is_monotonically_non_increasing() {
            let mut dep = Dependency::new("d1", "./utils");
            let mut view = dep.symbols_view_mut();
            view.set("a", "localA", None, Some(true));
            view.set("a", "localA", None, Some(false));
            view.set("a", "localA", None, Some(true));
            // A later weak re-export cannot resurrect weakness.
            assert!(!view.get("a").unwrap().is_weak);
        }

        #[test]
        fn strong_then_weak_stays_strong() {
            let mut dep = Dependency::new("d1", "./utils");
            let mut view = dep.symbols_view_mut();
            view.set("a", "localA", None, Some(false));
            view.set("a", "localA", None, Some(true));
            assert!(!view.get("a").unwrap().is_weak);
        }

        #[test]
        fn merge_is_per_export_name() {
            let mut dep = Dependency::new("d1", "./utils");
            let mut view = dep.symbols_view_mut();
            view.set("a", "localA", None, Some(false));
            view.set("b", "localB", None, Some(true));
            assert!(!view.get("a").unwrap().is_weak);
            assert!(view.get("b").unwrap().is_weak);
        }

        #[test]
        fn set_updates_local_and_location() {
            let mut dep = Dependency::new("d1", "./utils");
            let mut view = dep.symbols_view_mut();
            view.set("a", "old", None, Some(true));
            let loc = SourceLocation::on_line("src/a.js", 2, 1, 5);
            view.set("a", "new", Some(loc.clone()), Some(true));
            let symbol = view.get("a").unwrap();
            assert_eq!(symbol.local, "new");
            assert_eq!(symbol.loc, Some(loc));
        }

        #[test]
        fn has_local_symbol_scans_values() {
            let mut dep = Dependency::new("d1", "./utils");
            let mut view = dep.symbols_view_mut();
            view.set("exported", "aliased", None, None);
            assert!(view.has_local_symbol("aliased"));
            assert!(!view.has_local_symbol("exported"));
        }

        #[test]
        fn iteration_reflects_merged_state() {
            let mut dep = Dependency::new("d1", "./utils");
            let mut view = dep.symbols_view_mut();
            view.set("a", "localA", None, Some(true));
            view.set("b", "localB", None, None);
            let weak_flags: Vec<(String, bool)> = view
                .iter()
                .map(|(k, v)| (k.to_string(), v.is_weak))
                .collect();
            assert_eq!(
                weak_flags,
                vec![("a".to_string(), true), ("b".to_string(), false)]
            );
        }
    }
}
