//! Dependency edges and their symbol-bearing fields.

use std::collections::BTreeMap;

use crate::symbols::{DependencySymbol, MutableDependencySymbols};

/// A directed edge from one asset to another it references.
///
/// The broader graph owns most dependency state; this core owns the
/// symbol mapping. The mapping is lazily allocated on first write so
/// "no symbol facts recorded yet" (`None`) stays distinguishable from
/// "recorded as empty" (`Some` with no entries) — resolution logic
/// treats the two differently.
#[derive(Clone, Debug)]
pub struct Dependency {
    /// Stable identity of this edge.
    pub id: String,
    /// The raw specifier as written in the importing asset.
    pub specifier: String,
    /// Imported/re-exported symbols; `None` until first recorded.
    pub symbols: Option<BTreeMap<String, DependencySymbol>>,
}

impl Dependency {
    /// Creates a dependency edge with no symbol facts recorded.
    pub fn new(id: impl Into<String>, specifier: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            specifier: specifier.into(),
            symbols: None,
        }
    }

    /// Returns the mutable, weak-aware view over this edge's symbols.
    pub fn symbols_view_mut(&mut self) -> MutableDependencySymbols<'_> {
        MutableDependencySymbols::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_dependency_has_no_symbols() {
        let dep = Dependency::new("dep1", "./utils");
        assert!(dep.symbols.is_none());
        assert_eq!(dep.specifier, "./utils");
    }
}
