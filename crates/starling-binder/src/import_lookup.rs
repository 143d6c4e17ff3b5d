//! The host-supplied synchronous import resolution query (§6 `import_lookup`).

use starling_common::Atom;

/// Another module's already-bound top-level symbol table, as needed to
/// expand a wildcard import.
pub struct ImportedModule {
    /// Every top-level name the module binds.
    pub names: Vec<Atom>,
    /// `__all__`, if the module defines one — governs wildcard expansion.
    pub dunder_all: Option<Vec<Atom>>,
    /// Names of submodules implicitly imported alongside a package
    /// (e.g. binding `pkg` makes `pkg.sub` resolvable if `sub` was
    /// imported anywhere in the program).
    pub implicit_submodules: Vec<Atom>,
    pub docstring: Option<String>,
}

pub trait ImportLookup {
    fn lookup(&self, path: &str) -> Option<ImportedModule>;
}

impl ImportedModule {
    /// Names a `from M import *` should bind: `__all__` if present,
    /// otherwise every non-underscore-prefixed name (§4.3 "ImportFrom").
    #[must_use]
    pub fn wildcard_names(&self) -> Vec<Atom> {
        let mut names = if let Some(all) = &self.dunder_all {
            all.clone()
        } else {
            self.names
                .iter()
                .filter(|n| !n.as_str().starts_with('_'))
                .cloned()
                .collect()
        };
        names.extend(self.implicit_submodules.iter().cloned());
        names
    }
}
