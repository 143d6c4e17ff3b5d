//! String interning for identifier deduplication.
//!
//! The binder allocates a symbol per distinct name in a scope and compares
//! names constantly during lookup; interning turns those comparisons into
//! pointer/integer comparisons and collapses repeated identifier text (every
//! occurrence of a common name like `self` or `x`) into one allocation.

use rustc_hash::FxHashMap;
use std::sync::Arc;

/// An interned string. Cheap to copy and compare.
#[derive(Clone, Debug, Eq)]
pub struct Atom(Arc<str>);

impl Atom {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl PartialEq for Atom {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0 == other.0
    }
}

impl std::hash::Hash for Atom {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl std::fmt::Display for Atom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::ops::Deref for Atom {
    type Target = str;
    fn deref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Atom {
    fn from(s: &str) -> Self {
        Atom(Arc::from(s))
    }
}

/// A simple string interner. Not thread-shared; each binder owns its own
/// instance, matching the single-threaded-per-module model (see the
/// concurrency section of the design notes).
#[derive(Default)]
pub struct Interner {
    map: FxHashMap<Arc<str>, Atom>,
}

impl Interner {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intern(&mut self, s: &str) -> Atom {
        if let Some(atom) = self.map.get(s) {
            return atom.clone();
        }
        let arc: Arc<str> = Arc::from(s);
        let atom = Atom(arc.clone());
        self.map.insert(arc, atom.clone());
        atom
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
