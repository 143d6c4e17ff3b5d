//! Tracks `global`/`nonlocal` declarations within the current execution scope
//! (§4.3 "Global"/"Nonlocal").

use rustc_hash::{FxHashMap, FxHashSet};
use starling_common::Atom;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotLocalKind {
    Global,
    Nonlocal,
}

/// Reset on every `with_new_scope` entry (§4.3 "Scope creation protocol").
#[derive(Clone, Debug, Default)]
pub struct NotLocalBindings {
    declared: FxHashMap<Atom, NotLocalKind>,
    /// Names already assigned as an ordinary local before a
    /// `global`/`nonlocal` declaration for the same name was seen — used to
    /// diagnose "assigned before declared nonlocal/global".
    assigned_before_declaration: FxHashSet<Atom>,
}

impl NotLocalBindings {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<NotLocalKind> {
        self.declared.get(name).copied()
    }

    pub fn declare(&mut self, name: Atom, kind: NotLocalKind) {
        self.declared.insert(name, kind);
    }

    pub fn mark_assigned(&mut self, name: Atom) {
        self.assigned_before_declaration.insert(name);
    }

    #[must_use]
    pub fn was_assigned(&self, name: &str) -> bool {
        self.assigned_before_declaration.contains(name)
    }
}
