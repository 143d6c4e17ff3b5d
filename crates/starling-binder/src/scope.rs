//! Scopes and the symbol-table lookup routines (C1, §3 "Scope", §4.1).

use rustc_hash::FxHashMap;
use starling_ast::NodeIndex;
use starling_common::Atom;

use crate::ids::ScopeId;
use crate::symbol::{SymbolArena, SymbolFlags};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScopeKind {
    Builtin,
    Module,
    Class,
    Function,
    Comprehension,
}

impl ScopeKind {
    /// Execution scopes run independently for narrowing purposes; Class and
    /// Comprehension scopes are not (glossary: "Execution scope").
    #[must_use]
    pub const fn is_execution_scope(self) -> bool {
        matches!(self, Self::Builtin | Self::Module | Self::Function)
    }
}

pub struct Scope {
    pub id: ScopeId,
    pub kind: ScopeKind,
    pub parent: Option<ScopeId>,
    /// The node that introduced this scope (Module/ClassDef/FunctionDef/
    /// Lambda/comprehension display). `NONE` only for the synthetic
    /// Builtin scope.
    pub container_node: NodeIndex,
    symbols: FxHashMap<Atom, crate::ids::SymbolId>,
    order: Vec<crate::ids::SymbolId>,
    export_filter: Option<Vec<Atom>>,
}

impl Scope {
    #[must_use]
    pub fn new(id: ScopeId, kind: ScopeKind, parent: Option<ScopeId>, container_node: NodeIndex) -> Self {
        Self {
            id,
            kind,
            parent,
            container_node,
            symbols: FxHashMap::default(),
            order: Vec::new(),
            export_filter: None,
        }
    }

    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<crate::ids::SymbolId> {
        let id = self.symbols.get(name).copied()?;
        match &self.export_filter {
            Some(allowed) if !allowed.iter().any(|a| a.as_str() == name) => None,
            _ => Some(id),
        }
    }

    pub fn set_export_filter(&mut self, names: Vec<Atom>) {
        self.export_filter = Some(names);
    }

    #[must_use]
    pub fn declared_names(&self) -> impl Iterator<Item = &Atom> {
        self.symbols.keys()
    }

    #[must_use]
    pub fn symbol_order(&self) -> &[crate::ids::SymbolId] {
        &self.order
    }

    fn insert(&mut self, name: Atom, symbol: crate::ids::SymbolId) {
        self.symbols.insert(name, symbol);
        self.order.push(symbol);
    }
}

/// Owns every scope allocated while binding one module, plus symbol
/// insertion/lookup that needs both the scope tree and the symbol arena
/// (`add_symbol`, `lookup_recursive`).
pub struct ScopeArena {
    scopes: Vec<Scope>,
}

impl ScopeArena {
    #[must_use]
    pub fn new() -> Self {
        Self { scopes: Vec::new() }
    }

    pub fn new_scope(&mut self, kind: ScopeKind, parent: Option<ScopeId>, container_node: NodeIndex) -> ScopeId {
        let id = ScopeId::from_raw(u32::try_from(self.scopes.len()).expect("scope count overflow"));
        self.scopes.push(Scope::new(id, kind, parent, container_node));
        id
    }

    #[must_use]
    pub fn get(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.index()]
    }

    pub fn get_mut(&mut self, id: ScopeId) -> &mut Scope {
        &mut self.scopes[id.index()]
    }

    /// `add_symbol` (§4.1): inserts a fresh symbol, or returns the existing
    /// one if `name` is already declared in this scope — repeated bindings
    /// of the same name accumulate declarations on one symbol.
    pub fn add_symbol(
        &mut self,
        symbols: &mut SymbolArena,
        scope: ScopeId,
        name: &Atom,
        flags: SymbolFlags,
    ) -> crate::ids::SymbolId {
        if let Some(existing) = self.get(scope).lookup(name.as_str()) {
            return existing;
        }
        let id = symbols.alloc(name.clone(), flags);
        self.get_mut(scope).insert(name.clone(), id);
        id
    }

    #[must_use]
    pub fn lookup_recursive(&self, scope: ScopeId, name: &str) -> Option<(crate::ids::SymbolId, ScopeId)> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let s = self.get(id);
            if let Some(symbol) = s.lookup(name) {
                return Some((symbol, id));
            }
            current = s.parent;
        }
        None
    }

    /// `global_scope()` (§4.1): walk parents to the nearest Module/Builtin.
    #[must_use]
    pub fn global_scope(&self, scope: ScopeId) -> ScopeId {
        let mut current = scope;
        loop {
            let s = self.get(current);
            if matches!(s.kind, ScopeKind::Module | ScopeKind::Builtin) {
                return current;
            }
            current = s.parent.expect("non-module scope must have a parent");
        }
    }

    /// Nearest enclosing scope that `is_execution_scope()`, skipping Class
    /// and Comprehension scopes. Used by the assignment-expression target
    /// hoisting rule (§4.3 "AssignmentExpression").
    #[must_use]
    pub fn nearest_execution_scope(&self, scope: ScopeId) -> ScopeId {
        let mut current = scope;
        loop {
            let s = self.get(current);
            if s.kind.is_execution_scope() {
                return current;
            }
            current = s.parent.expect("comprehension/class scope must have a parent");
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }
}

impl Default for ScopeArena {
    fn default() -> Self {
        Self::new()
    }
}
