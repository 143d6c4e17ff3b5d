//! Symbols and the declarations attached to them (C2, §3 "Symbol"/"Declaration").

use starling_ast::NodeIndex;
use starling_common::{Atom, Span};

use crate::ids::SymbolId;

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct SymbolFlags: u16 {
        const INITIALLY_UNBOUND       = 1 << 0;
        const CLASS_MEMBER            = 1 << 1;
        const INSTANCE_MEMBER         = 1 << 2;
        const PRIVATE_MEMBER          = 1 << 3;
        const EXTERNALLY_HIDDEN       = 1 << 4;
        const IGNORED_FOR_PROTOCOL_MATCH = 1 << 5;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IntrinsicKind {
    Str,
    Any,
    IterableOfStr,
    Class,
}

/// A node matching the dotted name of an import; built for `import a.b.c`
/// so a later pass can materialize intermediate module symbols with the
/// correct bound path (§3 "ModuleLoaderActions").
#[derive(Clone, Debug, Default)]
pub struct ModuleLoaderActions {
    pub path: Option<String>,
    pub implicit_imports: rustc_hash::FxHashMap<Atom, ModuleLoaderActions>,
}

impl ModuleLoaderActions {
    /// Insert (or descend into) the child named by the first segment of
    /// `remaining`, creating intermediate nodes as needed, and recurse.
    pub fn merge_dotted_path(&mut self, segments: &[Atom], path: &str) {
        let Some((head, rest)) = segments.split_first() else {
            return;
        };
        let child = self.implicit_imports.entry(head.clone()).or_default();
        if rest.is_empty() {
            child.path = Some(path.to_string());
        } else {
            child.merge_dotted_path(rest, path);
        }
    }
}

#[derive(Clone, Debug)]
pub enum Declaration {
    Variable {
        node: NodeIndex,
        is_constant: bool,
        is_final: bool,
        type_annotation: NodeIndex,
        path: String,
        range: Span,
    },
    Parameter {
        node: NodeIndex,
        path: String,
        range: Span,
    },
    Function {
        node: NodeIndex,
        is_method: bool,
        is_generator: bool,
        return_expressions: Vec<NodeIndex>,
        yield_expressions: Vec<NodeIndex>,
        path: String,
        range: Span,
    },
    Class {
        node: NodeIndex,
        path: String,
        range: Span,
    },
    Intrinsic {
        name: Atom,
        intrinsic_kind: IntrinsicKind,
        path: String,
        range: Span,
    },
    Alias {
        node: NodeIndex,
        first_name_part: Atom,
        resolved_path: Option<String>,
        symbol_name: Option<Atom>,
        submodule_fallback: Option<Atom>,
        implicit_imports: ModuleLoaderActions,
    },
    SpecialBuiltInClass {
        node: NodeIndex,
        path: String,
        range: Span,
    },
}

impl Declaration {
    #[must_use]
    pub const fn node(&self) -> NodeIndex {
        match self {
            Self::Variable { node, .. }
            | Self::Parameter { node, .. }
            | Self::Function { node, .. }
            | Self::Class { node, .. }
            | Self::Alias { node, .. }
            | Self::SpecialBuiltInClass { node, .. } => *node,
            Self::Intrinsic { .. } => NodeIndex::NONE,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Symbol {
    pub id: SymbolId,
    pub name: Atom,
    pub flags: SymbolFlags,
    declarations: Vec<Declaration>,
}

impl Symbol {
    #[must_use]
    pub fn new(id: SymbolId, name: Atom, flags: SymbolFlags) -> Self {
        Self {
            id,
            name,
            flags,
            declarations: Vec::new(),
        }
    }

    /// Append a declaration, applying the dotted-alias merge rule (§4.2):
    /// an `Alias` declaration whose `first_name_part` matches an existing
    /// `Alias` extends that declaration's `implicit_imports` tree in place
    /// rather than appending a second declaration.
    pub fn add_declaration(&mut self, decl: Declaration) {
        if let Declaration::Alias {
            first_name_part,
            implicit_imports: ref new_imports,
            resolved_path: ref new_path,
            ..
        } = decl
        {
            for existing in &mut self.declarations {
                if let Declaration::Alias {
                    first_name_part: existing_first,
                    implicit_imports: existing_imports,
                    resolved_path: existing_path,
                    ..
                } = existing
                {
                    if *existing_first == first_name_part {
                        for (name, actions) in &new_imports.implicit_imports {
                            existing_imports
                                .implicit_imports
                                .entry(name.clone())
                                .or_insert_with(|| actions.clone());
                        }
                        if existing_path.is_none() {
                            *existing_path = new_path.clone();
                        }
                        return;
                    }
                }
            }
        }
        self.declarations.push(decl);
    }

    #[must_use]
    pub fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }

    pub fn declarations_mut(&mut self) -> &mut [Declaration] {
        &mut self.declarations
    }

    #[must_use]
    pub fn last_function_declaration_mut(&mut self) -> Option<&mut Declaration> {
        self.declarations
            .iter_mut()
            .rev()
            .find(|d| matches!(d, Declaration::Function { .. }))
    }
}

/// Owns every symbol allocated while binding one module.
///
/// `SymbolId`s are minted from a process-wide counter (§5 "unique-id
/// generator"), so they aren't dense per-arena indices; `by_id` maps the
/// global id back to its slot in `symbols`.
#[derive(Default)]
pub struct SymbolArena {
    symbols: Vec<Symbol>,
    by_id: rustc_hash::FxHashMap<SymbolId, usize>,
}

impl SymbolArena {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc(&mut self, name: Atom, flags: SymbolFlags) -> SymbolId {
        let id = SymbolId::from_raw(crate::ids::SYMBOL_IDS.next());
        let index = self.symbols.len();
        self.symbols.push(Symbol::new(id, name, flags));
        self.by_id.insert(id, index);
        id
    }

    #[must_use]
    pub fn get(&self, id: SymbolId) -> &Symbol {
        &self.symbols[self.by_id[&id]]
    }

    pub fn get_mut(&mut self, id: SymbolId) -> &mut Symbol {
        let index = self.by_id[&id];
        &mut self.symbols[index]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}
