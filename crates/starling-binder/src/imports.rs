//! `import`/`from … import` binding (§4.2, §4.3 "Import"/"ImportFrom").

use starling_ast::{ImportAliasData, NodeArena, NodeIndex};
use starling_common::Atom;

use crate::ids::{ScopeId, SymbolId};
use crate::scope::ScopeArena;
use crate::symbol::{Declaration, ModuleLoaderActions, SymbolArena, SymbolFlags};

/// Binds one `import a.b.c` or `import a.b.c as x` alias (an `ImportAlias`
/// node under an `Import` statement).
///
/// Without an `as` clause, only the first dotted segment is bound in scope
/// (`import a.b.c` makes `a` resolvable, not `a.b.c`); the rest of the path
/// is recorded as `implicit_imports` so a later pass can materialize the
/// intermediate module symbols (§3 "ModuleLoaderActions").
pub fn bind_import_alias(
    ast: &NodeArena,
    scopes: &mut ScopeArena,
    symbols: &mut SymbolArena,
    scope: ScopeId,
    alias: NodeIndex,
) -> SymbolId {
    let ImportAliasData { dotted_name, asname } = ast.get_import_alias(alias).clone();
    let segments: Vec<Atom> = dotted_name
        .as_str()
        .split('.')
        .map(Atom::from)
        .collect();
    let bound_name = asname.clone().unwrap_or_else(|| segments[0].clone());

    let mut implicit_imports = ModuleLoaderActions::default();
    let (first_name_part, resolved_path, submodule_fallback) = if asname.is_some() {
        (segments[0].clone(), Some(dotted_name.as_str().to_string()), None)
    } else {
        implicit_imports.merge_dotted_path(&segments[1..], dotted_name.as_str());
        let fallback = segments.get(1).cloned();
        (segments[0].clone(), None, fallback)
    };

    let id = scopes.add_symbol(symbols, scope, &bound_name, SymbolFlags::INITIALLY_UNBOUND);
    symbols.get_mut(id).add_declaration(Declaration::Alias {
        node: alias,
        first_name_part,
        resolved_path,
        symbol_name: None,
        submodule_fallback,
        implicit_imports,
    });
    id
}

/// Binds one name in a `from module import name [as asname]` clause
/// (also an `ImportAlias` node, but under an `ImportFrom` statement — the
/// bound name refers to a symbol *within* `module`, not a submodule).
pub fn bind_import_from_alias(
    ast: &NodeArena,
    scopes: &mut ScopeArena,
    symbols: &mut SymbolArena,
    scope: ScopeId,
    alias: NodeIndex,
    module_path: Option<&str>,
) -> SymbolId {
    let ImportAliasData { dotted_name, asname } = ast.get_import_alias(alias).clone();
    let bound_name = asname.clone().unwrap_or_else(|| dotted_name.clone());
    let id = scopes.add_symbol(symbols, scope, &bound_name, SymbolFlags::INITIALLY_UNBOUND);
    symbols.get_mut(id).add_declaration(Declaration::Alias {
        node: alias,
        first_name_part: dotted_name.clone(),
        resolved_path: module_path.map(ToString::to_string),
        symbol_name: Some(dotted_name),
        submodule_fallback: None,
        implicit_imports: ModuleLoaderActions::default(),
    });
    id
}

/// Resolves the dotted module path a relative `from . import x` / `from
/// ..pkg import x` names, given the binding module's own dotted path and the
/// `level` (number of leading dots) recorded on the `ImportFrom` node.
#[must_use]
pub fn resolve_relative_module(current_module_path: &str, module: Option<&str>, level: u32) -> String {
    if level == 0 {
        return module.unwrap_or_default().to_string();
    }
    let mut segments: Vec<&str> = current_module_path.split('.').collect();
    for _ in 0..level {
        segments.pop();
    }
    let mut path = segments.join(".");
    if let Some(m) = module {
        if !path.is_empty() {
            path.push('.');
        }
        path.push_str(m);
    }
    path
}
