//! Intrinsic symbols injected into module, class, and function scopes without
//! a corresponding syntax node (§4.1 "Intrinsic declarations").

use starling_common::{Atom, Span};

use crate::ids::ScopeId;
use crate::scope::ScopeArena;
use crate::symbol::{Declaration, IntrinsicKind, SymbolArena, SymbolFlags};

fn declare_intrinsic(
    scopes: &mut ScopeArena,
    symbols: &mut SymbolArena,
    scope: ScopeId,
    name: &Atom,
    kind: IntrinsicKind,
    path: &str,
) {
    let id = scopes.add_symbol(symbols, scope, name, SymbolFlags::empty());
    symbols.get_mut(id).add_declaration(Declaration::Intrinsic {
        name: name.clone(),
        intrinsic_kind: kind,
        path: path.to_string(),
        range: Span::dummy(),
    });
}

/// `__name__`, `__file__`, `__doc__`, `__package__`, `__builtins__` (§4.1).
pub fn inject_module_intrinsics(
    scopes: &mut ScopeArena,
    symbols: &mut SymbolArena,
    module_scope: ScopeId,
    module_path: &str,
) {
    declare_intrinsic(
        scopes,
        symbols,
        module_scope,
        &Atom::from("__name__"),
        IntrinsicKind::Str,
        module_path,
    );
    declare_intrinsic(
        scopes,
        symbols,
        module_scope,
        &Atom::from("__file__"),
        IntrinsicKind::Str,
        module_path,
    );
    declare_intrinsic(
        scopes,
        symbols,
        module_scope,
        &Atom::from("__doc__"),
        IntrinsicKind::Str,
        module_path,
    );
    declare_intrinsic(
        scopes,
        symbols,
        module_scope,
        &Atom::from("__package__"),
        IntrinsicKind::Str,
        module_path,
    );
    declare_intrinsic(
        scopes,
        symbols,
        module_scope,
        &Atom::from("__builtins__"),
        IntrinsicKind::Any,
        module_path,
    );
}

/// `__qualname__`/`__module__`/`__dict__` for a class body (gated on
/// `LanguageVersion::supports_qualname`, §3 glossary "Intrinsic").
pub fn inject_class_intrinsics(
    scopes: &mut ScopeArena,
    symbols: &mut SymbolArena,
    class_scope: ScopeId,
    module_path: &str,
    supports_qualname: bool,
) {
    if supports_qualname {
        declare_intrinsic(
            scopes,
            symbols,
            class_scope,
            &Atom::from("__qualname__"),
            IntrinsicKind::Str,
            module_path,
        );
    }
    declare_intrinsic(
        scopes,
        symbols,
        class_scope,
        &Atom::from("__module__"),
        IntrinsicKind::Str,
        module_path,
    );
}

/// Function-scope intrinsics (§4.3 "Function"): `__doc__`, `__name__`,
/// `__qualname__`, `__module__`, `__defaults__`, `__code__`, `__globals__`,
/// `__dict__`, `__closure__`, `__annotations__`, `__kwdefaults__`, and,
/// when `is_method` (the function is defined directly inside a class body),
/// `__class__`.
pub fn inject_function_intrinsics(
    scopes: &mut ScopeArena,
    symbols: &mut SymbolArena,
    function_scope: ScopeId,
    module_path: &str,
    is_method: bool,
) {
    for (name, kind) in [
        ("__doc__", IntrinsicKind::Str),
        ("__name__", IntrinsicKind::Str),
        ("__qualname__", IntrinsicKind::Str),
        ("__module__", IntrinsicKind::Str),
        ("__defaults__", IntrinsicKind::Any),
        ("__code__", IntrinsicKind::Any),
        ("__globals__", IntrinsicKind::Any),
        ("__dict__", IntrinsicKind::Any),
        ("__closure__", IntrinsicKind::Any),
        ("__annotations__", IntrinsicKind::Any),
        ("__kwdefaults__", IntrinsicKind::Any),
    ] {
        declare_intrinsic(scopes, symbols, function_scope, &Atom::from(name), kind, module_path);
    }
    if is_method {
        declare_intrinsic(
            scopes,
            symbols,
            function_scope,
            &Atom::from("__class__"),
            IntrinsicKind::Class,
            module_path,
        );
    }
}
