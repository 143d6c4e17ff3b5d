//! Binder for a Python-like language: scope tree, symbol table, and
//! intraprocedural control-flow-graph construction from a parsed module.
//!
//! This crate provides:
//! - [`bind_module`] — the single entry point, producing a [`BindOutput`]
//! - [`ScopeArena`]/[`SymbolArena`]/[`FlowNodeArena`] — the three owned
//!   arenas a bind pass fills in
//! - [`ImportLookup`] — the host hook used to resolve wildcard and
//!   unresolved-import diagnostics without this crate reading the filesystem

mod binder_state;
mod error;
mod flow;
mod ids;
mod import_lookup;
mod imports;
mod intrinsics;
mod member_access;
mod not_local;
mod options;
mod rules;
mod scope;
mod side_tables;
mod symbol;
mod walk;

pub use binder_state::{BinderState, DeferredBody};
pub use error::{BinderError, BinderResult};
pub use flow::{FlowNode, FlowNodeArena};
pub use ids::{FlowNodeId, ScopeId, SymbolId};
pub use import_lookup::{ImportLookup, ImportedModule};
pub use imports::{bind_import_alias, bind_import_from_alias, resolve_relative_module};
pub use not_local::{NotLocalBindings, NotLocalKind};
pub use options::{BinderOptions, FileInfo};
pub use rules::{DiagnosticSettings, UNRESOLVED_IMPORT};
pub use scope::{Scope, ScopeArena, ScopeKind};
pub use side_tables::SideTables;
pub use symbol::{
    Declaration, IntrinsicKind, ModuleLoaderActions, Symbol, SymbolArena, SymbolFlags,
};
pub use walk::{bind_module, BindOutput};
