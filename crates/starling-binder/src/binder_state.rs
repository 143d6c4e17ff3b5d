//! `BinderState`: the single mutable context threaded through one module's
//! bind pass, and the scope-entry/exit protocol (§4.3 "Scope creation
//! protocol").

use std::collections::VecDeque;

use starling_ast::{NodeArena, NodeIndex};
use starling_common::{Atom, DiagnosticSink, Interner};

use crate::flow::FlowNodeArena;
use crate::ids::{FlowNodeId, ScopeId, SymbolId};
use crate::import_lookup::ImportLookup;
use crate::not_local::NotLocalBindings;
use crate::options::{BinderOptions, FileInfo};
use crate::rules::DiagnosticSettings;
use crate::scope::{ScopeArena, ScopeKind};
use crate::side_tables::SideTables;
use crate::symbol::SymbolArena;

/// One function or lambda body whose walk was deferred until after its
/// enclosing scope finished (§4.3 "Deferred function binding", P2): the
/// walker enqueues these in encounter order and drains the queue breadth
/// first once the top-level module walk completes, so a nested function
/// defined inside another deferred function still binds after every
/// sibling at the outer level.
pub struct DeferredBody {
    pub target: NodeIndex,
    pub scope: ScopeId,
    pub function_symbol: Option<SymbolId>,
    pub is_lambda: bool,
    pub is_async: bool,
}

pub struct BinderState<'a> {
    pub ast: &'a NodeArena,
    pub scopes: ScopeArena,
    pub symbols: SymbolArena,
    pub flow: FlowNodeArena,
    pub side_tables: SideTables,
    pub interner: Interner,
    pub options: BinderOptions,
    pub file_info: &'a FileInfo,
    pub diagnostics: &'a mut dyn DiagnosticSink,
    pub diagnostic_settings: DiagnosticSettings,
    pub import_lookup: Option<&'a dyn ImportLookup>,

    pub current_scope: ScopeId,
    pub current_flow: FlowNodeId,
    pub not_local: NotLocalBindings,
    /// Node of the nearest enclosing execution scope, used to key
    /// `SideTables::add_code_flow_reference` (§3 "code flow expression map").
    pub ref_map_scope: NodeIndex,

    pub break_target: Option<FlowNodeId>,
    pub continue_target: Option<FlowNodeId>,
    /// Ambient true/false labels installed by `bind_conditional` for the
    /// duration of walking one test expression; consumed (via `take`) by
    /// `walk_expr` on entry so a `BoolOp` or `not` can recurse into its
    /// operands with adjusted targets without leaking them into unrelated
    /// subexpressions (§4.3 "BoolOp"/"UnaryOp", §4.4 "Conditional binding").
    pub true_target: Option<FlowNodeId>,
    pub false_target: Option<FlowNodeId>,
    /// Label collecting every `return`'s flow state inside the function
    /// currently being bound, merged with end-of-suite flow into the
    /// function's `after_flow_node` (§4.3 "Function" deferred body walk).
    pub return_target: Option<FlowNodeId>,
    /// The `Declaration::Function` symbol currently being bound, so
    /// `return`/`yield` statements can append to its expression lists.
    pub current_function_symbol: Option<SymbolId>,
    /// True while walking a function or lambda body (including nested
    /// blocks inside it), used to diagnose `yield`/`await` at module or
    /// class scope (§4.6).
    pub in_function_body: bool,
    /// True while walking the body of an `async def` function, used to
    /// diagnose `await` outside an async function and `yield from` inside
    /// one (§4.3 "Yield/YieldFrom", "Await").
    pub in_async_function: bool,
    /// Depth of enclosing `except` handler bodies, used to diagnose a bare
    /// `raise` with no arguments outside any handler (§4.6).
    pub except_depth: u32,

    pub deferred: VecDeque<DeferredBody>,
    pub module_path: String,
    pub builtin_scope: ScopeId,
}

impl<'a> BinderState<'a> {
    /// Enter a new scope, run `body`, then restore the previous scope /
    /// `global`/`nonlocal` bookkeeping / code-flow-reference key — on every
    /// exit path, including one where `body` returns an `Err` that the
    /// caller later propagates with `?`.
    pub fn with_new_scope<R>(
        &mut self,
        kind: ScopeKind,
        container: NodeIndex,
        body: impl FnOnce(&mut Self) -> R,
    ) -> R {
        let saved_scope = self.current_scope;
        let saved_not_local = std::mem::take(&mut self.not_local);
        let saved_ref_scope = self.ref_map_scope;

        let parent = if matches!(kind, ScopeKind::Builtin | ScopeKind::Module) {
            None
        } else {
            Some(saved_scope)
        };
        let new_scope = self.scopes.new_scope(kind, parent, container);
        self.side_tables.set_scope(container, new_scope);
        if kind.is_execution_scope() {
            self.ref_map_scope = container;
        }
        self.current_scope = new_scope;

        let result = body(self);

        self.current_scope = saved_scope;
        self.not_local = saved_not_local;
        self.ref_map_scope = saved_ref_scope;
        result
    }

    pub fn intern(&mut self, s: &str) -> Atom {
        self.interner.intern(s)
    }

    /// Record that `node` observed the binder's current flow state — the
    /// "code flow expression map" consulted by downstream narrowing passes
    /// (§3).
    pub fn record_reference(&mut self, key: String) {
        let scope_node = self.ref_map_scope;
        self.side_tables.add_code_flow_reference(scope_node, key);
    }

    pub fn enqueue_deferred(&mut self, body: DeferredBody) {
        self.deferred.push_back(body);
    }
}
