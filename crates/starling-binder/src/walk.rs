//! The pre-order tree walker: statement and expression dispatch, the
//! finally-gate CFG construction (§4.4), and the module entry point
//! (§4.3, §4.6).

use std::collections::VecDeque;

use starling_ast::{NodeArena, NodeIndex, NodeList, SyntaxKind};
use starling_common::{Atom, DiagnosticSink, Interner, Severity};

use crate::binder_state::{BinderState, DeferredBody};
use crate::flow::FlowNodeArena;
use crate::ids::{FlowNodeId, ScopeId};
use crate::import_lookup::ImportLookup;
use crate::imports::{bind_import_alias, bind_import_from_alias, resolve_relative_module};
use crate::intrinsics::{inject_class_intrinsics, inject_function_intrinsics, inject_module_intrinsics};
use crate::member_access::{classify, first_parameter_name, MemberAccessKind};
use crate::not_local::{NotLocalBindings, NotLocalKind};
use crate::options::{BinderOptions, FileInfo};
use crate::rules::{self, DiagnosticSettings};
use crate::scope::{ScopeArena, ScopeKind};
use crate::side_tables::SideTables;
use crate::symbol::{Declaration, SymbolArena, SymbolFlags};

/// Result of binding one module: every arena an annotation pass needs.
pub struct BindOutput {
    pub scopes: ScopeArena,
    pub symbols: SymbolArena,
    pub flow: FlowNodeArena,
    pub side_tables: SideTables,
    pub module_scope: ScopeId,
    pub builtin_scope: ScopeId,
}

enum Exit {
    Break,
    Continue,
}

/// Bind a module's top-level body: builtin + module scope setup, intrinsic
/// injection, `__all__` export-filter detection, the top-level walk, and
/// the deferred function/lambda body drain (P2).
#[allow(clippy::too_many_arguments)]
pub fn bind_module(
    ast: &NodeArena,
    module: NodeIndex,
    module_path: &str,
    options: BinderOptions,
    file_info: &FileInfo,
    diagnostics: &mut dyn DiagnosticSink,
    import_lookup: Option<&dyn ImportLookup>,
) -> BindOutput {
    let mut scopes = ScopeArena::new();
    let mut symbols = SymbolArena::new();
    let flow = FlowNodeArena::new();
    let builtin_scope = scopes.new_scope(ScopeKind::Builtin, None, NodeIndex::NONE);

    let mut state = BinderState {
        ast,
        scopes,
        symbols,
        flow,
        side_tables: SideTables::new(),
        interner: Interner::new(),
        options,
        file_info,
        diagnostics,
        diagnostic_settings: DiagnosticSettings::new(),
        import_lookup,
        current_scope: builtin_scope,
        current_flow: FlowNodeId::from_raw(0),
        not_local: NotLocalBindings::new(),
        ref_map_scope: module,
        break_target: None,
        continue_target: None,
        true_target: None,
        false_target: None,
        return_target: None,
        current_function_symbol: None,
        in_function_body: false,
        in_async_function: false,
        except_depth: 0,
        deferred: VecDeque::new(),
        module_path: module_path.to_string(),
        builtin_scope,
    };

    let module_scope = state.with_new_scope(ScopeKind::Module, module, |state| {
        inject_module_intrinsics(
            &mut state.scopes,
            &mut state.symbols,
            state.current_scope,
            module_path,
        );
        let start = state.flow.create_start();
        state.current_flow = start;

        let body = state.ast.get_module(module).body.clone();
        detect_export_filter(state, &body);
        walk_statements(state, &body);
        state.current_scope
    });

    drain_deferred(&mut state);

    BindOutput {
        scopes: state.scopes,
        symbols: state.symbols,
        flow: state.flow,
        side_tables: state.side_tables,
        module_scope,
        builtin_scope: state.builtin_scope,
    }
}

/// `__all__ = [...]` at module scope restricts what `from module import *`
/// sees (§4.1 "export filter").
fn detect_export_filter(state: &mut BinderState<'_>, body: &NodeList) {
    for stmt in body {
        if state.ast.kind_of(stmt) != SyntaxKind::Assign {
            continue;
        }
        let assign = state.ast.get_assign(stmt).clone();
        if assign.targets.len() != 1 {
            continue;
        }
        let Some(target) = assign.targets.get(0) else {
            continue;
        };
        if state.ast.kind_of(target) != SyntaxKind::Name || state.ast.get_name(target).id.as_str() != "__all__" {
            continue;
        }
        if state.ast.kind_of(assign.value) != SyntaxKind::Sequence {
            continue;
        }
        let mut names = Vec::new();
        for element in &state.ast.get_sequence(assign.value).elements {
            if state.ast.kind_of(element) == SyntaxKind::Constant {
                if let starling_ast::ConstantValue::Str(s) = &state.ast.get_constant(element).value {
                    names.push(s.clone());
                }
            }
        }
        state.scopes.get_mut(state.current_scope).set_export_filter(names);
    }
}

fn drain_deferred(state: &mut BinderState<'_>) {
    while let Some(entry) = state.deferred.pop_front() {
        bind_deferred_body(state, entry);
    }
}

fn bind_deferred_body(state: &mut BinderState<'_>, entry: DeferredBody) {
    let DeferredBody {
        target,
        scope,
        function_symbol,
        is_lambda,
        is_async,
    } = entry;

    let saved_scope = state.current_scope;
    let saved_flow = state.current_flow;
    let saved_break = state.break_target.take();
    let saved_continue = state.continue_target.take();
    let saved_return = state.return_target.take();
    let saved_function = state.current_function_symbol;
    let saved_not_local = std::mem::take(&mut state.not_local);
    let saved_ref_scope = state.ref_map_scope;
    let saved_in_function_body = state.in_function_body;
    let saved_except_depth = state.except_depth;
    let saved_in_async_function = state.in_async_function;

    state.current_scope = scope;
    state.ref_map_scope = target;
    state.current_function_symbol = function_symbol;
    state.in_function_body = true;
    state.in_async_function = is_async;
    state.except_depth = 0;
    let start = state.flow.create_start();
    state.current_flow = start;

    if is_lambda {
        let body = state.ast.get_lambda(target).body;
        bind_parameters(state, target, false);
        walk_expr(state, body);
    } else {
        let data = state.ast.get_function(target).clone();
        bind_parameters(state, target, true);
        let return_label = state.flow.create_branch_label();
        state.return_target = Some(return_label);
        walk_statements(state, &data.body);
        state.flow.add_antecedent(return_label, state.current_flow);
        let after_flow = state.flow.finish(return_label);
        state.side_tables.set_after_flow_node(target, after_flow);
    }

    state.current_scope = saved_scope;
    state.current_flow = saved_flow;
    state.break_target = saved_break;
    state.continue_target = saved_continue;
    state.return_target = saved_return;
    state.current_function_symbol = saved_function;
    state.not_local = saved_not_local;
    state.ref_map_scope = saved_ref_scope;
    state.in_function_body = saved_in_function_body;
    state.except_depth = saved_except_depth;
    state.in_async_function = saved_in_async_function;
}

fn bind_parameters(state: &mut BinderState<'_>, function_or_lambda: NodeIndex, is_function: bool) {
    let parameters = if is_function {
        state.ast.get_function(function_or_lambda).parameters.clone()
    } else {
        state.ast.get_lambda(function_or_lambda).parameters.clone()
    };
    for param in &parameters {
        if state.ast.kind_of(param) != SyntaxKind::Parameter {
            continue;
        }
        let name = state.ast.get_parameter(param).name.clone();
        let id = state
            .scopes
            .add_symbol(&mut state.symbols, state.current_scope, &name, SymbolFlags::empty());
        state.symbols.get_mut(id).add_declaration(Declaration::Parameter {
            node: param,
            path: format!("{}.{}", state.module_path, name),
            range: state.ast.span_of(param),
        });
        state.side_tables.set_declaration_symbol(param, id);
        if let Some(default) = non_none(state.ast.get_parameter(param).default) {
            walk_expr(state, default);
        }
    }
}

fn non_none(index: NodeIndex) -> Option<NodeIndex> {
    index.is_some().then_some(index)
}

// ---------------------------------------------------------------------
// Statements
// ---------------------------------------------------------------------

/// Walk a suite, marking the first run of statements reached with
/// `current_flow == Unreachable` as dead code (once per suite, §4.6). The
/// statements are still walked so their declarations and nested
/// `yield`/`yield from` nodes are recorded regardless of reachability.
fn walk_statements(state: &mut BinderState<'_>, stmts: &NodeList) {
    let mut dead_span: Option<starling_common::Span> = None;
    for stmt in stmts {
        if state.current_flow == state.flow.unreachable {
            let span = state.ast.span_of(stmt);
            dead_span = Some(dead_span.map_or(span, |s| s.merge(span)));
        }
        walk_statement(state, stmt);
    }
    if let Some(span) = dead_span {
        state.diagnostics.add_unused_code(span, "unreachable code");
    }
}

fn walk_statement(state: &mut BinderState<'_>, stmt: NodeIndex) {
    state.side_tables.set_flow_node(stmt, state.current_flow);
    match state.ast.kind_of(stmt) {
        SyntaxKind::Pass => {}
        SyntaxKind::Break => bind_exit(state, Exit::Break, stmt),
        SyntaxKind::Continue => bind_exit(state, Exit::Continue, stmt),
        SyntaxKind::Return => bind_return(state, stmt),
        SyntaxKind::Raise => bind_raise(state, stmt),
        SyntaxKind::Assert => bind_assert(state, stmt),
        SyntaxKind::Global => bind_global(state, stmt),
        SyntaxKind::Nonlocal => bind_nonlocal(state, stmt),
        SyntaxKind::Import => bind_import(state, stmt),
        SyntaxKind::ImportFrom => bind_import_from(state, stmt),
        SyntaxKind::ExpressionStatement => {
            let value = state.ast.get_expression_statement(stmt).value;
            walk_expr(state, value);
        }
        SyntaxKind::Assign => bind_assign(state, stmt),
        SyntaxKind::AugAssign => bind_aug_assign(state, stmt),
        SyntaxKind::AnnAssign => bind_ann_assign(state, stmt),
        SyntaxKind::Delete => bind_delete(state, stmt),
        SyntaxKind::If => bind_if(state, stmt),
        SyntaxKind::While => bind_while(state, stmt),
        SyntaxKind::For => bind_for(state, stmt),
        SyntaxKind::Try => bind_try(state, stmt),
        SyntaxKind::With => bind_with(state, stmt),
        SyntaxKind::FunctionDef => bind_function_def(state, stmt),
        SyntaxKind::ClassDef => bind_class_def(state, stmt),
        _ => {}
    }
}

fn bind_exit(state: &mut BinderState<'_>, exit: Exit, node: NodeIndex) {
    let target = match exit {
        Exit::Break => state.break_target,
        Exit::Continue => state.continue_target,
    };
    match target {
        Some(t) => state.flow.add_antecedent(t, state.current_flow),
        None => {
            let kind = match exit {
                Exit::Break => "break",
                Exit::Continue => "continue",
            };
            state.diagnostics.add_error(
                state.ast.span_of(node),
                format!("'{kind}' outside loop"),
            );
        }
    }
    state.current_flow = state.flow.unreachable;
}

fn bind_return(state: &mut BinderState<'_>, stmt: NodeIndex) {
    let value = state.ast.get_return(stmt).value;
    if non_none(value).is_some() {
        walk_expr(state, value);
    }
    if let Some(symbol) = state.current_function_symbol {
        if let Some(Declaration::Function { return_expressions, .. }) =
            state.symbols.get_mut(symbol).last_function_declaration_mut()
        {
            return_expressions.push(stmt);
        }
    } else {
        state
            .diagnostics
            .add_error(state.ast.span_of(stmt), "'return' outside function");
    }
    if let Some(return_target) = state.return_target {
        state.flow.add_antecedent(return_target, state.current_flow);
    }
    state.current_flow = state.flow.unreachable;
}

fn bind_raise(state: &mut BinderState<'_>, stmt: NodeIndex) {
    let data = state.ast.get_raise(stmt).clone();
    if non_none(data.exc).is_some() {
        walk_expr(state, data.exc);
    } else if state.except_depth == 0 {
        state
            .diagnostics
            .add_error(state.ast.span_of(stmt), "bare 'raise' outside an 'except' clause");
    }
    if non_none(data.cause).is_some() {
        walk_expr(state, data.cause);
    }
    state.current_flow = state.flow.unreachable;
}

fn bind_assert(state: &mut BinderState<'_>, stmt: NodeIndex) {
    let data = state.ast.get_assert(stmt).clone();
    let true_label = state.flow.create_branch_label();
    let false_label = state.flow.create_branch_label();
    bind_conditional(state, data.test, true_label, false_label);

    if non_none(data.message).is_some() {
        state.current_flow = state.flow.finish(false_label);
        walk_expr(state, data.message);
    }
    state.current_flow = state.flow.finish(true_label);
}

fn bind_global(state: &mut BinderState<'_>, stmt: NodeIndex) {
    for name in state.ast.get_global(stmt).names.clone() {
        if state.not_local.was_assigned(name.as_str()) {
            state.diagnostics.add_error(
                state.ast.span_of(stmt),
                format!("name '{name}' is assigned to before global declaration"),
            );
        }
        state.not_local.declare(name, NotLocalKind::Global);
    }
}

fn bind_nonlocal(state: &mut BinderState<'_>, stmt: NodeIndex) {
    let at_module_scope = matches!(state.scopes.get(state.current_scope).kind, ScopeKind::Module);
    if at_module_scope {
        state.diagnostics.add_error(
            state.ast.span_of(stmt),
            "Nonlocal declaration not allowed at module level",
        );
    }
    for name in state.ast.get_nonlocal(stmt).names.clone() {
        if state.not_local.was_assigned(name.as_str()) {
            state.diagnostics.add_error(
                state.ast.span_of(stmt),
                format!("name '{name}' is assigned to before nonlocal declaration"),
            );
        }
        if !at_module_scope && !enclosing_nonlocal_binding_exists(state, name.as_str()) {
            state.diagnostics.add_error(
                state.ast.span_of(stmt),
                format!("no binding for nonlocal '{name}' found in an enclosing scope"),
            );
        }
        state.not_local.declare(name, NotLocalKind::Nonlocal);
    }
}

/// Walks enclosing scopes (skipping Class/Comprehension, which can't hold a
/// `nonlocal` target) looking for a prior declaration of `name` in some
/// enclosing Function scope. Stops at the first Module/Builtin scope
/// reached, since `nonlocal` may never bind to global scope (§4.3
/// "Nonlocal").
fn enclosing_nonlocal_binding_exists(state: &BinderState<'_>, name: &str) -> bool {
    let mut scope = state.scopes.get(state.current_scope).parent;
    while let Some(id) = scope {
        let s = state.scopes.get(id);
        if matches!(s.kind, ScopeKind::Module | ScopeKind::Builtin) {
            return false;
        }
        if matches!(s.kind, ScopeKind::Function) && s.lookup(name).is_some() {
            return true;
        }
        scope = s.parent;
    }
    false
}

fn bind_import(state: &mut BinderState<'_>, stmt: NodeIndex) {
    let names = state.ast.get_import(stmt).names.clone();
    for alias in &names {
        let id = bind_import_alias(state.ast, &mut state.scopes, &mut state.symbols, state.current_scope, alias);
        state.side_tables.set_declaration_symbol(alias, id);
        let assignment = state.flow.create_assignment(alias, state.current_flow, id, false);
        state.current_flow = assignment;
    }
}

fn bind_import_from(state: &mut BinderState<'_>, stmt: NodeIndex) {
    let data = state.ast.get_import_from(stmt).clone();
    let resolved_module = resolve_relative_module(
        &state.module_path,
        data.module.as_ref().map(Atom::as_str),
        data.level,
    );

    if data.is_wildcard {
        if !matches!(state.scopes.get(state.current_scope).kind, ScopeKind::Module) {
            state.diagnostics.add_error(
                state.ast.span_of(stmt),
                "wildcard import is only allowed at module scope",
            );
        }
        let names = state
            .import_lookup
            .and_then(|lookup| lookup.lookup(&resolved_module))
            .map(|module| module.wildcard_names())
            .unwrap_or_default();
        if names.is_empty() {
            state.diagnostics.add_diagnostic(
                Severity::Warning,
                rules::UNRESOLVED_IMPORT,
                state.ast.span_of(stmt),
                format!("could not resolve wildcard import from '{resolved_module}'"),
            );
        }
        for name in &names {
            state
                .scopes
                .add_symbol(&mut state.symbols, state.current_scope, name, SymbolFlags::INITIALLY_UNBOUND);
        }
        let import_flow = state
            .flow
            .create_wildcard_import(stmt, names, state.current_flow);
        state.current_flow = import_flow;
        return;
    }

    if state.import_lookup.and_then(|l| l.lookup(&resolved_module)).is_none() {
        state.diagnostics.add_diagnostic(
            Severity::Warning,
            rules::UNRESOLVED_IMPORT,
            state.ast.span_of(stmt),
            format!("unresolved import '{resolved_module}'"),
        );
    }

    for alias in &data.names {
        let id = bind_import_from_alias(
            state.ast,
            &mut state.scopes,
            &mut state.symbols,
            state.current_scope,
            alias,
            Some(&resolved_module),
        );
        state.side_tables.set_declaration_symbol(alias, id);
        let assignment = state.flow.create_assignment(alias, state.current_flow, id, false);
        state.current_flow = assignment;
    }
}

fn bind_assign(state: &mut BinderState<'_>, stmt: NodeIndex) {
    let data = state.ast.get_assign(stmt).clone();
    walk_expr(state, data.value);
    for target in &data.targets {
        bind_target(state, target, stmt);
    }
}

fn bind_aug_assign(state: &mut BinderState<'_>, stmt: NodeIndex) {
    let data = state.ast.get_aug_assign(stmt).clone();
    walk_expr(state, data.target);
    walk_expr(state, data.value);
    bind_target(state, data.target, stmt);
}

fn bind_ann_assign(state: &mut BinderState<'_>, stmt: NodeIndex) {
    let data = state.ast.get_ann_assign(stmt).clone();
    walk_expr(state, data.annotation);
    let is_final = is_final_annotation(state.ast, data.annotation);
    if non_none(data.value).is_some() {
        walk_expr(state, data.value);
    }
    if state.ast.kind_of(data.target) == SyntaxKind::Name && state.not_local.get(state.ast.get_name(data.target).id.as_str()).is_none() {
        let flags = if non_none(data.value).is_some() {
            SymbolFlags::empty()
        } else {
            SymbolFlags::INITIALLY_UNBOUND
        };
        let name = state.ast.get_name(data.target).id.clone();
        if non_none(data.value).is_some() {
            state.not_local.mark_assigned(name.clone());
        }
        let id = state.scopes.add_symbol(&mut state.symbols, state.current_scope, &name, flags);
        state.symbols.get_mut(id).add_declaration(Declaration::Variable {
            node: data.target,
            is_constant: false,
            is_final,
            type_annotation: data.annotation,
            path: format!("{}.{}", state.module_path, name),
            range: state.ast.span_of(stmt),
        });
        state.side_tables.set_declaration_symbol(data.target, id);
        if non_none(data.value).is_some() {
            let assignment = state.flow.create_assignment(data.target, state.current_flow, id, false);
            state.current_flow = assignment;
        }
    } else if non_none(data.value).is_some() {
        bind_target(state, data.target, stmt);
    } else {
        walk_expr(state, data.target);
    }
}

/// Recognizes the `Final` idiom: a bare `Final` name, a `typing.Final`
/// member access, or either of those subscripted as `Final[T]` (§4.3
/// "TypeAnnotation as statement").
fn is_final_annotation(ast: &NodeArena, annotation: NodeIndex) -> bool {
    let annotation = match ast.kind_of(annotation) {
        SyntaxKind::Subscript => ast.get_subscript(annotation).value,
        _ => annotation,
    };
    match ast.kind_of(annotation) {
        SyntaxKind::Name => ast.get_name(annotation).id.as_str() == "Final",
        SyntaxKind::Attribute => ast.get_attribute(annotation).attr.as_str() == "Final",
        _ => false,
    }
}

fn bind_delete(state: &mut BinderState<'_>, stmt: NodeIndex) {
    let targets = state.ast.get_delete(stmt).targets.clone();
    for target in &targets {
        walk_expr(state, target);
        if state.ast.kind_of(target) == SyntaxKind::Name {
            let name = state.ast.get_name(target).id.clone();
            if let Some((symbol, _)) = state.scopes.lookup_recursive(state.current_scope, name.as_str()) {
                let assignment = state.flow.create_assignment(target, state.current_flow, symbol, true);
                state.current_flow = assignment;
            }
        }
    }
}

/// Binds an assignment target expression: `Name` creates an `Assignment`
/// flow node over the resolved/declared symbol; `Attribute`/`Subscript`
/// targets are evaluated as plain expressions (no new symbol, possibly a
/// member declaration — §4.5); `Sequence`/`Starred` recurse per element.
fn bind_target(state: &mut BinderState<'_>, target: NodeIndex, origin: NodeIndex) {
    match state.ast.kind_of(target) {
        SyntaxKind::Name => {
            let name = state.ast.get_name(target).id.clone();
            if let Some(kind) = state.not_local.get(name.as_str()) {
                let scope = match kind {
                    NotLocalKind::Global => state.scopes.global_scope(state.current_scope),
                    NotLocalKind::Nonlocal => {
                        let parent = state.scopes.get(state.current_scope).parent;
                        match parent {
                            Some(p) => state.scopes.nearest_execution_scope(p),
                            None => state.current_scope,
                        }
                    }
                };
                let id = state
                    .scopes
                    .add_symbol(&mut state.symbols, scope, &name, SymbolFlags::empty());
                let assignment = state.flow.create_assignment(target, state.current_flow, id, false);
                state.current_flow = assignment;
                state.side_tables.set_declaration_symbol(target, id);
                return;
            }
            state.not_local.mark_assigned(name.clone());
            let id = state
                .scopes
                .add_symbol(&mut state.symbols, state.current_scope, &name, SymbolFlags::empty());
            state.symbols.get_mut(id).add_declaration(Declaration::Variable {
                node: target,
                is_constant: false,
                is_final: false,
                type_annotation: NodeIndex::NONE,
                path: format!("{}.{}", state.module_path, name),
                range: state.ast.span_of(origin),
            });
            state.side_tables.set_declaration_symbol(target, id);
            let assignment = state.flow.create_assignment(target, state.current_flow, id, false);
            state.current_flow = assignment;
        }
        SyntaxKind::Attribute => {
            bind_member_access_target(state, target);
            let call = state.flow.create_call(target, state.current_flow);
            state.current_flow = call;
        }
        SyntaxKind::Subscript => {
            let data = state.ast.get_subscript(target).clone();
            walk_expr(state, data.value);
            walk_expr(state, data.slice);
            let call = state.flow.create_call(target, state.current_flow);
            state.current_flow = call;
        }
        SyntaxKind::Sequence => {
            let elements = state.ast.get_sequence(target).elements.clone();
            for element in &elements {
                bind_target(state, element, origin);
            }
        }
        SyntaxKind::Starred => {
            let inner = state.ast.get_starred(target).value;
            bind_target(state, inner, origin);
        }
        _ => walk_expr(state, target),
    }
}

/// §4.5: if the attribute's receiver is the enclosing method's first
/// parameter, record an instance/class member declaration on the
/// attribute's name symbol in the enclosing class scope.
fn bind_member_access_target(state: &mut BinderState<'_>, attribute: NodeIndex) {
    state.side_tables.set_flow_node(attribute, state.current_flow);
    let data = state.ast.get_attribute(attribute).clone();
    walk_expr(state, data.value);

    let Some(class_scope) = enclosing_class_scope(state) else {
        return;
    };
    let Some(function_node) = enclosing_function_node(state) else {
        return;
    };
    let receiver = first_parameter_name(state.ast, function_node);
    let is_staticmethod = has_decorator_named(state.ast, function_node, "staticmethod");
    let is_classmethod = has_decorator_named(state.ast, function_node, "classmethod");
    let is_new = state.ast.get_function(function_node).name.as_str() == "__new__";
    let class_name = state.ast.get_class(state.scopes.get(class_scope).container_node).name.clone();
    match classify(
        state.ast,
        attribute,
        &class_name,
        receiver.as_ref(),
        is_staticmethod,
        is_classmethod,
        is_new,
    ) {
        MemberAccessKind::Instance => {
            let id = state.scopes.add_symbol(
                &mut state.symbols,
                class_scope,
                &data.attr,
                SymbolFlags::INSTANCE_MEMBER,
            );
            state.symbols.get_mut(id).flags |= SymbolFlags::INSTANCE_MEMBER;
            state.side_tables.set_declaration_symbol(attribute, id);
        }
        MemberAccessKind::Class => {
            let id = state.scopes.add_symbol(
                &mut state.symbols,
                class_scope,
                &data.attr,
                SymbolFlags::CLASS_MEMBER,
            );
            state.symbols.get_mut(id).flags |= SymbolFlags::CLASS_MEMBER;
            state.side_tables.set_declaration_symbol(attribute, id);
        }
        MemberAccessKind::None => {}
    }
}

fn enclosing_class_scope(state: &BinderState<'_>) -> Option<ScopeId> {
    let mut scope = state.current_scope;
    loop {
        let s = state.scopes.get(scope);
        if matches!(s.kind, ScopeKind::Class) {
            return Some(scope);
        }
        scope = s.parent?;
    }
}

fn enclosing_function_node(state: &BinderState<'_>) -> Option<NodeIndex> {
    let mut scope = state.current_scope;
    loop {
        let s = state.scopes.get(scope);
        if matches!(s.kind, ScopeKind::Function) && state.ast.kind_of(s.container_node) == SyntaxKind::FunctionDef {
            return Some(s.container_node);
        }
        scope = s.parent?;
    }
}

fn has_decorator_named(ast: &NodeArena, function: NodeIndex, name: &str) -> bool {
    ast.get_function(function).decorators.iter().any(|d| {
        let kind = ast.kind_of(d);
        if kind == SyntaxKind::Name {
            ast.get_name(d).id.as_str() == name
        } else if kind == SyntaxKind::Attribute {
            ast.get_attribute(d).attr.as_str() == name
        } else {
            false
        }
    })
}

fn bind_if(state: &mut BinderState<'_>, stmt: NodeIndex) {
    let data = state.ast.get_if(stmt).clone();
    let true_label = state.flow.create_branch_label();
    let false_label = state.flow.create_branch_label();
    bind_conditional(state, data.test, true_label, false_label);

    state.current_flow = state.flow.finish(true_label);
    walk_statements(state, &data.body);
    let then_end = state.current_flow;

    state.current_flow = state.flow.finish(false_label);
    walk_statements(state, &data.orelse);
    let else_end = state.current_flow;

    let join = state.flow.create_branch_label();
    state.flow.add_antecedent(join, then_end);
    state.flow.add_antecedent(join, else_end);
    state.current_flow = state.flow.finish(join);
}

fn bind_while(state: &mut BinderState<'_>, stmt: NodeIndex) {
    let data = state.ast.get_while(stmt).clone();
    let loop_label = state.flow.create_loop_label();
    state.flow.add_antecedent(loop_label, state.current_flow);
    state.current_flow = loop_label;

    let true_label = state.flow.create_branch_label();
    let false_label = state.flow.create_branch_label();
    bind_conditional(state, data.test, true_label, false_label);
    let true_flow = state.flow.finish(true_label);
    let false_flow = state.flow.finish(false_label);

    let after_loop = state.flow.create_branch_label();
    let saved_break = state.break_target.replace(after_loop);
    let saved_continue = state.continue_target.replace(loop_label);

    state.current_flow = true_flow;
    walk_statements(state, &data.body);
    state.flow.add_antecedent(loop_label, state.current_flow);

    state.break_target = saved_break;
    state.continue_target = saved_continue;

    state.current_flow = false_flow;
    walk_statements(state, &data.orelse);
    state.flow.add_antecedent(after_loop, state.current_flow);

    state.current_flow = state.flow.finish(after_loop);
}

fn bind_for(state: &mut BinderState<'_>, stmt: NodeIndex) {
    let data = state.ast.get_for(stmt).clone();
    walk_expr(state, data.iter);

    let loop_label = state.flow.create_loop_label();
    state.flow.add_antecedent(loop_label, state.current_flow);
    state.current_flow = loop_label;
    bind_target(state, data.target, stmt);

    let after_loop = state.flow.create_branch_label();
    state.flow.add_antecedent(after_loop, loop_label);

    let saved_break = state.break_target.replace(after_loop);
    let saved_continue = state.continue_target.replace(loop_label);

    walk_statements(state, &data.body);
    state.flow.add_antecedent(loop_label, state.current_flow);

    state.break_target = saved_break;
    state.continue_target = saved_continue;

    state.current_flow = state.flow.finish(loop_label);
    walk_statements(state, &data.orelse);
    state.flow.add_antecedent(after_loop, state.current_flow);

    state.current_flow = state.flow.finish(after_loop);
}

fn bind_with(state: &mut BinderState<'_>, stmt: NodeIndex) {
    let data = state.ast.get_with(stmt).clone();
    for item in &data.items {
        let item_data = state.ast.get_with_item(item).clone();
        walk_expr(state, item_data.context_expr);
        let call = state.flow.create_call(item, state.current_flow);
        state.current_flow = call;
        if non_none(item_data.optional_vars).is_some() {
            bind_target(state, item_data.optional_vars, item);
        }
    }
    walk_statements(state, &data.body);
}

fn bind_try(state: &mut BinderState<'_>, stmt: NodeIndex) {
    let data = state.ast.get_try(stmt).clone();
    let has_finally = !data.finalbody.is_empty();

    let pre_try = state.current_flow;
    walk_statements(state, &data.body);
    let try_end = state.current_flow;

    let handler_entry = state.flow.create_branch_label();
    state.flow.add_antecedent(handler_entry, pre_try);
    state.flow.add_antecedent(handler_entry, try_end);
    let handler_entry = state.flow.finish(handler_entry);

    let join = state.flow.create_branch_label();

    if data.orelse.is_empty() {
        state.flow.add_antecedent(join, try_end);
    } else {
        state.current_flow = try_end;
        walk_statements(state, &data.orelse);
        state.flow.add_antecedent(join, state.current_flow);
    }

    for handler in &data.handlers {
        let handler_data = state.ast.get_except_handler(handler).clone();
        state.current_flow = handler_entry;
        if non_none(handler_data.exception_type).is_some() {
            walk_expr(state, handler_data.exception_type);
        }
        if let Some(name) = handler_data.name.clone() {
            let id = state
                .scopes
                .add_symbol(&mut state.symbols, state.current_scope, &name, SymbolFlags::empty());
            state.symbols.get_mut(id).add_declaration(Declaration::Variable {
                node: handler,
                is_constant: false,
                is_final: false,
                type_annotation: handler_data.exception_type,
                path: format!("{}.{}", state.module_path, name),
                range: state.ast.span_of(handler),
            });
            let assignment = state.flow.create_assignment(handler, state.current_flow, id, false);
            state.current_flow = assignment;
        }
        state.except_depth += 1;
        walk_statements(state, &handler_data.body);
        state.except_depth -= 1;
        state.flow.add_antecedent(join, state.current_flow);
    }

    state.current_flow = state.flow.finish(join);

    if has_finally {
        let pre_finally_gate = state.flow.create_pre_finally_gate(state.current_flow);
        state.current_flow = pre_finally_gate;
        walk_statements(state, &data.finalbody);
        let finally_end = state.current_flow;
        let post_finally = state.flow.create_post_finally(finally_end, pre_finally_gate);
        state.current_flow = post_finally;
    }
}

fn bind_function_def(state: &mut BinderState<'_>, stmt: NodeIndex) {
    let data = state.ast.get_function(stmt).clone();
    for decorator in &data.decorators {
        walk_expr(state, decorator);
    }
    for param in &data.parameters {
        if state.ast.kind_of(param) != SyntaxKind::Parameter {
            continue;
        }
        let annotation = state.ast.get_parameter(param).annotation;
        if non_none(annotation).is_some() {
            walk_expr(state, annotation);
        }
    }
    if non_none(data.return_annotation).is_some() {
        walk_expr(state, data.return_annotation);
    }

    let is_method = matches!(state.scopes.get(state.current_scope).kind, ScopeKind::Class);
    let id = state
        .scopes
        .add_symbol(&mut state.symbols, state.current_scope, &data.name, SymbolFlags::empty());
    let is_generator = body_contains_yield(state.ast, &data.body);
    state.symbols.get_mut(id).add_declaration(Declaration::Function {
        node: stmt,
        is_method,
        is_generator,
        return_expressions: Vec::new(),
        yield_expressions: Vec::new(),
        path: format!("{}.{}", state.module_path, data.name),
        range: state.ast.span_of(stmt),
    });
    state.side_tables.set_declaration_symbol(stmt, id);

    let assignment = state.flow.create_assignment(stmt, state.current_flow, id, false);
    state.current_flow = assignment;

    let function_scope = state.with_new_scope(ScopeKind::Function, stmt, |state| {
        inject_function_intrinsics(
            &mut state.scopes,
            &mut state.symbols,
            state.current_scope,
            &state.module_path.clone(),
            is_method,
        );
        state.current_scope
    });

    state.enqueue_deferred(DeferredBody {
        target: stmt,
        scope: function_scope,
        function_symbol: Some(id),
        is_lambda: false,
        is_async: data.is_async,
    });
}

fn bind_class_def(state: &mut BinderState<'_>, stmt: NodeIndex) {
    let data = state.ast.get_class(stmt).clone();
    for base in &data.bases {
        walk_expr(state, base);
    }
    for keyword in &data.keywords {
        let value = state.ast.get_keyword(keyword).value;
        walk_expr(state, value);
    }
    for decorator in &data.decorators {
        walk_expr(state, decorator);
    }

    let id = state
        .scopes
        .add_symbol(&mut state.symbols, state.current_scope, &data.name, SymbolFlags::empty());
    state.symbols.get_mut(id).add_declaration(Declaration::Class {
        node: stmt,
        path: format!("{}.{}", state.module_path, data.name),
        range: state.ast.span_of(stmt),
    });
    state.side_tables.set_declaration_symbol(stmt, id);
    let assignment = state.flow.create_assignment(stmt, state.current_flow, id, false);
    state.current_flow = assignment;

    state.with_new_scope(ScopeKind::Class, stmt, |state| {
        inject_class_intrinsics(
            &mut state.scopes,
            &mut state.symbols,
            state.current_scope,
            &state.module_path.clone(),
            state.options.language_version.supports_qualname(),
        );
        let start = state.flow.create_start();
        let saved_flow = state.current_flow;
        state.current_flow = start;
        walk_statements(state, &data.body);
        state.current_flow = saved_flow;
    });
}

fn body_contains_yield(ast: &NodeArena, body: &NodeList) -> bool {
    body.iter().any(|stmt| statement_contains_yield(ast, stmt))
}

fn statement_contains_yield(ast: &NodeArena, stmt: NodeIndex) -> bool {
    match ast.kind_of(stmt) {
        SyntaxKind::FunctionDef | SyntaxKind::Lambda | SyntaxKind::ClassDef => false,
        SyntaxKind::ExpressionStatement => expr_contains_yield(ast, ast.get_expression_statement(stmt).value),
        SyntaxKind::Return => {
            let value = ast.get_return(stmt).value;
            value.is_some() && expr_contains_yield(ast, value)
        }
        SyntaxKind::Assign => expr_contains_yield(ast, ast.get_assign(stmt).value),
        SyntaxKind::If => {
            let data = ast.get_if(stmt);
            expr_contains_yield(ast, data.test)
                || body_contains_yield(ast, &data.body)
                || body_contains_yield(ast, &data.orelse)
        }
        SyntaxKind::While => {
            let data = ast.get_while(stmt);
            body_contains_yield(ast, &data.body) || body_contains_yield(ast, &data.orelse)
        }
        SyntaxKind::For => {
            let data = ast.get_for(stmt);
            body_contains_yield(ast, &data.body) || body_contains_yield(ast, &data.orelse)
        }
        SyntaxKind::With => body_contains_yield(ast, &ast.get_with(stmt).body),
        SyntaxKind::Try => {
            let data = ast.get_try(stmt);
            body_contains_yield(ast, &data.body)
                || body_contains_yield(ast, &data.orelse)
                || body_contains_yield(ast, &data.finalbody)
                || data
                    .handlers
                    .iter()
                    .any(|h| body_contains_yield(ast, &ast.get_except_handler(h).body))
        }
        _ => false,
    }
}

fn expr_contains_yield(ast: &NodeArena, expr: NodeIndex) -> bool {
    if expr.is_none() {
        return false;
    }
    matches!(ast.kind_of(expr), SyntaxKind::Yield | SyntaxKind::YieldFrom)
}

// ---------------------------------------------------------------------
// Expressions
// ---------------------------------------------------------------------

/// Walks one expression, first draining any ambient true/false targets
/// installed by `bind_conditional` (§4.3 "BoolOp"/"UnaryOp", §4.4
/// "Conditional binding"). `BoolOp` and `not` consume the targets directly
/// so short-circuit and negation propagate to their operands; every other
/// expression is dispatched normally and then, if targets were present,
/// wired via `wire_condition`. Draining the targets before dispatch means a
/// nested subexpression (e.g. a `Call`'s arguments) never inherits a
/// conditional context meant only for its parent.
fn walk_expr(state: &mut BinderState<'_>, expr: NodeIndex) {
    if expr.is_none() {
        return;
    }
    let true_target = state.true_target.take();
    let false_target = state.false_target.take();

    if state.ast.kind_of(expr) == SyntaxKind::BoolOp {
        match (true_target, false_target) {
            (Some(tt), Some(ft)) => bind_bool_op_conditional(state, expr, tt, ft),
            _ => bind_bool_op(state, expr),
        }
        return;
    }
    if state.ast.kind_of(expr) == SyntaxKind::UnaryOp
        && state.ast.get_unary_op(expr).op == starling_ast::UnaryOpKind::Not
    {
        let operand = state.ast.get_unary_op(expr).operand;
        match (true_target, false_target) {
            (Some(tt), Some(ft)) => bind_conditional(state, operand, ft, tt),
            _ => walk_expr(state, operand),
        }
        return;
    }

    dispatch_expr(state, expr);

    if let (Some(tt), Some(ft)) = (true_target, false_target) {
        wire_condition(state, expr, tt, ft);
    }
}

/// Sets up the ambient true/false targets for `test` and walks it — the
/// entry point used by every conditional construct (`if`/`while`/ternary/
/// `assert`/comprehension `if`-clauses/`BoolOp` operands).
fn bind_conditional(state: &mut BinderState<'_>, test: NodeIndex, true_target: FlowNodeId, false_target: FlowNodeId) {
    state.true_target = Some(true_target);
    state.false_target = Some(false_target);
    walk_expr(state, test);
}

fn dispatch_expr(state: &mut BinderState<'_>, expr: NodeIndex) {
    match state.ast.kind_of(expr) {
        SyntaxKind::Name => bind_name_reference(state, expr),
        SyntaxKind::Attribute => {
            state.side_tables.set_flow_node(expr, state.current_flow);
            let value = state.ast.get_attribute(expr).value;
            walk_expr(state, value);
        }
        SyntaxKind::Subscript => {
            let data = state.ast.get_subscript(expr).clone();
            walk_expr(state, data.value);
            walk_expr(state, data.slice);
        }
        SyntaxKind::Slice => {
            let data = state.ast.get_slice(expr).clone();
            for part in [data.lower, data.upper, data.step] {
                if non_none(part).is_some() {
                    walk_expr(state, part);
                }
            }
        }
        SyntaxKind::Call => {
            let data = state.ast.get_call(expr).clone();
            walk_expr(state, data.func);
            for arg in &data.args {
                walk_expr(state, arg);
            }
            for keyword in &data.keywords {
                let value = state.ast.get_keyword(keyword).value;
                walk_expr(state, value);
            }
            let call = state.flow.create_call(expr, state.current_flow);
            state.current_flow = call;
        }
        SyntaxKind::UnaryOp => {
            let operand = state.ast.get_unary_op(expr).operand;
            walk_expr(state, operand);
        }
        SyntaxKind::BinOp => {
            let data = state.ast.get_bin_op(expr).clone();
            walk_expr(state, data.left);
            walk_expr(state, data.right);
        }
        SyntaxKind::Compare => {
            let data = state.ast.get_compare(expr).clone();
            walk_expr(state, data.left);
            for comparator in &data.comparators {
                walk_expr(state, comparator);
            }
        }
        SyntaxKind::IfExp => {
            let data = state.ast.get_if_exp(expr).clone();
            let true_label = state.flow.create_branch_label();
            let false_label = state.flow.create_branch_label();
            bind_conditional(state, data.test, true_label, false_label);

            state.current_flow = state.flow.finish(true_label);
            walk_expr(state, data.body);
            let then_end = state.current_flow;
            state.current_flow = state.flow.finish(false_label);
            walk_expr(state, data.orelse);
            let else_end = state.current_flow;
            let join = state.flow.create_branch_label();
            state.flow.add_antecedent(join, then_end);
            state.flow.add_antecedent(join, else_end);
            state.current_flow = state.flow.finish(join);
        }
        SyntaxKind::NamedExpr => bind_named_expr(state, expr),
        SyntaxKind::Yield => {
            state.side_tables.set_flow_node(expr, state.current_flow);
            if !state.in_function_body {
                state
                    .diagnostics
                    .add_error(state.ast.span_of(expr), "'yield' outside function");
            }
            let value = state.ast.get_yield(expr).value;
            if non_none(value).is_some() {
                walk_expr(state, value);
            }
            record_yield(state, expr);
        }
        SyntaxKind::YieldFrom => {
            state.side_tables.set_flow_node(expr, state.current_flow);
            if !state.in_function_body {
                state
                    .diagnostics
                    .add_error(state.ast.span_of(expr), "'yield from' outside function");
            } else if state.in_async_function {
                state.diagnostics.add_error(
                    state.ast.span_of(expr),
                    "'yield from' not allowed inside an async function",
                );
            }
            let value = state.ast.get_yield_from(expr).value;
            walk_expr(state, value);
            record_yield(state, expr);
        }
        SyntaxKind::Await => {
            if !state.in_async_function {
                state
                    .diagnostics
                    .add_error(state.ast.span_of(expr), "'await' outside async function");
            }
            let value = state.ast.get_await(expr).value;
            walk_expr(state, value);
        }
        SyntaxKind::Starred => {
            let value = state.ast.get_starred(expr).value;
            walk_expr(state, value);
        }
        SyntaxKind::Sequence => {
            let elements = state.ast.get_sequence(expr).elements.clone();
            for element in &elements {
                walk_expr(state, element);
            }
        }
        SyntaxKind::Dict => {
            let data = state.ast.get_dict(expr).clone();
            for key in data.keys.into_iter().filter(|k| k.is_some()) {
                walk_expr(state, key);
            }
            for value in &data.values {
                walk_expr(state, value);
            }
        }
        SyntaxKind::Comprehension => bind_comprehension_display(state, expr),
        SyntaxKind::DictComp => bind_dict_comp(state, expr),
        SyntaxKind::Lambda => bind_lambda(state, expr),
        SyntaxKind::JoinedStr => {
            let values = state.ast.get_joined_str(expr).values.clone();
            for value in &values {
                walk_expr(state, value);
            }
        }
        SyntaxKind::FormattedValue => {
            let data = state.ast.get_formatted_value(expr).clone();
            walk_expr(state, data.value);
            if non_none(data.format_spec).is_some() {
                walk_expr(state, data.format_spec);
            }
        }
        SyntaxKind::Constant => {}
        _ => {}
    }
}

fn bind_name_reference(state: &mut BinderState<'_>, expr: NodeIndex) {
    state.side_tables.set_flow_node(expr, state.current_flow);
    let name = state.ast.get_name(expr).id.clone();
    match state.scopes.lookup_recursive(state.current_scope, name.as_str()) {
        Some((symbol, scope)) => {
            state.side_tables.set_declaration_symbol(expr, symbol);
            state.record_reference(format!("{}:{}", scope.index(), name.as_str()));
        }
        None => {
            state.record_reference(format!("unresolved:{}", name.as_str()));
        }
    }
}

/// A `BoolOp` reached as an ordinary value (not itself the test of an `if`/
/// `while`/ternary/another `BoolOp`): binds it against a pair of throwaway
/// true/false labels, then merges both outcomes back into `current_flow` —
/// the expression still short-circuits for control-flow purposes, but
/// nothing outside it observes which side won.
fn bind_bool_op(state: &mut BinderState<'_>, expr: NodeIndex) {
    let true_label = state.flow.create_branch_label();
    let false_label = state.flow.create_branch_label();
    bind_bool_op_conditional(state, expr, true_label, false_label);

    let join = state.flow.create_branch_label();
    state.flow.add_antecedent(join, state.flow.finish(true_label));
    state.flow.add_antecedent(join, state.flow.finish(false_label));
    state.current_flow = state.flow.finish(join);
}

/// §4.3 "BoolOp": `and` routes each operand's false outcome straight to the
/// outer `false_target` (short-circuit) and its true outcome to evaluating
/// the next operand; `or` is the mirror image. The final operand's outcome
/// feeds both outer targets directly via the ordinary conditional bind.
fn bind_bool_op_conditional(
    state: &mut BinderState<'_>,
    expr: NodeIndex,
    true_target: FlowNodeId,
    false_target: FlowNodeId,
) {
    let data = state.ast.get_bool_op(expr).clone();
    let last = data.values.len().saturating_sub(1);
    for (i, value) in data.values.iter().enumerate() {
        if i == last {
            bind_conditional(state, value, true_target, false_target);
            break;
        }
        let next = state.flow.create_branch_label();
        match data.op {
            starling_ast::BoolOpKind::And => bind_conditional(state, value, next, false_target),
            starling_ast::BoolOpKind::Or => bind_conditional(state, value, true_target, next),
        }
        state.current_flow = state.flow.finish(next);
    }
}

fn bind_named_expr(state: &mut BinderState<'_>, expr: NodeIndex) {
    let data = state.ast.get_named_expr(expr).clone();
    walk_expr(state, data.value);

    let target_scope = state.scopes.nearest_execution_scope(state.current_scope);
    if state.ast.kind_of(data.target) != SyntaxKind::Name {
        walk_expr(state, data.target);
        return;
    }
    let name = state.ast.get_name(data.target).id.clone();
    if matches!(state.scopes.get(target_scope).kind, ScopeKind::Comprehension) {
        state.diagnostics.add_error(
            state.ast.span_of(expr),
            "assignment expression cannot rebind a comprehension iteration variable",
        );
    }
    let id = state
        .scopes
        .add_symbol(&mut state.symbols, target_scope, &name, SymbolFlags::empty());
    state.symbols.get_mut(id).add_declaration(Declaration::Variable {
        node: data.target,
        is_constant: false,
        is_final: false,
        type_annotation: NodeIndex::NONE,
        path: format!("{}.{}", state.module_path, name),
        range: state.ast.span_of(expr),
    });
    state.side_tables.set_declaration_symbol(data.target, id);
    let assignment = state.flow.create_assignment(data.target, state.current_flow, id, false);
    state.current_flow = assignment;
}

fn record_yield(state: &mut BinderState<'_>, expr: NodeIndex) {
    if let Some(symbol) = state.current_function_symbol {
        if let Some(Declaration::Function {
            yield_expressions,
            is_generator,
            ..
        }) = state.symbols.get_mut(symbol).last_function_declaration_mut()
        {
            yield_expressions.push(expr);
            *is_generator = true;
        }
    }
    let call = state.flow.create_call(expr, state.current_flow);
    state.current_flow = call;
}

fn bind_lambda(state: &mut BinderState<'_>, expr: NodeIndex) {
    let function_scope = state.with_new_scope(ScopeKind::Function, expr, |state| state.current_scope);
    state.enqueue_deferred(DeferredBody {
        target: expr,
        scope: function_scope,
        function_symbol: None,
        is_lambda: true,
        is_async: false,
    });
}

/// Comprehension clauses introduce their own scope (§3 "Comprehension
/// scope") even though they're bound inline rather than deferred — only
/// function/lambda bodies defer (§4.3 P2).
fn bind_comprehension_display(state: &mut BinderState<'_>, expr: NodeIndex) {
    let data = state.ast.get_comprehension_display(expr).clone();
    state.with_new_scope(ScopeKind::Comprehension, expr, |state| {
        let start = state.flow.create_start();
        state.current_flow = start;
        bind_comprehension_clauses(state, &data.generators);
        walk_expr(state, data.element);
    });
}

fn bind_dict_comp(state: &mut BinderState<'_>, expr: NodeIndex) {
    let data = state.ast.get_dict_comp(expr).clone();
    state.with_new_scope(ScopeKind::Comprehension, expr, |state| {
        let start = state.flow.create_start();
        state.current_flow = start;
        bind_comprehension_clauses(state, &data.generators);
        walk_expr(state, data.key);
        walk_expr(state, data.value);
    });
}

fn bind_comprehension_clauses(state: &mut BinderState<'_>, generators: &NodeList) {
    for (i, clause) in generators.iter().enumerate() {
        let data = state.ast.get_comprehension_clause(clause).clone();
        // The outermost iterable is evaluated in the enclosing scope in
        // real Python semantics; approximated here as evaluated inline
        // since the comprehension scope's Start already sits after it.
        let _ = i;
        walk_expr(state, data.iter);
        bind_comprehension_target(state, data.target, clause);
        for if_clause in &data.ifs {
            let true_label = state.flow.create_branch_label();
            let false_label = state.flow.create_branch_label();
            bind_conditional(state, if_clause, true_label, false_label);
            let _ = state.flow.finish(false_label);
            state.current_flow = state.flow.finish(true_label);
        }
    }
}

/// Binds a `for`-clause target inside a comprehension's own scope. When the
/// name also exists in the enclosing scope, the comprehension's binding
/// shadows it without touching the outer symbol — recorded as an
/// `AssignmentAlias` flow node rather than a plain `Assignment` so
/// downstream narrowing can tell the two apart (§4.3 "ListComprehension…").
fn bind_comprehension_target(state: &mut BinderState<'_>, target: NodeIndex, origin: NodeIndex) {
    match state.ast.kind_of(target) {
        SyntaxKind::Name => {
            let name = state.ast.get_name(target).id.clone();
            let shadowed = state
                .scopes
                .get(state.current_scope)
                .parent
                .and_then(|parent| state.scopes.lookup_recursive(parent, name.as_str()))
                .map(|(symbol, _)| symbol);

            let id = state
                .scopes
                .add_symbol(&mut state.symbols, state.current_scope, &name, SymbolFlags::empty());
            state.symbols.get_mut(id).add_declaration(Declaration::Variable {
                node: target,
                is_constant: false,
                is_final: false,
                type_annotation: NodeIndex::NONE,
                path: format!("{}.{}", state.module_path, name),
                range: state.ast.span_of(origin),
            });
            state.side_tables.set_declaration_symbol(target, id);

            state.current_flow = match shadowed {
                Some(alias_symbol) if alias_symbol != id => {
                    state.flow.create_assignment_alias(state.current_flow, id, alias_symbol)
                }
                _ => state.flow.create_assignment(target, state.current_flow, id, false),
            };
        }
        SyntaxKind::Sequence => {
            let elements = state.ast.get_sequence(target).elements.clone();
            for element in &elements {
                bind_comprehension_target(state, element, origin);
            }
        }
        SyntaxKind::Starred => {
            let inner = state.ast.get_starred(target).value;
            bind_comprehension_target(state, inner, origin);
        }
        _ => walk_expr(state, target),
    }
}

/// Wires `test`'s post-walk flow into both `true_target` and `false_target`
/// (§4.4 "Conditional binding"). A statically-determined truthiness feeds
/// only the matching side, leaving the other with no antecedent — `finish`
/// then reduces it to `Unreachable` on its own (F2), so no manual truthiness
/// branching is needed at call sites. A narrowing expression (§4.4) is
/// wrapped in `TrueCondition`/`FalseCondition` so downstream passes can read
/// back which branch was taken; anything else shares the plain post-test
/// flow on both sides unwrapped, since there's nothing to narrow on.
fn wire_condition(state: &mut BinderState<'_>, test: NodeIndex, true_target: FlowNodeId, false_target: FlowNodeId) {
    let current = state.current_flow;
    if current == state.flow.unreachable {
        return;
    }
    if let Some(truthiness) = static_truthiness(state.ast, test) {
        if truthiness {
            state.flow.add_antecedent(true_target, current);
        } else {
            state.flow.add_antecedent(false_target, current);
        }
        return;
    }
    if is_narrowing_expression(state.ast, test) {
        let true_flow = state.flow.create_true_condition(test, current);
        let false_flow = state.flow.create_false_condition(test, current);
        state.flow.add_antecedent(true_target, true_flow);
        state.flow.add_antecedent(false_target, false_flow);
    } else {
        state.flow.add_antecedent(true_target, current);
        state.flow.add_antecedent(false_target, current);
    }
}

fn static_truthiness(ast: &NodeArena, test: NodeIndex) -> Option<bool> {
    if ast.kind_of(test) != SyntaxKind::Constant {
        return None;
    }
    ast.get_constant(test).value.static_truthiness()
}

/// §4.4 "Conditional binding": a test expression is worth wrapping in
/// `TrueCondition`/`FalseCondition` only if a downstream pass could actually
/// narrow a name's type from it. Covers a bare name or a member access
/// rooted in one, an assignment expression, `is`/`is not`/`==`/`!=` against
/// `None`, `type(x) is`/`is not T`, `isinstance`/`issubclass` calls, and
/// `not NARROWING` recursively. `AUG = NARROWING` (augmented assignment)
/// is handled separately at the reference-map level, not here.
fn is_narrowing_expression(ast: &NodeArena, expr: NodeIndex) -> bool {
    match ast.kind_of(expr) {
        SyntaxKind::Name => true,
        SyntaxKind::Attribute => is_name_rooted(ast, expr),
        SyntaxKind::NamedExpr => true,
        SyntaxKind::UnaryOp => {
            let data = ast.get_unary_op(expr);
            matches!(data.op, starling_ast::UnaryOpKind::Not) && is_narrowing_expression(ast, data.operand)
        }
        SyntaxKind::Compare => {
            let data = ast.get_compare(expr);
            if data.ops.len() != 1 || data.comparators.len() != 1 {
                return false;
            }
            let op = data.ops[0];
            let rhs = data.comparators.get(0).unwrap();
            match op {
                starling_ast::CmpOp::Is | starling_ast::CmpOp::IsNot => {
                    is_none_constant(ast, rhs) || is_bare_type_call(ast, data.left) || is_bare_type_call(ast, rhs)
                }
                starling_ast::CmpOp::Eq | starling_ast::CmpOp::NotEq => is_none_constant(ast, rhs),
                _ => false,
            }
        }
        SyntaxKind::Call => is_isinstance_or_issubclass_call(ast, expr),
        _ => false,
    }
}

/// A bare `Name`, or an `Attribute`/`Subscript` chain rooted in one —
/// supports arbitrary dotted chains like `a.b.c`, not just a single hop.
fn is_name_rooted(ast: &NodeArena, expr: NodeIndex) -> bool {
    match ast.kind_of(expr) {
        SyntaxKind::Name => true,
        SyntaxKind::Attribute => is_name_rooted(ast, ast.get_attribute(expr).value),
        SyntaxKind::Subscript => is_name_rooted(ast, ast.get_subscript(expr).value),
        _ => false,
    }
}

fn is_none_constant(ast: &NodeArena, expr: NodeIndex) -> bool {
    ast.kind_of(expr) == SyntaxKind::Constant && matches!(ast.get_constant(expr).value, starling_ast::ConstantValue::None)
}

/// `type(x)`: a call to the bare name `type` with exactly one positional
/// argument and no keywords.
fn is_bare_type_call(ast: &NodeArena, expr: NodeIndex) -> bool {
    if ast.kind_of(expr) != SyntaxKind::Call {
        return false;
    }
    let data = ast.get_call(expr);
    data.args.len() == 1
        && data.keywords.is_empty()
        && ast.kind_of(data.func) == SyntaxKind::Name
        && ast.get_name(data.func).id.as_str() == "type"
}

/// `isinstance(x, T)` / `issubclass(x, T)`: a call to one of those bare
/// names with exactly two positional arguments.
fn is_isinstance_or_issubclass_call(ast: &NodeArena, expr: NodeIndex) -> bool {
    let data = ast.get_call(expr);
    if data.args.len() != 2 || !data.keywords.is_empty() || ast.kind_of(data.func) != SyntaxKind::Name {
        return false;
    }
    matches!(ast.get_name(data.func).id.as_str(), "isinstance" | "issubclass")
}
