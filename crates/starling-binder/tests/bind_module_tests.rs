#[path = "support.rs"]
mod support;

use starling_ast::{ExprContext, NodeArena, NodeIndex};
use starling_binder::{
    bind_module, BinderOptions, Declaration, FileInfo, ImportLookup, ImportedModule, SymbolFlags,
};
use starling_common::diagnostics::VecDiagnosticSink;
use starling_common::Atom;

fn bind(ast: &NodeArena, module: NodeIndex) -> (starling_binder::BindOutput, VecDiagnosticSink) {
    let mut diagnostics = VecDiagnosticSink::new();
    let file_info = FileInfo::new("m.py");
    let output = bind_module(
        ast,
        module,
        "m",
        BinderOptions::default(),
        &file_info,
        &mut diagnostics,
        None,
    );
    (output, diagnostics)
}

#[test]
fn function_parameter_resolves_inside_the_deferred_body() {
    let mut ast = NodeArena::new();
    let param = support::parameter(&mut ast, "x");
    let x_ref = support::name(&mut ast, "x", ExprContext::Load);
    let body = support::return_stmt(&mut ast, x_ref);
    let function = support::function_def(&mut ast, "f", vec![param], vec![body]);
    let module = support::module(&mut ast, vec![function]);

    let (output, diagnostics) = bind(&ast, module);
    assert!(diagnostics.diagnostics.is_empty());

    let function_scope = output.side_tables.scope_of(function).expect("function scope recorded");
    assert!(output.scopes.get(function_scope).lookup("x").is_some());

    let param_symbol = output
        .side_tables
        .declaration_symbol_of(x_ref)
        .expect("the Name reference resolved to a declaration");
    assert_eq!(output.symbols.get(param_symbol).name.as_str(), "x");
}

#[test]
fn recursive_function_resolves_its_own_name_inside_its_body() {
    let mut ast = NodeArena::new();
    let self_ref = support::name(&mut ast, "f", ExprContext::Load);
    let call = support::call(&mut ast, self_ref, vec![]);
    let body = starling_ast::NodeData::ExpressionStatement(Box::new(
        starling_ast::ExpressionStatementData { value: call },
    ));
    let expr_stmt = ast.alloc(
        starling_ast::SyntaxKind::ExpressionStatement,
        starling_common::Span::dummy(),
        NodeIndex::NONE,
        body,
    );
    let function = support::function_def(&mut ast, "f", vec![], vec![expr_stmt]);
    let module = support::module(&mut ast, vec![function]);

    let (output, _diagnostics) = bind(&ast, module);
    let resolved = output.side_tables.declaration_symbol_of(self_ref);
    assert!(resolved.is_some());
}

#[test]
fn generator_function_is_flagged_from_a_yield_anywhere_in_its_body() {
    let mut ast = NodeArena::new();
    let none_value = NodeIndex::NONE;
    let yielded = support::yield_expr(&mut ast, none_value);
    let expr_stmt = ast.alloc(
        starling_ast::SyntaxKind::ExpressionStatement,
        starling_common::Span::dummy(),
        NodeIndex::NONE,
        starling_ast::NodeData::ExpressionStatement(Box::new(
            starling_ast::ExpressionStatementData { value: yielded },
        )),
    );
    let function = support::function_def(&mut ast, "gen", vec![], vec![expr_stmt]);
    let module = support::module(&mut ast, vec![function]);

    let (output, _diagnostics) = bind(&ast, module);
    let symbol = output
        .side_tables
        .declaration_symbol_of(function)
        .expect("function declaration recorded");
    let Declaration::Function { is_generator, .. } = output
        .symbols
        .get(symbol)
        .declarations()
        .iter()
        .find(|d| matches!(d, Declaration::Function { .. }))
        .unwrap()
    else {
        panic!("expected Function declaration");
    };
    assert!(is_generator);
}

#[test]
fn dunder_all_restricts_what_a_wildcard_import_would_see() {
    let mut ast = NodeArena::new();
    let dunder_all = support::name(&mut ast, "__all__", ExprContext::Store);
    let public_str = ast.alloc(
        starling_ast::SyntaxKind::Constant,
        starling_common::Span::dummy(),
        NodeIndex::NONE,
        starling_ast::NodeData::Constant(Box::new(starling_ast::ConstantData {
            value: starling_ast::ConstantValue::Str(Atom::from("public")),
        })),
    );
    let list_value = ast.alloc(
        starling_ast::SyntaxKind::Sequence,
        starling_common::Span::dummy(),
        NodeIndex::NONE,
        starling_ast::NodeData::Sequence(Box::new(starling_ast::SequenceDisplayData {
            elements: vec![public_str].into_iter().collect(),
            ctx: ExprContext::Load,
        })),
    );
    let all_assign = support::assign(&mut ast, dunder_all, list_value);

    let public_target = support::name(&mut ast, "public", ExprContext::Store);
    let public_value = support::name(&mut ast, "None", ExprContext::Load);
    let public_assign = support::assign(&mut ast, public_target, public_value);

    let private_target = support::name(&mut ast, "_private", ExprContext::Store);
    let private_value = support::name(&mut ast, "None", ExprContext::Load);
    let private_assign = support::assign(&mut ast, private_target, private_value);

    let module = support::module(&mut ast, vec![all_assign, public_assign, private_assign]);

    let (output, _diagnostics) = bind(&ast, module);
    assert!(output.scopes.get(output.module_scope).lookup("public").is_some());
    assert!(output.scopes.get(output.module_scope).lookup("_private").is_none());
}

#[test]
fn dotted_imports_of_a_common_root_merge_into_one_alias_declaration() {
    let mut ast = NodeArena::new();
    let alias_b = support::import_alias(&mut ast, "a.b", None);
    let alias_c = support::import_alias(&mut ast, "a.c", None);
    let import = support::import_stmt(&mut ast, vec![alias_b, alias_c]);
    let module = support::module(&mut ast, vec![import]);

    let (output, _diagnostics) = bind(&ast, module);
    let symbol_id = output
        .scopes
        .get(output.module_scope)
        .lookup("a")
        .expect("`a` is bound by both imports");
    assert_eq!(output.symbols.get(symbol_id).declarations().len(), 1);
    let Declaration::Alias { implicit_imports, .. } = &output.symbols.get(symbol_id).declarations()[0] else {
        panic!("expected Alias declaration");
    };
    assert_eq!(implicit_imports.implicit_imports.len(), 2);
}

struct FakeModule;

impl ImportLookup for FakeModule {
    fn lookup(&self, path: &str) -> Option<ImportedModule> {
        if path == "pkg" {
            Some(ImportedModule {
                names: vec![Atom::from("public"), Atom::from("_hidden")],
                dunder_all: None,
                implicit_submodules: Vec::new(),
                docstring: None,
            })
        } else {
            None
        }
    }
}

#[test]
fn wildcard_import_binds_every_non_underscore_name_from_the_resolved_module() {
    let mut ast = NodeArena::new();
    let import_from = support::import_from_stmt(&mut ast, Some("pkg"), 0, vec![], true);
    let module = support::module(&mut ast, vec![import_from]);

    let mut diagnostics = VecDiagnosticSink::new();
    let file_info = FileInfo::new("m.py");
    let lookup = FakeModule;
    let output = bind_module(
        &ast,
        module,
        "m",
        BinderOptions::default(),
        &file_info,
        &mut diagnostics,
        Some(&lookup),
    );

    assert!(output.scopes.get(output.module_scope).lookup("public").is_some());
    assert!(output.scopes.get(output.module_scope).lookup("_hidden").is_none());
    assert!(diagnostics.diagnostics.is_empty());
}

#[test]
fn nonlocal_assignment_targets_the_enclosing_function_scope() {
    let mut ast = NodeArena::new();
    let outer_target = support::name(&mut ast, "counter", ExprContext::Store);
    let outer_value = support::name(&mut ast, "zero_placeholder", ExprContext::Load);
    let outer_assign = support::assign(&mut ast, outer_target, outer_value);

    let nonlocal = support::nonlocal_stmt(&mut ast, &["counter"]);
    let inner_target = support::name(&mut ast, "counter", ExprContext::Store);
    let inner_value = support::name(&mut ast, "one_placeholder", ExprContext::Load);
    let inner_assign = support::assign(&mut ast, inner_target, inner_value);
    let inner = support::function_def(&mut ast, "bump", vec![], vec![nonlocal, inner_assign]);

    let outer = support::function_def(&mut ast, "make_counter", vec![], vec![outer_assign, inner]);
    let module = support::module(&mut ast, vec![outer]);

    let (output, diagnostics) = bind(&ast, module);
    assert!(diagnostics.diagnostics.is_empty());

    let outer_scope = output.side_tables.scope_of(outer).expect("outer function scope recorded");
    let outer_symbol = output
        .scopes
        .get(outer_scope)
        .lookup("counter")
        .expect("outer assignment declares `counter`");

    let inner_symbol = output
        .side_tables
        .declaration_symbol_of(inner_target)
        .expect("nonlocal-redirected assignment resolves to a symbol");
    assert_eq!(inner_symbol, outer_symbol);
}

#[test]
fn self_attribute_assignment_declares_an_instance_member_on_the_class() {
    let mut ast = NodeArena::new();
    let self_param = support::parameter(&mut ast, "self");
    let self_ref = support::name(&mut ast, "self", ExprContext::Load);
    let target = support::attribute(&mut ast, self_ref, "value", ExprContext::Store);
    let rhs = support::name(&mut ast, "None", ExprContext::Load);
    let assign = support::assign(&mut ast, target, rhs);
    let method = support::function_def(&mut ast, "__init__", vec![self_param], vec![assign]);

    let class = ast.alloc(
        starling_ast::SyntaxKind::ClassDef,
        starling_common::Span::dummy(),
        NodeIndex::NONE,
        starling_ast::NodeData::ClassDef(Box::new(starling_ast::ClassDefData {
            name: "Widget".into(),
            bases: starling_ast::NodeList::new(),
            keywords: starling_ast::NodeList::new(),
            decorators: starling_ast::NodeList::new(),
            body: vec![method].into_iter().collect(),
        })),
    );
    ast.set_parent(method, class);
    let module = support::module(&mut ast, vec![class]);

    let (output, _diagnostics) = bind(&ast, module);
    let class_scope = output.side_tables.scope_of(class).expect("class scope recorded");
    let member = output
        .scopes
        .get(class_scope)
        .lookup("value")
        .expect("self.value = ... declares an instance member");
    assert!(output.symbols.get(member).flags.contains(SymbolFlags::INSTANCE_MEMBER));
}

#[test]
fn staticmethod_assigning_through_its_first_parameter_declares_no_member() {
    let mut ast = NodeArena::new();
    let self_param = support::parameter(&mut ast, "self");
    let self_ref = support::name(&mut ast, "self", ExprContext::Load);
    let target = support::attribute(&mut ast, self_ref, "y", ExprContext::Store);
    let rhs = support::name(&mut ast, "None", ExprContext::Load);
    let assign = support::assign(&mut ast, target, rhs);
    let staticmethod_decorator = support::name(&mut ast, "staticmethod", ExprContext::Load);
    let method = support::decorated_function_def(
        &mut ast,
        "helper",
        vec![staticmethod_decorator],
        vec![self_param],
        vec![assign],
    );

    let class = ast.alloc(
        starling_ast::SyntaxKind::ClassDef,
        starling_common::Span::dummy(),
        NodeIndex::NONE,
        starling_ast::NodeData::ClassDef(Box::new(starling_ast::ClassDefData {
            name: "Widget".into(),
            bases: starling_ast::NodeList::new(),
            keywords: starling_ast::NodeList::new(),
            decorators: starling_ast::NodeList::new(),
            body: vec![method].into_iter().collect(),
        })),
    );
    ast.set_parent(method, class);
    let module = support::module(&mut ast, vec![class]);

    let (output, _diagnostics) = bind(&ast, module);
    let class_scope = output.side_tables.scope_of(class).expect("class scope recorded");
    assert!(
        output.scopes.get(class_scope).lookup("y").is_none(),
        "a staticmethod's `self.y = ...` must not declare a member — `self` is a plain parameter"
    );
}

#[test]
fn comprehension_target_shadowing_an_outer_name_creates_an_assignment_alias() {
    let mut ast = NodeArena::new();
    let outer_target = support::name(&mut ast, "x", ExprContext::Store);
    let outer_value = support::name(&mut ast, "None", ExprContext::Load);
    let outer_assign = support::assign(&mut ast, outer_target, outer_value);

    let comp_target = support::name(&mut ast, "x", ExprContext::Store);
    let iter = support::name(&mut ast, "items", ExprContext::Load);
    let clause = support::comprehension_clause(&mut ast, comp_target, iter);
    let element = support::name(&mut ast, "x", ExprContext::Load);
    let comp = support::list_comp(&mut ast, element, vec![clause]);
    let comp_stmt = ast.alloc(
        starling_ast::SyntaxKind::ExpressionStatement,
        starling_common::Span::dummy(),
        NodeIndex::NONE,
        starling_ast::NodeData::ExpressionStatement(Box::new(
            starling_ast::ExpressionStatementData { value: comp },
        )),
    );
    let module = support::module(&mut ast, vec![outer_assign, comp_stmt]);

    let (output, diagnostics) = bind(&ast, module);
    assert!(diagnostics.diagnostics.is_empty());

    let outer_symbol = output
        .scopes
        .get(output.module_scope)
        .lookup("x")
        .expect("outer assignment declares `x`");
    let comp_scope = output
        .side_tables
        .scope_of(comp)
        .expect("comprehension scope recorded");
    let inner_symbol = output
        .scopes
        .get(comp_scope)
        .lookup("x")
        .expect("comprehension target declares its own `x`");
    assert_ne!(outer_symbol, inner_symbol);

    let found_alias = output.flow.iter().any(|node| {
        matches!(
            node,
            starling_binder::FlowNode::AssignmentAlias { target_symbol, alias_symbol, .. }
                if *target_symbol == inner_symbol && *alias_symbol == outer_symbol
        )
    });
    assert!(found_alias, "expected an AssignmentAlias flow node for the shadowed target");
}

#[test]
fn walrus_target_inside_a_comprehension_hoists_to_the_enclosing_scope() {
    let mut ast = NodeArena::new();
    let walrus_target = support::name(&mut ast, "y", ExprContext::Store);
    let x_in_condition = support::name(&mut ast, "x", ExprContext::Load);
    let walrus = support::named_expr(&mut ast, walrus_target, x_in_condition);

    let comp_target = support::name(&mut ast, "x", ExprContext::Store);
    let range_call = support::name(&mut ast, "range", ExprContext::Load);
    let clause = support::comprehension_clause(&mut ast, comp_target, range_call);
    let comp = support::list_comp(&mut ast, walrus, vec![clause]);
    let comp_stmt = ast.alloc(
        starling_ast::SyntaxKind::ExpressionStatement,
        starling_common::Span::dummy(),
        NodeIndex::NONE,
        starling_ast::NodeData::ExpressionStatement(Box::new(
            starling_ast::ExpressionStatementData { value: comp },
        )),
    );
    let module = support::module(&mut ast, vec![comp_stmt]);

    let (output, diagnostics) = bind(&ast, module);
    assert!(diagnostics.diagnostics.is_empty());

    assert!(
        output.scopes.get(output.module_scope).lookup("y").is_some(),
        "walrus target must hoist into the enclosing module scope"
    );
    assert!(
        output.scopes.get(output.module_scope).lookup("x").is_none(),
        "the comprehension's own `for`-target must not leak into the enclosing scope"
    );
    let comp_scope = output
        .side_tables
        .scope_of(comp)
        .expect("comprehension scope recorded");
    assert!(output.scopes.get(comp_scope).lookup("x").is_some());
}

#[test]
fn annotated_assignment_to_final_marks_the_declaration_final() {
    let mut ast = NodeArena::new();
    let target = support::name(&mut ast, "x", ExprContext::Store);
    let annotation = support::name(&mut ast, "Final", ExprContext::Load);
    let value = support::name(&mut ast, "five_placeholder", ExprContext::Load);
    let ann_assign = support::ann_assign(&mut ast, target, annotation, value);
    let module = support::module(&mut ast, vec![ann_assign]);

    let (output, diagnostics) = bind(&ast, module);
    assert!(diagnostics.diagnostics.is_empty());
    let symbol = output
        .side_tables
        .declaration_symbol_of(target)
        .expect("annotated assignment declares a symbol");
    let Declaration::Variable { is_final, type_annotation, .. } = output
        .symbols
        .get(symbol)
        .declarations()
        .iter()
        .find(|d| matches!(d, Declaration::Variable { .. }))
        .unwrap()
    else {
        panic!("expected Variable declaration");
    };
    assert!(is_final);
    assert_eq!(*type_annotation, annotation);
}

#[test]
fn bare_raise_at_module_scope_is_a_hard_error() {
    let mut ast = NodeArena::new();
    let raise = support::raise_stmt(&mut ast, NodeIndex::NONE);
    let module = support::module(&mut ast, vec![raise]);

    let (_output, diagnostics) = bind(&ast, module);
    assert_eq!(diagnostics.diagnostics.len(), 1);
    assert!(diagnostics.diagnostics[0].message.contains("bare 'raise'"));
}

#[test]
fn bare_raise_inside_an_except_handler_is_allowed() {
    let mut ast = NodeArena::new();
    let raise = support::raise_stmt(&mut ast, NodeIndex::NONE);
    let handler = support::except_handler(&mut ast, None, vec![raise]);
    let try_stmt = support::try_stmt(&mut ast, vec![], vec![handler], vec![]);
    let module = support::module(&mut ast, vec![try_stmt]);

    let (_output, diagnostics) = bind(&ast, module);
    assert!(diagnostics.diagnostics.is_empty());
}

#[test]
fn yield_at_module_scope_is_a_hard_error() {
    let mut ast = NodeArena::new();
    let yielded = support::yield_expr(&mut ast, NodeIndex::NONE);
    let expr_stmt = ast.alloc(
        starling_ast::SyntaxKind::ExpressionStatement,
        starling_common::Span::dummy(),
        NodeIndex::NONE,
        starling_ast::NodeData::ExpressionStatement(Box::new(
            starling_ast::ExpressionStatementData { value: yielded },
        )),
    );
    let module = support::module(&mut ast, vec![expr_stmt]);

    let (_output, diagnostics) = bind(&ast, module);
    assert_eq!(diagnostics.diagnostics.len(), 1);
    assert!(diagnostics.diagnostics[0].message.contains("'yield' outside function"));
}

#[test]
fn statements_after_an_unconditional_return_are_marked_unreachable() {
    let mut ast = NodeArena::new();
    let ret = support::return_stmt(&mut ast, NodeIndex::NONE);
    let dead_target = support::name(&mut ast, "dead", ExprContext::Store);
    let dead_value = support::name(&mut ast, "None", ExprContext::Load);
    let dead_assign = support::assign(&mut ast, dead_target, dead_value);
    let function = support::function_def(&mut ast, "f", vec![], vec![ret, dead_assign]);
    let module = support::module(&mut ast, vec![function]);

    let (_output, diagnostics) = bind(&ast, module);
    assert!(diagnostics
        .diagnostics
        .iter()
        .any(|d| d.message.contains("unreachable code")));
}

#[test]
fn await_inside_a_plain_function_is_a_hard_error() {
    let mut ast = NodeArena::new();
    let awaited = support::name(&mut ast, "coro", ExprContext::Load);
    let wait = support::await_expr(&mut ast, awaited);
    let expr_stmt = ast.alloc(
        starling_ast::SyntaxKind::ExpressionStatement,
        starling_common::Span::dummy(),
        NodeIndex::NONE,
        starling_ast::NodeData::ExpressionStatement(Box::new(
            starling_ast::ExpressionStatementData { value: wait },
        )),
    );
    let function = support::function_def(&mut ast, "f", vec![], vec![expr_stmt]);
    let module = support::module(&mut ast, vec![function]);

    let (_output, diagnostics) = bind(&ast, module);
    assert!(diagnostics
        .diagnostics
        .iter()
        .any(|d| d.message.contains("'await' outside async function")));
}

#[test]
fn await_inside_an_async_function_is_allowed() {
    let mut ast = NodeArena::new();
    let awaited = support::name(&mut ast, "coro", ExprContext::Load);
    let wait = support::await_expr(&mut ast, awaited);
    let expr_stmt = ast.alloc(
        starling_ast::SyntaxKind::ExpressionStatement,
        starling_common::Span::dummy(),
        NodeIndex::NONE,
        starling_ast::NodeData::ExpressionStatement(Box::new(
            starling_ast::ExpressionStatementData { value: wait },
        )),
    );
    let function = support::async_function_def(&mut ast, "f", vec![], vec![expr_stmt]);
    let module = support::module(&mut ast, vec![function]);

    let (_output, diagnostics) = bind(&ast, module);
    assert!(diagnostics.diagnostics.is_empty());
}

#[test]
fn yield_from_inside_an_async_function_is_a_hard_error() {
    let mut ast = NodeArena::new();
    let source = support::name(&mut ast, "items", ExprContext::Load);
    let yielded = support::yield_from_expr(&mut ast, source);
    let expr_stmt = ast.alloc(
        starling_ast::SyntaxKind::ExpressionStatement,
        starling_common::Span::dummy(),
        NodeIndex::NONE,
        starling_ast::NodeData::ExpressionStatement(Box::new(
            starling_ast::ExpressionStatementData { value: yielded },
        )),
    );
    let function = support::async_function_def(&mut ast, "f", vec![], vec![expr_stmt]);
    let module = support::module(&mut ast, vec![function]);

    let (_output, diagnostics) = bind(&ast, module);
    assert!(diagnostics
        .diagnostics
        .iter()
        .any(|d| d.message.contains("'yield from' not allowed inside an async function")));
}

#[test]
fn and_short_circuit_evaluates_the_right_operand_only_under_the_left_operands_true_branch() {
    let mut ast = NodeArena::new();
    let a = support::name(&mut ast, "a", ExprContext::Load);
    let b = support::name(&mut ast, "b", ExprContext::Load);
    let test = support::bool_op(&mut ast, starling_ast::BoolOpKind::And, vec![a, b]);
    let body = vec![];
    let if_stmt = support::if_stmt(&mut ast, test, body, vec![]);
    let module = support::module(&mut ast, vec![if_stmt]);

    let (output, diagnostics) = bind(&ast, module);
    assert!(diagnostics.diagnostics.is_empty());

    let flow_a = output.side_tables.flow_node_of(a).expect("flow recorded for `a`");
    let flow_b = output.side_tables.flow_node_of(b).expect("flow recorded for `b`");
    assert_ne!(flow_a, flow_b, "`b` is bound under a narrower flow state than `a`");
    assert!(matches!(
        output.flow.get(flow_b),
        starling_binder::FlowNode::TrueCondition { expression, .. } if *expression == a
    ));
}

#[test]
fn or_short_circuit_evaluates_the_right_operand_only_under_the_left_operands_false_branch() {
    let mut ast = NodeArena::new();
    let a = support::name(&mut ast, "a", ExprContext::Load);
    let b = support::name(&mut ast, "b", ExprContext::Load);
    let test = support::bool_op(&mut ast, starling_ast::BoolOpKind::Or, vec![a, b]);
    let if_stmt = support::if_stmt(&mut ast, test, vec![], vec![]);
    let module = support::module(&mut ast, vec![if_stmt]);

    let (output, diagnostics) = bind(&ast, module);
    assert!(diagnostics.diagnostics.is_empty());

    let flow_b = output.side_tables.flow_node_of(b).expect("flow recorded for `b`");
    assert!(matches!(
        output.flow.get(flow_b),
        starling_binder::FlowNode::FalseCondition { expression, .. } if *expression == a
    ));
}

#[test]
fn not_swaps_the_narrowing_targets_of_its_operand() {
    let mut ast = NodeArena::new();
    let value = support::name(&mut ast, "x", ExprContext::Load);
    let none = support::constant_none(&mut ast);
    let test_inner = support::compare(&mut ast, value, starling_ast::CmpOp::Is, none);
    let test = support::unary_not(&mut ast, test_inner);
    let body_name = support::name(&mut ast, "x", ExprContext::Load);
    let body_stmt = starling_ast::NodeData::ExpressionStatement(Box::new(
        starling_ast::ExpressionStatementData { value: body_name },
    ));
    let body_stmt = ast.alloc(
        starling_ast::SyntaxKind::ExpressionStatement,
        starling_common::Span::dummy(),
        NodeIndex::NONE,
        body_stmt,
    );
    let if_stmt = support::if_stmt(&mut ast, test, vec![body_stmt], vec![]);
    let module = support::module(&mut ast, vec![if_stmt]);

    let (output, diagnostics) = bind(&ast, module);
    assert!(diagnostics.diagnostics.is_empty());

    // `not (x is None)` is true inside the `if` body, meaning `x is None`
    // itself was resolved to false on that path.
    let flow_body = output.side_tables.flow_node_of(body_name).expect("flow recorded in the `if` body");
    assert!(matches!(
        output.flow.get(flow_body),
        starling_binder::FlowNode::FalseCondition { expression, .. } if *expression == test_inner
    ));
}

#[test]
fn isinstance_check_is_treated_as_a_narrowing_expression() {
    let mut ast = NodeArena::new();
    let value = support::name(&mut ast, "x", ExprContext::Load);
    let class = support::name(&mut ast, "Widget", ExprContext::Load);
    let test = support::isinstance_call(&mut ast, value, class);
    let body_name = support::name(&mut ast, "x", ExprContext::Load);
    let body_stmt = ast.alloc(
        starling_ast::SyntaxKind::ExpressionStatement,
        starling_common::Span::dummy(),
        NodeIndex::NONE,
        starling_ast::NodeData::ExpressionStatement(Box::new(
            starling_ast::ExpressionStatementData { value: body_name },
        )),
    );
    let if_stmt = support::if_stmt(&mut ast, test, vec![body_stmt], vec![]);
    let module = support::module(&mut ast, vec![if_stmt]);

    let (output, diagnostics) = bind(&ast, module);
    assert!(diagnostics.diagnostics.is_empty());

    let flow_body = output.side_tables.flow_node_of(body_name).expect("flow recorded in the `if` body");
    assert!(matches!(
        output.flow.get(flow_body),
        starling_binder::FlowNode::TrueCondition { expression, .. } if *expression == test
    ));
}

#[test]
fn a_non_narrowing_test_does_not_wrap_its_branches_in_conditions() {
    let mut ast = NodeArena::new();
    let left = support::name(&mut ast, "a", ExprContext::Load);
    let right = support::name(&mut ast, "b", ExprContext::Load);
    let test = support::compare(&mut ast, left, starling_ast::CmpOp::Lt, right);
    let body_name = support::name(&mut ast, "a", ExprContext::Load);
    let body_stmt = ast.alloc(
        starling_ast::SyntaxKind::ExpressionStatement,
        starling_common::Span::dummy(),
        NodeIndex::NONE,
        starling_ast::NodeData::ExpressionStatement(Box::new(
            starling_ast::ExpressionStatementData { value: body_name },
        )),
    );
    let if_stmt = support::if_stmt(&mut ast, test, vec![body_stmt], vec![]);
    let module = support::module(&mut ast, vec![if_stmt]);

    let (output, diagnostics) = bind(&ast, module);
    assert!(diagnostics.diagnostics.is_empty());

    let flow_body = output.side_tables.flow_node_of(body_name).expect("flow recorded in the `if` body");
    assert!(!matches!(
        output.flow.get(flow_body),
        starling_binder::FlowNode::TrueCondition { .. } | starling_binder::FlowNode::FalseCondition { .. }
    ));
}

#[test]
fn nonlocal_at_module_level_is_a_hard_error() {
    let mut ast = NodeArena::new();
    let nonlocal = support::nonlocal_stmt(&mut ast, &["x"]);
    let module = support::module(&mut ast, vec![nonlocal]);

    let (_output, diagnostics) = bind(&ast, module);
    assert!(diagnostics
        .diagnostics
        .iter()
        .any(|d| d.message.contains("Nonlocal declaration not allowed at module level")));
}

#[test]
fn nonlocal_with_no_enclosing_binding_is_a_hard_error() {
    let mut ast = NodeArena::new();
    let nonlocal = support::nonlocal_stmt(&mut ast, &["counter"]);
    let inner = support::function_def(&mut ast, "bump", vec![], vec![nonlocal]);
    let outer = support::function_def(&mut ast, "make_counter", vec![], vec![inner]);
    let module = support::module(&mut ast, vec![outer]);

    let (_output, diagnostics) = bind(&ast, module);
    assert!(diagnostics
        .diagnostics
        .iter()
        .any(|d| d.message.contains("no binding for nonlocal 'counter' found in an enclosing scope")));
}

#[test]
fn function_scope_carries_the_expected_intrinsic_names() {
    let mut ast = NodeArena::new();
    let function = support::function_def(&mut ast, "f", vec![], vec![]);
    let module = support::module(&mut ast, vec![function]);

    let (output, diagnostics) = bind(&ast, module);
    assert!(diagnostics.diagnostics.is_empty());

    let function_scope = output.side_tables.scope_of(function).expect("function scope recorded");
    for intrinsic in [
        "__doc__",
        "__name__",
        "__qualname__",
        "__module__",
        "__defaults__",
        "__code__",
        "__globals__",
        "__dict__",
        "__closure__",
        "__annotations__",
        "__kwdefaults__",
    ] {
        assert!(
            output.scopes.get(function_scope).lookup(intrinsic).is_some(),
            "missing function intrinsic `{intrinsic}`"
        );
    }
    assert!(output.scopes.get(function_scope).lookup("__class__").is_none());
}

#[test]
fn a_method_also_carries_the_class_intrinsic() {
    let mut ast = NodeArena::new();
    let method = support::function_def(&mut ast, "__init__", vec![], vec![]);
    let class = ast.alloc(
        starling_ast::SyntaxKind::ClassDef,
        starling_common::Span::dummy(),
        NodeIndex::NONE,
        starling_ast::NodeData::ClassDef(Box::new(starling_ast::ClassDefData {
            name: "Widget".into(),
            bases: starling_ast::NodeList::new(),
            keywords: starling_ast::NodeList::new(),
            decorators: starling_ast::NodeList::new(),
            body: vec![method].into_iter().collect(),
        })),
    );
    ast.set_parent(method, class);
    let module = support::module(&mut ast, vec![class]);

    let (output, diagnostics) = bind(&ast, module);
    assert!(diagnostics.diagnostics.is_empty());

    let method_scope = output.side_tables.scope_of(method).expect("method scope recorded");
    assert!(output.scopes.get(method_scope).lookup("__class__").is_some());
}

#[test]
fn return_flow_is_merged_into_the_functions_after_flow_node() {
    let mut ast = NodeArena::new();
    let value = support::name(&mut ast, "x", ExprContext::Load);
    let returned = support::return_stmt(&mut ast, value);
    let function = support::function_def(&mut ast, "f", vec![], vec![returned]);
    let module = support::module(&mut ast, vec![function]);

    let (output, diagnostics) = bind(&ast, module);
    assert!(diagnostics.diagnostics.is_empty());

    assert!(output.side_tables.after_flow_node_of(function).is_some());
}
