//! Shared AST-building helpers for the binder's integration tests. Included
//! by `#[path]` into each test binary rather than published as its own crate.

#![allow(dead_code)]

use starling_ast::{
    AnnAssignData, AssignData, AttributeData, AwaitData, BoolOpData, BoolOpKind, CallData,
    CmpOp, CompareData, ComprehensionData, ComprehensionDisplayData, ConstantData, ConstantValue,
    ExceptHandlerData, ExprContext, ForData, FunctionDefData, GlobalData, IfData, ImportAliasData,
    ImportData, ImportFromData, LambdaData, ModuleData, NameData, NamedExprData, NodeArena,
    NodeData, NodeIndex, NodeList, NonlocalData, ParameterData, ParameterKind, RaiseData,
    ReturnData, SyntaxKind, TryData, UnaryOpData, UnaryOpKind, WhileData, YieldData,
    YieldFromData,
};
use starling_common::Span;

pub fn name(arena: &mut NodeArena, id: &str, ctx: ExprContext) -> NodeIndex {
    arena.alloc(
        SyntaxKind::Name,
        Span::dummy(),
        NodeIndex::NONE,
        NodeData::Name(Box::new(NameData { id: id.into(), ctx })),
    )
}

pub fn attribute(arena: &mut NodeArena, value: NodeIndex, attr: &str, ctx: ExprContext) -> NodeIndex {
    let node = arena.alloc(
        SyntaxKind::Attribute,
        Span::dummy(),
        NodeIndex::NONE,
        NodeData::Attribute(Box::new(AttributeData {
            value,
            attr: attr.into(),
            ctx,
        })),
    );
    arena.set_parent(value, node);
    node
}

pub fn call(arena: &mut NodeArena, func: NodeIndex, args: Vec<NodeIndex>) -> NodeIndex {
    let args: NodeList = args.into_iter().collect();
    let node = arena.alloc(
        SyntaxKind::Call,
        Span::dummy(),
        NodeIndex::NONE,
        NodeData::Call(Box::new(CallData {
            func,
            args: args.clone(),
            keywords: NodeList::new(),
        })),
    );
    arena.set_parent(func, node);
    arena.set_parent_all(&args, node);
    node
}

pub fn assign(arena: &mut NodeArena, target: NodeIndex, value: NodeIndex) -> NodeIndex {
    let targets: NodeList = vec![target].into_iter().collect();
    let node = arena.alloc(
        SyntaxKind::Assign,
        Span::dummy(),
        NodeIndex::NONE,
        NodeData::Assign(Box::new(AssignData { targets: targets.clone(), value })),
    );
    arena.set_parent_all(&targets, node);
    arena.set_parent(value, node);
    node
}

pub fn ann_assign(arena: &mut NodeArena, target: NodeIndex, annotation: NodeIndex, value: NodeIndex) -> NodeIndex {
    let node = arena.alloc(
        SyntaxKind::AnnAssign,
        Span::dummy(),
        NodeIndex::NONE,
        NodeData::AnnAssign(Box::new(AnnAssignData {
            target,
            annotation,
            value,
            simple: true,
        })),
    );
    arena.set_parent(target, node);
    arena.set_parent(annotation, node);
    if value.is_some() {
        arena.set_parent(value, node);
    }
    node
}

pub fn parameter(arena: &mut NodeArena, name: &str) -> NodeIndex {
    arena.alloc(
        SyntaxKind::Parameter,
        Span::dummy(),
        NodeIndex::NONE,
        NodeData::Parameter(Box::new(ParameterData {
            name: name.into(),
            annotation: NodeIndex::NONE,
            default: NodeIndex::NONE,
            kind: ParameterKind::Normal,
            is_keyword_only: false,
            is_positional_only: false,
        })),
    )
}

pub fn function_def(arena: &mut NodeArena, fn_name: &str, parameters: Vec<NodeIndex>, body: Vec<NodeIndex>) -> NodeIndex {
    let parameters: NodeList = parameters.into_iter().collect();
    let body: NodeList = body.into_iter().collect();
    let node = arena.alloc(
        SyntaxKind::FunctionDef,
        Span::dummy(),
        NodeIndex::NONE,
        NodeData::FunctionDef(Box::new(FunctionDefData {
            name: fn_name.into(),
            parameters: parameters.clone(),
            decorators: NodeList::new(),
            return_annotation: NodeIndex::NONE,
            body: body.clone(),
            is_async: false,
        })),
    );
    arena.set_parent_all(&parameters, node);
    arena.set_parent_all(&body, node);
    node
}

pub fn decorated_function_def(
    arena: &mut NodeArena,
    fn_name: &str,
    decorators: Vec<NodeIndex>,
    parameters: Vec<NodeIndex>,
    body: Vec<NodeIndex>,
) -> NodeIndex {
    let decorators: NodeList = decorators.into_iter().collect();
    let parameters: NodeList = parameters.into_iter().collect();
    let body: NodeList = body.into_iter().collect();
    let node = arena.alloc(
        SyntaxKind::FunctionDef,
        Span::dummy(),
        NodeIndex::NONE,
        NodeData::FunctionDef(Box::new(FunctionDefData {
            name: fn_name.into(),
            parameters: parameters.clone(),
            decorators: decorators.clone(),
            return_annotation: NodeIndex::NONE,
            body: body.clone(),
            is_async: false,
        })),
    );
    arena.set_parent_all(&decorators, node);
    arena.set_parent_all(&parameters, node);
    arena.set_parent_all(&body, node);
    node
}

pub fn async_function_def(arena: &mut NodeArena, fn_name: &str, parameters: Vec<NodeIndex>, body: Vec<NodeIndex>) -> NodeIndex {
    let parameters: NodeList = parameters.into_iter().collect();
    let body: NodeList = body.into_iter().collect();
    let node = arena.alloc(
        SyntaxKind::FunctionDef,
        Span::dummy(),
        NodeIndex::NONE,
        NodeData::FunctionDef(Box::new(FunctionDefData {
            name: fn_name.into(),
            parameters: parameters.clone(),
            decorators: NodeList::new(),
            return_annotation: NodeIndex::NONE,
            body: body.clone(),
            is_async: true,
        })),
    );
    arena.set_parent_all(&parameters, node);
    arena.set_parent_all(&body, node);
    node
}

pub fn await_expr(arena: &mut NodeArena, value: NodeIndex) -> NodeIndex {
    let node = arena.alloc(
        SyntaxKind::Await,
        Span::dummy(),
        NodeIndex::NONE,
        NodeData::Await(Box::new(AwaitData { value })),
    );
    arena.set_parent(value, node);
    node
}

pub fn yield_from_expr(arena: &mut NodeArena, value: NodeIndex) -> NodeIndex {
    let node = arena.alloc(
        SyntaxKind::YieldFrom,
        Span::dummy(),
        NodeIndex::NONE,
        NodeData::YieldFrom(Box::new(YieldFromData { value })),
    );
    arena.set_parent(value, node);
    node
}

pub fn lambda(arena: &mut NodeArena, parameters: Vec<NodeIndex>, body: NodeIndex) -> NodeIndex {
    let parameters: NodeList = parameters.into_iter().collect();
    let node = arena.alloc(
        SyntaxKind::Lambda,
        Span::dummy(),
        NodeIndex::NONE,
        NodeData::Lambda(Box::new(LambdaData {
            parameters: parameters.clone(),
            body,
        })),
    );
    arena.set_parent_all(&parameters, node);
    arena.set_parent(body, node);
    node
}

pub fn return_stmt(arena: &mut NodeArena, value: NodeIndex) -> NodeIndex {
    arena.alloc(
        SyntaxKind::Return,
        Span::dummy(),
        NodeIndex::NONE,
        NodeData::Return(Box::new(ReturnData { value })),
    )
}

pub fn yield_expr(arena: &mut NodeArena, value: NodeIndex) -> NodeIndex {
    arena.alloc(
        SyntaxKind::Yield,
        Span::dummy(),
        NodeIndex::NONE,
        NodeData::Yield(Box::new(YieldData { value })),
    )
}

pub fn raise_stmt(arena: &mut NodeArena, exc: NodeIndex) -> NodeIndex {
    let node = arena.alloc(
        SyntaxKind::Raise,
        Span::dummy(),
        NodeIndex::NONE,
        NodeData::Raise(Box::new(RaiseData { exc, cause: NodeIndex::NONE })),
    );
    if exc.is_some() {
        arena.set_parent(exc, node);
    }
    node
}

pub fn if_stmt(arena: &mut NodeArena, test: NodeIndex, body: Vec<NodeIndex>, orelse: Vec<NodeIndex>) -> NodeIndex {
    let body: NodeList = body.into_iter().collect();
    let orelse: NodeList = orelse.into_iter().collect();
    let node = arena.alloc(
        SyntaxKind::If,
        Span::dummy(),
        NodeIndex::NONE,
        NodeData::If(Box::new(IfData { test, body: body.clone(), orelse: orelse.clone() })),
    );
    arena.set_parent(test, node);
    arena.set_parent_all(&body, node);
    arena.set_parent_all(&orelse, node);
    node
}

pub fn while_stmt(arena: &mut NodeArena, test: NodeIndex, body: Vec<NodeIndex>) -> NodeIndex {
    let body: NodeList = body.into_iter().collect();
    let node = arena.alloc(
        SyntaxKind::While,
        Span::dummy(),
        NodeIndex::NONE,
        NodeData::While(Box::new(WhileData {
            test,
            body: body.clone(),
            orelse: NodeList::new(),
        })),
    );
    arena.set_parent(test, node);
    arena.set_parent_all(&body, node);
    node
}

pub fn for_stmt(arena: &mut NodeArena, target: NodeIndex, iter: NodeIndex, body: Vec<NodeIndex>) -> NodeIndex {
    let body: NodeList = body.into_iter().collect();
    let node = arena.alloc(
        SyntaxKind::For,
        Span::dummy(),
        NodeIndex::NONE,
        NodeData::For(Box::new(ForData {
            target,
            iter,
            body: body.clone(),
            orelse: NodeList::new(),
            is_async: false,
        })),
    );
    arena.set_parent(target, node);
    arena.set_parent(iter, node);
    arena.set_parent_all(&body, node);
    node
}

pub fn try_stmt(
    arena: &mut NodeArena,
    body: Vec<NodeIndex>,
    handlers: Vec<NodeIndex>,
    finalbody: Vec<NodeIndex>,
) -> NodeIndex {
    let body: NodeList = body.into_iter().collect();
    let handlers: NodeList = handlers.into_iter().collect();
    let finalbody: NodeList = finalbody.into_iter().collect();
    let node = arena.alloc(
        SyntaxKind::Try,
        Span::dummy(),
        NodeIndex::NONE,
        NodeData::Try(Box::new(TryData {
            body: body.clone(),
            handlers: handlers.clone(),
            orelse: NodeList::new(),
            finalbody: finalbody.clone(),
        })),
    );
    arena.set_parent_all(&body, node);
    arena.set_parent_all(&handlers, node);
    arena.set_parent_all(&finalbody, node);
    node
}

pub fn except_handler(arena: &mut NodeArena, name: Option<&str>, body: Vec<NodeIndex>) -> NodeIndex {
    let body: NodeList = body.into_iter().collect();
    let node = arena.alloc(
        SyntaxKind::ExceptHandler,
        Span::dummy(),
        NodeIndex::NONE,
        NodeData::ExceptHandler(Box::new(ExceptHandlerData {
            exception_type: NodeIndex::NONE,
            name: name.map(Into::into),
            body: body.clone(),
        })),
    );
    arena.set_parent_all(&body, node);
    node
}

pub fn global_stmt(arena: &mut NodeArena, names: &[&str]) -> NodeIndex {
    arena.alloc(
        SyntaxKind::Global,
        Span::dummy(),
        NodeIndex::NONE,
        NodeData::Global(Box::new(GlobalData {
            names: names.iter().map(|n| (*n).into()).collect(),
        })),
    )
}

pub fn nonlocal_stmt(arena: &mut NodeArena, names: &[&str]) -> NodeIndex {
    arena.alloc(
        SyntaxKind::Nonlocal,
        Span::dummy(),
        NodeIndex::NONE,
        NodeData::Nonlocal(Box::new(NonlocalData {
            names: names.iter().map(|n| (*n).into()).collect(),
        })),
    )
}

pub fn import_alias(arena: &mut NodeArena, dotted_name: &str, asname: Option<&str>) -> NodeIndex {
    arena.alloc(
        SyntaxKind::ImportAlias,
        Span::dummy(),
        NodeIndex::NONE,
        NodeData::ImportAlias(Box::new(ImportAliasData {
            dotted_name: dotted_name.into(),
            asname: asname.map(Into::into),
        })),
    )
}

pub fn import_stmt(arena: &mut NodeArena, aliases: Vec<NodeIndex>) -> NodeIndex {
    let names: NodeList = aliases.into_iter().collect();
    let node = arena.alloc(
        SyntaxKind::Import,
        Span::dummy(),
        NodeIndex::NONE,
        NodeData::Import(Box::new(ImportData { names: names.clone() })),
    );
    arena.set_parent_all(&names, node);
    node
}

pub fn import_from_stmt(
    arena: &mut NodeArena,
    module: Option<&str>,
    level: u32,
    aliases: Vec<NodeIndex>,
    is_wildcard: bool,
) -> NodeIndex {
    let names: NodeList = aliases.into_iter().collect();
    let node = arena.alloc(
        SyntaxKind::ImportFrom,
        Span::dummy(),
        NodeIndex::NONE,
        NodeData::ImportFrom(Box::new(ImportFromData {
            module: module.map(Into::into),
            names: names.clone(),
            level,
            is_wildcard,
        })),
    );
    arena.set_parent_all(&names, node);
    node
}

pub fn named_expr(arena: &mut NodeArena, target: NodeIndex, value: NodeIndex) -> NodeIndex {
    let node = arena.alloc(
        SyntaxKind::NamedExpr,
        Span::dummy(),
        NodeIndex::NONE,
        NodeData::NamedExpr(Box::new(NamedExprData { target, value })),
    );
    arena.set_parent(target, node);
    arena.set_parent(value, node);
    node
}

pub fn comprehension_clause(arena: &mut NodeArena, target: NodeIndex, iter: NodeIndex) -> NodeIndex {
    let node = arena.alloc(
        SyntaxKind::ComprehensionClause,
        Span::dummy(),
        NodeIndex::NONE,
        NodeData::ComprehensionClause(Box::new(ComprehensionData {
            target,
            iter,
            ifs: NodeList::new(),
            is_async: false,
        })),
    );
    arena.set_parent(target, node);
    arena.set_parent(iter, node);
    node
}

pub fn list_comp(arena: &mut NodeArena, element: NodeIndex, generators: Vec<NodeIndex>) -> NodeIndex {
    let generators: NodeList = generators.into_iter().collect();
    let node = arena.alloc(
        SyntaxKind::Comprehension,
        Span::dummy(),
        NodeIndex::NONE,
        NodeData::Comprehension(Box::new(ComprehensionDisplayData {
            element,
            generators: generators.clone(),
        })),
    );
    arena.set_parent(element, node);
    arena.set_parent_all(&generators, node);
    node
}

pub fn constant_none(arena: &mut NodeArena) -> NodeIndex {
    arena.alloc(
        SyntaxKind::Constant,
        Span::dummy(),
        NodeIndex::NONE,
        NodeData::Constant(Box::new(ConstantData { value: ConstantValue::None })),
    )
}

pub fn bool_op(arena: &mut NodeArena, op: BoolOpKind, values: Vec<NodeIndex>) -> NodeIndex {
    let values: NodeList = values.into_iter().collect();
    let node = arena.alloc(
        SyntaxKind::BoolOp,
        Span::dummy(),
        NodeIndex::NONE,
        NodeData::BoolOp(Box::new(BoolOpData { op, values: values.clone() })),
    );
    arena.set_parent_all(&values, node);
    node
}

pub fn unary_not(arena: &mut NodeArena, operand: NodeIndex) -> NodeIndex {
    let node = arena.alloc(
        SyntaxKind::UnaryOp,
        Span::dummy(),
        NodeIndex::NONE,
        NodeData::UnaryOp(Box::new(UnaryOpData { op: UnaryOpKind::Not, operand })),
    );
    arena.set_parent(operand, node);
    node
}

pub fn compare(arena: &mut NodeArena, left: NodeIndex, op: CmpOp, right: NodeIndex) -> NodeIndex {
    let comparators: NodeList = vec![right].into_iter().collect();
    let node = arena.alloc(
        SyntaxKind::Compare,
        Span::dummy(),
        NodeIndex::NONE,
        NodeData::Compare(Box::new(CompareData {
            left,
            ops: vec![op],
            comparators: comparators.clone(),
        })),
    );
    arena.set_parent(left, node);
    arena.set_parent_all(&comparators, node);
    node
}

pub fn isinstance_call(arena: &mut NodeArena, value: NodeIndex, class: NodeIndex) -> NodeIndex {
    let func = name(arena, "isinstance", ExprContext::Load);
    call(arena, func, vec![value, class])
}

pub fn module(arena: &mut NodeArena, body: Vec<NodeIndex>) -> NodeIndex {
    let body: NodeList = body.into_iter().collect();
    let node = arena.alloc(
        SyntaxKind::Module,
        Span::dummy(),
        NodeIndex::NONE,
        NodeData::Module(Box::new(ModuleData { body: body.clone() })),
    );
    arena.set_parent_all(&body, node);
    node
}
