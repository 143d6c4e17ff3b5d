//! Node payload definitions and the arena that owns them.

use starling_common::{Atom, Span};

use crate::node_index::{NodeIndex, NodeList};
use crate::syntax_kind::SyntaxKind;

/// How a `Name`/`Attribute`/`Subscript`/`Tuple`/`List` expression is used:
/// read, assignment target, or `del` target. Mirrors the parser's own
/// classification so the binder never has to re-derive it from the parent
/// node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExprContext {
    Load,
    Store,
    Del,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoolOpKind {
    And,
    Or,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOpKind {
    Not,
    Invert,
    UnaryAdd,
    UnarySub,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinOpKind {
    Add,
    Sub,
    Mult,
    MatMult,
    Div,
    FloorDiv,
    Mod,
    Pow,
    LShift,
    RShift,
    BitOr,
    BitXor,
    BitAnd,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    NotEq,
    Lt,
    LtE,
    Gt,
    GtE,
    Is,
    IsNot,
    In,
    NotIn,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ConstantValue {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(Atom),
    Bytes(Vec<u8>),
    Ellipsis,
}

impl ConstantValue {
    /// Static truthiness used by `If`/`While` reachability pruning (§4.3).
    /// `None` means the value's truthiness can't be determined without
    /// running user code (e.g. a non-empty string's `__bool__` is trivially
    /// true, but we don't evaluate arbitrary containers here).
    #[must_use]
    pub fn static_truthiness(&self) -> Option<bool> {
        match self {
            Self::None => Some(false),
            Self::Bool(b) => Some(*b),
            Self::Int(i) => Some(*i != 0),
            Self::Float(f) => Some(*f != 0.0),
            Self::Str(s) => Some(!s.as_str().is_empty()),
            Self::Bytes(b) => Some(!b.is_empty()),
            Self::Ellipsis => Some(true),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParameterKind {
    Normal,
    VarArgs,
    KwArgs,
}

#[derive(Clone, Debug)]
pub struct ModuleData {
    pub body: NodeList,
}

#[derive(Clone, Debug)]
pub struct FunctionDefData {
    pub name: Atom,
    pub parameters: NodeList,
    pub decorators: NodeList,
    pub return_annotation: NodeIndex,
    pub body: NodeList,
    pub is_async: bool,
}

#[derive(Clone, Debug)]
pub struct LambdaData {
    pub parameters: NodeList,
    pub body: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct ClassDefData {
    pub name: Atom,
    pub bases: NodeList,
    pub keywords: NodeList,
    pub decorators: NodeList,
    pub body: NodeList,
}

#[derive(Clone, Debug)]
pub struct ParameterData {
    pub name: Atom,
    pub annotation: NodeIndex,
    pub default: NodeIndex,
    pub kind: ParameterKind,
    pub is_keyword_only: bool,
    pub is_positional_only: bool,
}

#[derive(Clone, Debug)]
pub struct IfData {
    pub test: NodeIndex,
    pub body: NodeList,
    pub orelse: NodeList,
}

#[derive(Clone, Debug)]
pub struct WhileData {
    pub test: NodeIndex,
    pub body: NodeList,
    pub orelse: NodeList,
}

#[derive(Clone, Debug)]
pub struct ForData {
    pub target: NodeIndex,
    pub iter: NodeIndex,
    pub body: NodeList,
    pub orelse: NodeList,
    pub is_async: bool,
}

#[derive(Clone, Debug)]
pub struct TryData {
    pub body: NodeList,
    pub handlers: NodeList,
    pub orelse: NodeList,
    pub finalbody: NodeList,
}

#[derive(Clone, Debug)]
pub struct ExceptHandlerData {
    pub exception_type: NodeIndex,
    pub name: Option<Atom>,
    pub body: NodeList,
}

#[derive(Clone, Debug)]
pub struct WithData {
    pub items: NodeList,
    pub body: NodeList,
    pub is_async: bool,
}

#[derive(Clone, Debug)]
pub struct WithItemData {
    pub context_expr: NodeIndex,
    pub optional_vars: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct AssignData {
    pub targets: NodeList,
    pub value: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct AugAssignData {
    pub target: NodeIndex,
    pub op: BinOpKind,
    pub value: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct AnnAssignData {
    pub target: NodeIndex,
    pub annotation: NodeIndex,
    pub value: NodeIndex,
    pub simple: bool,
}

#[derive(Clone, Debug)]
pub struct ReturnData {
    pub value: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct DeleteData {
    pub targets: NodeList,
}

#[derive(Clone, Debug)]
pub struct RaiseData {
    pub exc: NodeIndex,
    pub cause: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct GlobalData {
    pub names: Vec<Atom>,
}

#[derive(Clone, Debug)]
pub struct NonlocalData {
    pub names: Vec<Atom>,
}

#[derive(Clone, Debug)]
pub struct ImportAliasData {
    /// The full dotted path, e.g. `"a.b.c"` for `import a.b.c`.
    pub dotted_name: Atom,
    pub asname: Option<Atom>,
}

#[derive(Clone, Debug)]
pub struct ImportData {
    pub names: NodeList,
}

#[derive(Clone, Debug)]
pub struct ImportFromData {
    pub module: Option<Atom>,
    pub names: NodeList,
    pub level: u32,
    pub is_wildcard: bool,
}

#[derive(Clone, Debug)]
pub struct ExpressionStatementData {
    pub value: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct AssertData {
    pub test: NodeIndex,
    pub message: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct NameData {
    pub id: Atom,
    pub ctx: ExprContext,
}

#[derive(Clone, Debug)]
pub struct AttributeData {
    pub value: NodeIndex,
    pub attr: Atom,
    pub ctx: ExprContext,
}

#[derive(Clone, Debug)]
pub struct SubscriptData {
    pub value: NodeIndex,
    pub slice: NodeIndex,
    pub ctx: ExprContext,
}

#[derive(Clone, Debug)]
pub struct SliceData {
    pub lower: NodeIndex,
    pub upper: NodeIndex,
    pub step: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct CallData {
    pub func: NodeIndex,
    pub args: NodeList,
    pub keywords: NodeList,
}

#[derive(Clone, Debug)]
pub struct KeywordData {
    pub arg: Option<Atom>,
    pub value: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct BoolOpData {
    pub op: BoolOpKind,
    pub values: NodeList,
}

#[derive(Clone, Debug)]
pub struct UnaryOpData {
    pub op: UnaryOpKind,
    pub operand: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct BinOpData {
    pub left: NodeIndex,
    pub op: BinOpKind,
    pub right: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct CompareData {
    pub left: NodeIndex,
    pub ops: Vec<CmpOp>,
    pub comparators: NodeList,
}

#[derive(Clone, Debug)]
pub struct IfExpData {
    pub test: NodeIndex,
    pub body: NodeIndex,
    pub orelse: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct NamedExprData {
    pub target: NodeIndex,
    pub value: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct YieldData {
    pub value: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct YieldFromData {
    pub value: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct AwaitData {
    pub value: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct StarredData {
    pub value: NodeIndex,
    pub ctx: ExprContext,
}

#[derive(Clone, Debug)]
pub struct SequenceDisplayData {
    pub elements: NodeList,
    pub ctx: ExprContext,
}

#[derive(Clone, Debug)]
pub struct DictDisplayData {
    /// A `None` key (an absent entry in this slot) marks a `**expr` unpack.
    pub keys: Vec<NodeIndex>,
    pub values: NodeList,
}

#[derive(Clone, Debug)]
pub struct ComprehensionDisplayData {
    /// The element expression (`ListComp`/`SetComp`/`GeneratorExp`).
    pub element: NodeIndex,
    pub generators: NodeList,
}

#[derive(Clone, Debug)]
pub struct DictCompData {
    pub key: NodeIndex,
    pub value: NodeIndex,
    pub generators: NodeList,
}

#[derive(Clone, Debug)]
pub struct ComprehensionData {
    pub target: NodeIndex,
    pub iter: NodeIndex,
    pub ifs: NodeList,
    pub is_async: bool,
}

#[derive(Clone, Debug)]
pub struct ConstantData {
    pub value: ConstantValue,
}

#[derive(Clone, Debug)]
pub struct JoinedStrData {
    pub values: NodeList,
}

#[derive(Clone, Debug)]
pub struct FormattedValueData {
    pub value: NodeIndex,
    pub format_spec: NodeIndex,
}

/// Kind-specific payload. Boxed on the large variants so `NodeRecord` stays
/// small regardless of which syntax forms a module happens to use most.
#[derive(Clone, Debug)]
pub enum NodeData {
    Module(Box<ModuleData>),
    FunctionDef(Box<FunctionDefData>),
    Lambda(Box<LambdaData>),
    ClassDef(Box<ClassDefData>),
    Parameter(Box<ParameterData>),
    If(Box<IfData>),
    While(Box<WhileData>),
    For(Box<ForData>),
    Try(Box<TryData>),
    ExceptHandler(Box<ExceptHandlerData>),
    With(Box<WithData>),
    WithItem(Box<WithItemData>),
    Assign(Box<AssignData>),
    AugAssign(Box<AugAssignData>),
    AnnAssign(Box<AnnAssignData>),
    Return(Box<ReturnData>),
    Delete(Box<DeleteData>),
    Raise(Box<RaiseData>),
    Global(Box<GlobalData>),
    Nonlocal(Box<NonlocalData>),
    Import(Box<ImportData>),
    ImportFrom(Box<ImportFromData>),
    ImportAlias(Box<ImportAliasData>),
    ExpressionStatement(Box<ExpressionStatementData>),
    Pass,
    Break,
    Continue,
    Assert(Box<AssertData>),
    Name(Box<NameData>),
    Attribute(Box<AttributeData>),
    Subscript(Box<SubscriptData>),
    Slice(Box<SliceData>),
    Call(Box<CallData>),
    Keyword(Box<KeywordData>),
    BoolOp(Box<BoolOpData>),
    UnaryOp(Box<UnaryOpData>),
    BinOp(Box<BinOpData>),
    Compare(Box<CompareData>),
    IfExp(Box<IfExpData>),
    NamedExpr(Box<NamedExprData>),
    Yield(Box<YieldData>),
    YieldFrom(Box<YieldFromData>),
    Await(Box<AwaitData>),
    Starred(Box<StarredData>),
    Sequence(Box<SequenceDisplayData>),
    Dict(Box<DictDisplayData>),
    Comprehension(Box<ComprehensionDisplayData>),
    DictComp(Box<DictCompData>),
    ComprehensionClause(Box<ComprehensionData>),
    Constant(Box<ConstantData>),
    JoinedStr(Box<JoinedStrData>),
    FormattedValue(Box<FormattedValueData>),
}

/// A node's kind, span, and parent pointer, independent of its payload.
/// Returned by [`NodeArena::get_extended`] for upward-navigation walks that
/// don't care which concrete syntax form they're passing through.
#[derive(Clone, Copy, Debug)]
pub struct ExtendedNode {
    pub kind: SyntaxKind,
    pub span: Span,
    pub parent: NodeIndex,
}

struct NodeRecord {
    kind: SyntaxKind,
    span: Span,
    parent: NodeIndex,
    data: NodeData,
}

/// Owns every node of one module's syntax tree. Indices are stable for the
/// arena's lifetime; nodes are never removed or mutated once allocated
/// (matching the syntax tree's immutability — see the data model notes).
#[derive(Default)]
pub struct NodeArena {
    records: Vec<NodeRecord>,
}

macro_rules! typed_accessor {
    ($get:ident, $get_mut:ident, $variant:ident, $data:ty) => {
        #[must_use]
        pub fn $get(&self, index: NodeIndex) -> &$data {
            match &self.records[index.index()].data {
                NodeData::$variant(data) => data,
                other => panic!(
                    "node {} is {:?}, not {}",
                    index.index(),
                    other,
                    stringify!($variant)
                ),
            }
        }

        #[must_use]
        pub fn $get_mut(&mut self, index: NodeIndex) -> &mut $data {
            match &mut self.records[index.index()].data {
                NodeData::$variant(data) => data,
                other => panic!(
                    "node {} is {:?}, not {}",
                    index.index(),
                    other,
                    stringify!($variant)
                ),
            }
        }
    };
}

impl NodeArena {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc(&mut self, kind: SyntaxKind, span: Span, parent: NodeIndex, data: NodeData) -> NodeIndex {
        let index = NodeIndex::new(self.records.len());
        self.records.push(NodeRecord {
            kind,
            span,
            parent,
            data,
        });
        index
    }

    /// Back-patch a child's parent pointer once the owning node has been
    /// allocated. Children are always built before their parent, so the
    /// parent index isn't known at the child's `alloc` call site.
    pub fn set_parent(&mut self, child: NodeIndex, parent: NodeIndex) {
        if child.is_some() {
            self.records[child.index()].parent = parent;
        }
    }

    pub fn set_parent_all(&mut self, children: &NodeList, parent: NodeIndex) {
        for child in children {
            self.set_parent(child, parent);
        }
    }

    #[must_use]
    pub fn kind_of(&self, index: NodeIndex) -> SyntaxKind {
        self.records[index.index()].kind
    }

    #[must_use]
    pub fn span_of(&self, index: NodeIndex) -> Span {
        self.records[index.index()].span
    }

    #[must_use]
    pub fn parent_of(&self, index: NodeIndex) -> NodeIndex {
        self.records[index.index()].parent
    }

    #[must_use]
    pub fn get_extended(&self, index: NodeIndex) -> ExtendedNode {
        let record = &self.records[index.index()];
        ExtendedNode {
            kind: record.kind,
            span: record.span,
            parent: record.parent,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    typed_accessor!(get_module, get_module_mut, Module, ModuleData);
    typed_accessor!(get_function, get_function_mut, FunctionDef, FunctionDefData);
    typed_accessor!(get_lambda, get_lambda_mut, Lambda, LambdaData);
    typed_accessor!(get_class, get_class_mut, ClassDef, ClassDefData);
    typed_accessor!(get_parameter, get_parameter_mut, Parameter, ParameterData);
    typed_accessor!(get_if, get_if_mut, If, IfData);
    typed_accessor!(get_while, get_while_mut, While, WhileData);
    typed_accessor!(get_for, get_for_mut, For, ForData);
    typed_accessor!(get_try, get_try_mut, Try, TryData);
    typed_accessor!(
        get_except_handler,
        get_except_handler_mut,
        ExceptHandler,
        ExceptHandlerData
    );
    typed_accessor!(get_with, get_with_mut, With, WithData);
    typed_accessor!(get_with_item, get_with_item_mut, WithItem, WithItemData);
    typed_accessor!(get_assign, get_assign_mut, Assign, AssignData);
    typed_accessor!(get_aug_assign, get_aug_assign_mut, AugAssign, AugAssignData);
    typed_accessor!(get_ann_assign, get_ann_assign_mut, AnnAssign, AnnAssignData);
    typed_accessor!(get_return, get_return_mut, Return, ReturnData);
    typed_accessor!(get_delete, get_delete_mut, Delete, DeleteData);
    typed_accessor!(get_raise, get_raise_mut, Raise, RaiseData);
    typed_accessor!(get_global, get_global_mut, Global, GlobalData);
    typed_accessor!(get_nonlocal, get_nonlocal_mut, Nonlocal, NonlocalData);
    typed_accessor!(get_import, get_import_mut, Import, ImportData);
    typed_accessor!(get_import_from, get_import_from_mut, ImportFrom, ImportFromData);
    typed_accessor!(
        get_import_alias,
        get_import_alias_mut,
        ImportAlias,
        ImportAliasData
    );
    typed_accessor!(
        get_expression_statement,
        get_expression_statement_mut,
        ExpressionStatement,
        ExpressionStatementData
    );
    typed_accessor!(get_assert, get_assert_mut, Assert, AssertData);
    typed_accessor!(get_name, get_name_mut, Name, NameData);
    typed_accessor!(get_attribute, get_attribute_mut, Attribute, AttributeData);
    typed_accessor!(get_subscript, get_subscript_mut, Subscript, SubscriptData);
    typed_accessor!(get_slice, get_slice_mut, Slice, SliceData);
    typed_accessor!(get_call, get_call_mut, Call, CallData);
    typed_accessor!(get_keyword, get_keyword_mut, Keyword, KeywordData);
    typed_accessor!(get_bool_op, get_bool_op_mut, BoolOp, BoolOpData);
    typed_accessor!(get_unary_op, get_unary_op_mut, UnaryOp, UnaryOpData);
    typed_accessor!(get_bin_op, get_bin_op_mut, BinOp, BinOpData);
    typed_accessor!(get_compare, get_compare_mut, Compare, CompareData);
    typed_accessor!(get_if_exp, get_if_exp_mut, IfExp, IfExpData);
    typed_accessor!(get_named_expr, get_named_expr_mut, NamedExpr, NamedExprData);
    typed_accessor!(get_yield, get_yield_mut, Yield, YieldData);
    typed_accessor!(get_yield_from, get_yield_from_mut, YieldFrom, YieldFromData);
    typed_accessor!(get_await, get_await_mut, Await, AwaitData);
    typed_accessor!(get_starred, get_starred_mut, Starred, StarredData);
    typed_accessor!(get_sequence, get_sequence_mut, Sequence, SequenceDisplayData);
    typed_accessor!(get_dict, get_dict_mut, Dict, DictDisplayData);
    typed_accessor!(
        get_comprehension_display,
        get_comprehension_display_mut,
        Comprehension,
        ComprehensionDisplayData
    );
    typed_accessor!(get_dict_comp, get_dict_comp_mut, DictComp, DictCompData);
    typed_accessor!(
        get_comprehension_clause,
        get_comprehension_clause_mut,
        ComprehensionClause,
        ComprehensionData
    );
    typed_accessor!(get_constant, get_constant_mut, Constant, ConstantData);
    typed_accessor!(get_joined_str, get_joined_str_mut, JoinedStr, JoinedStrData);
    typed_accessor!(
        get_formatted_value,
        get_formatted_value_mut,
        FormattedValue,
        FormattedValueData
    );
}
