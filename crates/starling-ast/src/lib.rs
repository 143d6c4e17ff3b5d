//! Arena-allocated syntax tree for a dynamically-typed, indentation-structured
//! language.
//!
//! Mirrors the shape a recursive-descent parser would hand to a binder: one
//! flat [`NodeArena`] per module, nodes referenced by [`NodeIndex`] rather
//! than by pointer so the tree is immutable and trivially `Send` once built.

mod node;
mod node_index;
mod syntax_kind;

pub use node::{
    AnnAssignData, AssertData, AssignData, AttributeData, AugAssignData, AwaitData, BinOpData,
    BinOpKind, BoolOpData, BoolOpKind, CallData, ClassDefData, CmpOp, CompareData,
    ComprehensionData, ComprehensionDisplayData, ConstantData, ConstantValue, DeleteData,
    DictCompData, DictDisplayData, ExceptHandlerData, ExprContext, ExpressionStatementData,
    ExtendedNode, ForData, FormattedValueData, FunctionDefData, GlobalData, IfData, IfExpData,
    ImportAliasData, ImportData, ImportFromData, JoinedStrData, KeywordData, LambdaData,
    NamedExprData, NameData, NodeArena, NodeData, NonlocalData, ParameterData, ParameterKind,
    RaiseData, ReturnData, SequenceDisplayData, SliceData, StarredData, SubscriptData, TryData,
    UnaryOpData, UnaryOpKind, WhileData, WithData, WithItemData, YieldData, YieldFromData,
    ModuleData,
};
pub use node_index::{NodeIndex, NodeList};
pub use syntax_kind::SyntaxKind;
