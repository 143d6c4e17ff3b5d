//! Fatal, internal-invariant-violation errors (§7 kind 3).
//!
//! Everything a user caused (misplaced `yield`, a bad `nonlocal`, …) goes
//! through the [`starling_common::DiagnosticSink`] instead and never reaches
//! this type — `BinderError` is reserved for programmer-error guards that
//! should abort binding the module outright.

use starling_ast::NodeIndex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BinderError {
    /// A scope was entered a second time without the matching exit running
    /// first, or a scope-stack pop found the wrong frame on top.
    ScopeStackCorrupted,
    /// A node expected to carry a scope/declaration/flow annotation had none
    /// recorded by the time a later pass asked for it.
    MissingAnnotation(NodeIndex),
    /// The host cancelled binding mid-pass.
    Cancelled,
}

impl std::fmt::Display for BinderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ScopeStackCorrupted => {
                write!(f, "scope enter/exit protocol violated")
            }
            Self::MissingAnnotation(node) => {
                write!(f, "no binder annotation recorded for node {}", node.index())
            }
            Self::Cancelled => write!(f, "binding was cancelled"),
        }
    }
}

impl std::error::Error for BinderError {}

pub type BinderResult<T> = Result<T, BinderError>;
