//! Common types and utilities shared by the starling static analyzer crates.
//!
//! This crate provides the foundations used by both the AST representation
//! and the binder:
//! - String interning (`Atom`, `Interner`)
//! - Source spans (`Span`, `Spanned`, `SpanBuilder`)
//! - Position/Range types for line/column source locations
//! - The diagnostic sink contract used by the binder's static diagnostics
//! - Shared enums (`LanguageVersion`)

pub mod interner;
pub use interner::{Atom, Interner};

pub mod common;
pub use common::LanguageVersion;

pub mod span;
pub use span::{ByteSpan, Span, SpanBuilder, Spanned};

pub mod position;
pub use position::{LineMap, Location, Position, Range, SourceLocation};

pub mod diagnostics;
pub use diagnostics::{
    Diagnostic, DiagnosticAction, DiagnosticCategory, DiagnosticSink, Severity,
};
