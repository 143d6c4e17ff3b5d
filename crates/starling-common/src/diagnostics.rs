//! Diagnostic sink contract.
//!
//! The binder never decides how diagnostics are rendered or transported —
//! it only ever calls into a [`DiagnosticSink`] supplied by the host. This
//! mirrors the binder's "never throw, always report" error policy: every
//! user-facing problem is appended here and binding continues.

use crate::Span;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Information,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DiagnosticCategory {
    Error,
    Warning,
    UnusedCode,
    Information,
}

/// A quick-fix action descriptor a diagnostic can carry (e.g. "create a type
/// stub for this unresolved import"). Opaque to the binder; the host
/// interprets `kind`/`data`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiagnosticAction {
    pub kind: String,
    pub data: String,
}

impl DiagnosticAction {
    #[must_use]
    pub fn new(kind: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            data: data.into(),
        }
    }
}

/// A single diagnostic produced while binding a module.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub category: DiagnosticCategory,
    pub range: Span,
    pub message: String,
    pub rule: Option<String>,
    pub actions: Vec<DiagnosticAction>,
}

impl Diagnostic {
    #[must_use]
    pub fn new(category: DiagnosticCategory, range: Span, message: impl Into<String>) -> Self {
        Self {
            category,
            range,
            message: message.into(),
            rule: None,
            actions: Vec::new(),
        }
    }

    pub fn set_rule(&mut self, name: impl Into<String>) -> &mut Self {
        self.rule = Some(name.into());
        self
    }

    pub fn add_action(&mut self, action: DiagnosticAction) -> &mut Self {
        self.actions.push(action);
        self
    }
}

/// The binder's external collaborator for reporting problems. Implemented by
/// the host (the language-server façade, a CLI diagnostic reporter, or — in
/// tests — a plain `Vec<Diagnostic>` collector).
///
/// Diagnostics are returned by *index* into the sink rather than by
/// reference: sinks are free to buffer, sort, or deduplicate internally.
pub trait DiagnosticSink {
    /// Append a diagnostic and return a handle usable to refine it
    /// (`set_rule`, `add_action`) after the fact.
    fn add(&mut self, diagnostic: Diagnostic) -> usize;

    fn add_error(&mut self, range: Span, message: impl Into<String>) -> usize {
        self.add(Diagnostic::new(DiagnosticCategory::Error, range, message))
    }

    fn add_warning(&mut self, range: Span, message: impl Into<String>) -> usize {
        self.add(Diagnostic::new(DiagnosticCategory::Warning, range, message))
    }

    fn add_unused_code(&mut self, range: Span, message: impl Into<String>) -> usize {
        self.add(Diagnostic::new(
            DiagnosticCategory::UnusedCode,
            range,
            message,
        ))
    }

    fn add_diagnostic(
        &mut self,
        severity: Severity,
        rule: &str,
        range: Span,
        message: impl Into<String>,
    ) -> usize {
        let category = match severity {
            Severity::Error => DiagnosticCategory::Error,
            Severity::Warning => DiagnosticCategory::Warning,
            Severity::Information => DiagnosticCategory::Information,
        };
        let mut diagnostic = Diagnostic::new(category, range, message);
        diagnostic.set_rule(rule);
        self.add(diagnostic)
    }

    /// Mutably access a previously added diagnostic by the handle returned
    /// from `add`/`add_error`/etc., so callers can attach a rule or action
    /// once more context is known.
    fn get_mut(&mut self, handle: usize) -> Option<&mut Diagnostic>;
}

/// Simple in-memory sink used by tests and by hosts that just want the
/// final list of diagnostics (no incremental transport).
#[derive(Default, Debug, Clone)]
pub struct VecDiagnosticSink {
    pub diagnostics: Vec<Diagnostic>,
}

impl VecDiagnosticSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl DiagnosticSink for VecDiagnosticSink {
    fn add(&mut self, diagnostic: Diagnostic) -> usize {
        self.diagnostics.push(diagnostic);
        self.diagnostics.len() - 1
    }

    fn get_mut(&mut self, handle: usize) -> Option<&mut Diagnostic> {
        self.diagnostics.get_mut(handle)
    }
}
