//! Rule names for the "rule-based diagnostics" kind in §4.6, plus the
//! host-supplied severity table that controls how they're reported.

use rustc_hash::FxHashMap;
use starling_common::Severity;

pub const UNRESOLVED_IMPORT: &str = "unresolved-import";

/// Host-supplied per-rule severity overrides (§6 `file_info.diagnosticSettings`).
/// Rules not present here use their default severity (`Warning`).
#[derive(Clone, Debug, Default)]
pub struct DiagnosticSettings {
    overrides: FxHashMap<String, Severity>,
}

impl DiagnosticSettings {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_severity(&mut self, rule: impl Into<String>, severity: Severity) {
        self.overrides.insert(rule.into(), severity);
    }

    #[must_use]
    pub fn severity_for(&self, rule: &str) -> Severity {
        self.overrides
            .get(rule)
            .copied()
            .unwrap_or(Severity::Warning)
    }
}
