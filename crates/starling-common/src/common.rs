//! Shared constants used across the analyzer's front-end crates.
//!
//! Kept separate from [`crate::span`] and [`crate::diagnostics`] to avoid
//! circular dependencies between the AST and binder crates.

/// Language version the source file is being analyzed against.
///
/// Some binder behaviors are version-gated (e.g. whether a class's
/// `__qualname__` intrinsic is injected — see [`LanguageVersion::supports_qualname`]).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum LanguageVersion {
    V3_6 = 0,
    V3_7 = 1,
    V3_8 = 2,
    V3_9 = 3,
    V3_10 = 4,
    V3_11 = 5,
    V3_12 = 6,
    #[default]
    Latest = 99,
}

impl LanguageVersion {
    /// `__qualname__` was added to class bodies as of 3.6.
    #[must_use]
    pub const fn supports_qualname(self) -> bool {
        (self as u8) >= (Self::V3_6 as u8)
    }

    /// Assignment expressions (`:=`) were introduced in 3.8.
    #[must_use]
    pub const fn supports_assignment_expressions(self) -> bool {
        (self as u8) >= (Self::V3_8 as u8)
    }
}
