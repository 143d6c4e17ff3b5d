//! Host-supplied configuration (§6 "Input").

use starling_common::LanguageVersion;

/// Configuration passed in by the host for one binding pass. Mirrors the
/// teacher's `state.rs::BinderOptions` shape; this crate owns no file-based
/// config layer (the host loads whatever project config produced these
/// values).
#[derive(Clone, Copy, Debug)]
pub struct BinderOptions {
    pub language_version: LanguageVersion,
    pub always_strict: bool,
}

impl Default for BinderOptions {
    fn default() -> Self {
        Self {
            language_version: LanguageVersion::Latest,
            always_strict: false,
        }
    }
}

/// Per-file metadata the host attaches before binding (§6 `file_info`).
#[derive(Clone, Debug)]
pub struct FileInfo {
    pub path: String,
    pub is_typing_stub_file: bool,
    pub is_stub_file: bool,
}

impl FileInfo {
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            is_typing_stub_file: false,
            is_stub_file: false,
        }
    }
}
