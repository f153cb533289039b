use std::path::PathBuf;

/// How an [`Archive`](crate::Archive) is opened.
#[derive(Clone, Debug)]
pub struct ArchiveOptions {
    pub allow_unsafe_extraction: bool,
    /// Parent directory for scratch directories; the system temp dir when unset.
    pub scratch_root: Option<PathBuf>,
    /// Retry tar archives the `tar` crate rejects with the system `tar` tool.
    pub native_fallback: bool,
}

impl Default for ArchiveOptions {
    fn default() -> Self {
        Self {
            allow_unsafe_extraction: false,
            scratch_root: None,
            native_fallback: true,
        }
    }
}

impl ArchiveOptions {
    pub fn allow_unsafe_extraction(mut self, allow: bool) -> Self {
        self.allow_unsafe_extraction = allow;
        self
    }

    pub fn scratch_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.scratch_root = Some(root.into());
        self
    }

    pub fn native_fallback(mut self, enabled: bool) -> Self {
        self.native_fallback = enabled;
        self
    }
}
