use std::path::{Path, PathBuf};

use jsnoop_archive::ArchiveOptions;
use serde::Deserialize;

use crate::error::Result;

pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Options for one walk.
///
/// Loadable from TOML; every key is optional:
///
/// ```toml
/// process_all_files = true
/// allow_unsafe_extraction = false
/// scratch_root = "/var/tmp/jsnoop"
/// max_depth = 16
/// openssl = "/usr/bin/openssl"
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WalkOptions {
    /// Record every archive member, not only those with a known extension.
    pub process_all_files:       bool,
    pub allow_unsafe_extraction: bool,
    pub scratch_root:            Option<PathBuf>,
    pub max_depth:               usize,
    /// Program used to decode signature blocks.
    pub openssl:                 PathBuf,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            process_all_files:       false,
            allow_unsafe_extraction: false,
            scratch_root:            None,
            max_depth:               DEFAULT_MAX_DEPTH,
            openssl:                 PathBuf::from("openssl"),
        }
    }
}

impl WalkOptions {
    pub fn process_all_files(mut self, enabled: bool) -> Self {
        self.process_all_files = enabled;
        self
    }

    pub fn allow_unsafe_extraction(mut self, allow: bool) -> Self {
        self.allow_unsafe_extraction = allow;
        self
    }

    pub fn scratch_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.scratch_root = Some(root.into());
        self
    }

    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn openssl(mut self, program: impl Into<PathBuf>) -> Self {
        self.openssl = program.into();
        self
    }

    pub fn from_toml_str(text: &str) -> Result<Self> { Ok(toml::from_str(text)?) }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// The subset the archive layer needs.
    pub fn archive_options(&self) -> ArchiveOptions {
        let options = ArchiveOptions::default().allow_unsafe_extraction(self.allow_unsafe_extraction);
        match &self.scratch_root {
            Some(root) => options.scratch_root(root),
            None => options,
        }
    }
}
