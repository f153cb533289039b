use std::path::Path;

use tempfile::TempDir;

use crate::error::Result;

const PREFIX: &str = "jsnoop-";

/// Scratch directory owned by one archive.
///
/// Removed when dropped, whatever path the owner leaves by; [`ScratchDir::close`]
/// removes it eagerly and reports failures.
#[derive(Debug)]
pub struct ScratchDir(TempDir);

impl ScratchDir {
    pub fn new(root: Option<&Path>) -> Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(PREFIX);
        let dir = match root {
            Some(root) => {
                std::fs::create_dir_all(root)?;
                builder.tempdir_in(root)?
            }
            None => builder.tempdir()?,
        };
        Ok(Self(dir))
    }

    pub fn path(&self) -> &Path { self.0.path() }

    pub fn close(self) -> Result<()> {
        self.0.close()?;
        Ok(())
    }
}
