use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use jsnoop_archive::{ArchiveFormat, detect_format, detect_path};
use jsnoop_checksum::Input;
use tempfile::TempDir;

/// The bytes a handler describes: a file on disk or a buffer already in memory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ByteSource {
    Path(PathBuf),
    Memory(Vec<u8>),
}

impl ByteSource {
    pub fn empty() -> Self { Self::Memory(Vec::new()) }

    pub fn input(&self) -> Input<'_> {
        match self {
            Self::Path(path) => Input::Path(path),
            Self::Memory(bytes) => Input::Bytes(bytes),
        }
    }

    /// Up to `len` leading bytes.
    pub fn prefix(&self, len: usize) -> io::Result<Vec<u8>> {
        match self {
            Self::Path(path) => {
                let mut prefix = Vec::with_capacity(len);
                File::open(path)?.take(len as u64).read_to_end(&mut prefix)?;
                Ok(prefix)
            }
            Self::Memory(bytes) => Ok(bytes[..len.min(bytes.len())].to_vec()),
        }
    }

    /// Archive format detected from content; files are read only at their
    /// head and tail.
    pub fn archive_format(&self) -> io::Result<Option<ArchiveFormat>> {
        match self {
            Self::Path(path) => detect_path(path),
            Self::Memory(bytes) => Ok(detect_format(bytes)),
        }
    }

    pub fn read_all(&self) -> io::Result<Vec<u8>> {
        match self {
            Self::Path(path) => fs::read(path),
            Self::Memory(bytes) => Ok(bytes.clone()),
        }
    }

    /// A real path holding these bytes. Buffers are written to a temporary
    /// directory (under `root`, or the system temp dir) owned by the returned
    /// value.
    pub fn materialize(&self, name: &str, root: Option<&Path>) -> io::Result<Materialized> {
        match self {
            Self::Path(path) => Ok(Materialized {
                path: path.clone(),
                _dir: None,
            }),
            Self::Memory(bytes) => {
                let mut builder = tempfile::Builder::new();
                builder.prefix("jsnoop-file-");
                let dir = match root {
                    Some(root) => {
                        fs::create_dir_all(root)?;
                        builder.tempdir_in(root)?
                    }
                    None => builder.tempdir()?,
                };
                let path = dir.path().join(file_name(name));
                fs::write(&path, bytes)?;
                Ok(Materialized {
                    path,
                    _dir: Some(dir),
                })
            }
        }
    }
}

fn file_name(name: &str) -> &str {
    match name.trim_end_matches('/').rsplit(['/', '\\']).next() {
        Some(base) if !base.is_empty() && base != "." && base != ".." => base,
        _ => "content",
    }
}

/// On-disk form of a [`ByteSource`]; any temporary copy is removed on drop.
#[derive(Debug)]
pub struct Materialized {
    path: PathBuf,
    _dir: Option<TempDir>,
}

impl Materialized {
    pub fn path(&self) -> &Path { &self.path }
}
