use std::io;
use std::path::PathBuf;

use crate::format::Compression;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unsafe member '{member}' in archive '{archive}'")]
    UnsafeArchive { archive: PathBuf, member: String },

    #[error("unknown archive type: '{path}'")]
    UnknownArchiveType { path: PathBuf },

    #[error("failed to open archive '{path}': {structured}; native tar fallback: {native}")]
    ArchiveOpen {
        path:       PathBuf,
        structured: Box<Error>,
        native:     Box<Error>,
    },

    #[error("native tar (best-effort fallback): {reason}")]
    NativeTar { reason: String },

    #[error("member '{name}' was not listed by this archive")]
    ForeignMember { name: String },

    #[error("compression {0:?} is not enabled in this build")]
    UnsupportedCompression(Compression),

    #[error("zip archive is corrupted: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("tar archive is corrupted: {0}")]
    Tar(#[source] io::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Error {
    pub fn is_unsafe(&self) -> bool { matches!(self, Self::UnsafeArchive { .. }) }

    /// Short stable name of the failure kind.
    pub fn class(&self) -> &'static str {
        match self {
            Self::UnsafeArchive { .. } => "unsafe-archive",
            Self::UnknownArchiveType { .. } => "unknown-archive-type",
            Self::ArchiveOpen { .. } => "archive-open",
            Self::NativeTar { .. } => "native-tar",
            Self::ForeignMember { .. } => "foreign-member",
            Self::UnsupportedCompression(_) => "unsupported-compression",
            Self::Zip(_) => "zip",
            Self::Tar(_) => "tar",
            Self::Io(_) => "io",
        }
    }

    pub(crate) fn native(reason: impl std::fmt::Display) -> Self {
        Self::NativeTar {
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
