use std::io;

use jsnoop_checksum::ChecksumError;

use crate::record::HandlerKind;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Archive(#[from] jsnoop_archive::Error),

    #[error("cannot build {kind} handler for '{name}': {source}")]
    HandlerConstruction {
        name:   String,
        kind:   HandlerKind,
        source: HandlerError,
    },

    #[error("checksum failed: {0}")]
    Checksum(#[from] ChecksumError),

    #[error("'{name}' is nested deeper than {limit} archives")]
    DepthExceeded { name: String, limit: usize },

    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Error {
    /// Short stable name of the failure kind, reported next to the input path.
    pub fn class(&self) -> &'static str {
        match self {
            Self::Archive(e) => e.class(),
            Self::HandlerConstruction { .. } => "handler-construction",
            Self::Checksum(_) => "checksum",
            Self::DepthExceeded { .. } => "depth-exceeded",
            Self::Config(_) => "config",
            Self::Io(_) => "io",
        }
    }
}

/// Why a type-specific handler could not be built.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error("class header is {len} bytes, need 8")]
    TruncatedClassHeader { len: usize },

    #[error("'{name}' is not a .rsa or .dsa signature block")]
    UnsupportedSigner { name: String },

    #[error("openssl could not decode the signature block: {0}")]
    SignatureDecode(#[source] jsnoop_platform::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
