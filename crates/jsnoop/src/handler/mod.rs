//! File-type handlers.
//!
//! A handler is built for every visited byte stream: it digests the bytes,
//! parses whatever its type carries, and describes the result as a
//! [`FileRecord`]. The set is closed; [`crate::dispatch`] picks the variant.

mod archive;
mod class;
mod generic;
mod manifest;
mod signature;

pub use self::archive::{ArchiveFile, ChildObject};
pub use self::class::{ClassFile, ClassHeader, version_string};
pub use self::generic::GenericFile;
pub use self::manifest::{ManifestFile, parse_manifest};
pub use self::signature::{SignatureDecoder, SignatureFile};

use jsnoop_checksum::Digests;

use crate::context::Context;
use crate::dispatch::Resolution;
use crate::error::{Error, HandlerError, Result};
use crate::record::{FileRecord, HandlerKind, Payload};
use crate::source::ByteSource;

pub enum Handler {
    Generic(GenericFile),
    Manifest(ManifestFile),
    Signature(SignatureFile),
    Class(ClassFile),
    Archive(ArchiveFile),
}

impl Handler {
    /// Digest and parse `child` with the handler `resolution` names.
    pub fn build(ctx: &Context, resolution: Resolution, child: &ChildObject) -> Result<Self> {
        let info = FileInfo::new(
            &child.name,
            &child.source,
            &child.parent_path,
            child.parent_sha512.as_deref(),
        )?;
        let kind = resolution.kind();
        let wrap = |source: HandlerError| Error::HandlerConstruction {
            name: child.name.clone(),
            kind,
            source,
        };

        let handler = match resolution {
            Resolution::Archive(format) => {
                Self::Archive(ArchiveFile::open(ctx, info, &child.name, &child.source, format)?)
            }
            Resolution::File(HandlerKind::Manifest) => {
                Self::Manifest(ManifestFile::new(info, &child.source).map_err(wrap)?)
            }
            Resolution::File(HandlerKind::Signature) => Self::Signature(
                SignatureFile::new(ctx, info, &child.name, &child.source).map_err(wrap)?,
            ),
            Resolution::File(HandlerKind::Class) => {
                Self::Class(ClassFile::new(info, &child.source).map_err(wrap)?)
            }
            Resolution::File(HandlerKind::Generic | HandlerKind::Archive) => {
                Self::Generic(GenericFile::new(info))
            }
        };
        Ok(handler)
    }

    pub fn kind(&self) -> HandlerKind {
        match self {
            Self::Generic(_) => HandlerKind::Generic,
            Self::Manifest(_) => HandlerKind::Manifest,
            Self::Signature(_) => HandlerKind::Signature,
            Self::Class(_) => HandlerKind::Class,
            Self::Archive(_) => HandlerKind::Archive,
        }
    }

    pub fn info(&self) -> &FileInfo {
        match self {
            Self::Generic(h) => h.info(),
            Self::Manifest(h) => h.info(),
            Self::Signature(h) => h.info(),
            Self::Class(h) => h.info(),
            Self::Archive(h) => h.info(),
        }
    }

    pub fn describe(&self) -> FileRecord {
        match self {
            Self::Generic(h) => h.describe(),
            Self::Manifest(h) => h.describe(),
            Self::Signature(h) => h.describe(),
            Self::Class(h) => h.describe(),
            Self::Archive(h) => h.describe(),
        }
    }
}

/// Fields every handler shares.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileInfo {
    pub path:      String,
    pub name:      String,
    pub file_type: String,
    pub digests:   Digests,
    pub parent:    Option<String>,
}

impl FileInfo {
    pub fn new(
        logical_name: &str,
        source: &ByteSource,
        parent_path: &str,
        parent_sha512: Option<&str>,
    ) -> Result<Self> {
        let (path, name) = split_name(logical_name, parent_path);
        Ok(Self {
            file_type: extension(&name),
            path,
            name,
            digests: Digests::compute(source.input())?,
            parent: parent_sha512.map(str::to_string),
        })
    }

    pub fn sha512(&self) -> &str { &self.digests.sha512 }

    pub(crate) fn record(&self, handler: HandlerKind, payload: Option<Payload>) -> FileRecord {
        FileRecord {
            path: self.path.clone(),
            name: self.name.clone(),
            file_type: self.file_type.clone(),
            digests: self.digests.clone(),
            handler,
            parent: self.parent.clone(),
            payload,
        }
    }
}

/// Split a logical name into (directory, basename) after removing the
/// enclosing archive's name and any leading separator.
pub fn split_name(logical_name: &str, parent_path: &str) -> (String, String) {
    let relative = match logical_name.strip_prefix(parent_path) {
        Some(rest) if !parent_path.is_empty() => rest,
        _ => logical_name,
    };
    let relative = relative.trim_start_matches(['/', '\\']);
    let trimmed = relative.trim_end_matches('/');
    match trimmed.rfind(['/', '\\']) {
        Some(i) => (trimmed[..i].to_string(), trimmed[i + 1..].to_string()),
        None => (String::new(), trimmed.to_string()),
    }
}

/// Lowercase extension of a basename including the dot; leading dots do not
/// start an extension.
pub fn extension(name: &str) -> String {
    let base = name.trim_end_matches('/');
    let base = base.rsplit(['/', '\\']).next().unwrap_or(base);
    match base.rfind('.') {
        Some(i) if base[..i].chars().any(|c| c != '.') => base[i..].to_lowercase(),
        _ => String::new(),
    }
}
