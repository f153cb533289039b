//! Picks the handler for a byte stream.
//!
//! Content comes first: anything detected as an archive is walked as one,
//! whatever its name. Only then does the extension decide.

use jsnoop_archive::{ArchiveFormat, detect_format};

use crate::handler::extension;
use crate::record::HandlerKind;
use crate::source::ByteSource;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution {
    Archive(ArchiveFormat),
    File(HandlerKind),
}

impl Resolution {
    pub fn kind(&self) -> HandlerKind {
        match self {
            Self::Archive(_) => HandlerKind::Archive,
            Self::File(kind) => *kind,
        }
    }

    pub fn is_archive(&self) -> bool { matches!(self, Self::Archive(_)) }
}

/// Handler named by a lowercase extension.
pub fn extension_kind(extension: &str) -> Option<HandlerKind> {
    match extension {
        ".mf" => Some(HandlerKind::Manifest),
        ".rsa" | ".dsa" => Some(HandlerKind::Signature),
        ".class" => Some(HandlerKind::Class),
        ".zip" | ".gz" | ".bz2" | ".tar" | ".jar" | ".war" | ".sar" => Some(HandlerKind::Archive),
        _ => None,
    }
}

/// Whether `name` carries an extension with a dedicated handler.
pub fn is_known_type(name: &str) -> bool { extension_kind(&extension(name)).is_some() }

/// Resolve from a name and the whole content.
pub fn resolve(name: &str, content: &[u8]) -> Resolution { resolve_format(name, detect_format(content)) }

pub fn resolve_source(name: &str, source: &ByteSource) -> std::io::Result<Resolution> {
    let resolution = resolve_format(name, source.archive_format()?);
    tracing::trace!(name, handler = %resolution.kind(), "Resolved handler");
    Ok(resolution)
}

fn resolve_format(name: &str, format: Option<ArchiveFormat>) -> Resolution {
    if let Some(format) = format {
        return Resolution::Archive(format);
    }
    match extension_kind(&extension(name)) {
        // The content already said this is not an archive we can open.
        Some(HandlerKind::Archive) | None => Resolution::File(HandlerKind::Generic),
        Some(kind) => Resolution::File(kind),
    }
}
