//! Uniform read-only access to zip and tar archives.
//!
//! One closed set of backends sits behind [`Archive`]: zip through the `zip`
//! crate, tar (optionally compressed) through the `tar` crate, and the system
//! `tar` tool as a fallback for tar streams the crate cannot read.

mod native;
mod tar;
mod zip;

use std::path::{Path, PathBuf};

use tracing::instrument;

use crate::error::{Error, Result};
use crate::format::{ArchiveFormat, Compression};
use crate::member::{ArchiveMember, MemberKind};
use crate::options::ArchiveOptions;
use crate::sanitize::check_members;
use crate::scratch::ScratchDir;

use self::native::NativeTarBackend;
use self::tar::TarBackend;
use self::zip::ZipBackend;

enum Backend {
    Zip(ZipBackend),
    Tar(TarBackend),
    NativeTar(NativeTarBackend),
}

/// An opened archive, its member listing and the scratch directory members
/// are extracted into. The scratch directory goes away with the archive.
pub struct Archive {
    path:    PathBuf,
    format:  ArchiveFormat,
    members: Vec<ArchiveMember>,
    backend: Backend,
    scratch: ScratchDir,
}

impl std::fmt::Debug for Archive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Archive")
            .field("path", &self.path)
            .field("format", &self.format)
            .field("members", &self.members.len())
            .field("native", &self.is_native())
            .field("scratch", &self.scratch.path())
            .finish()
    }
}

impl Archive {
    /// Open `path`, deciding the format from its content.
    pub fn open(path: impl AsRef<Path>, options: &ArchiveOptions) -> Result<Self> {
        let path = path.as_ref();
        let format = crate::detect::detect_path(path)?.ok_or_else(|| Error::UnknownArchiveType {
            path: path.to_path_buf(),
        })?;
        Self::open_as(path, format, options)
    }

    #[instrument(skip(path, options), fields(path = %path.as_ref().display()))]
    pub fn open_as(path: impl AsRef<Path>, format: ArchiveFormat, options: &ArchiveOptions) -> Result<Self> {
        let path = path.as_ref();
        let scratch = ScratchDir::new(options.scratch_root.as_deref())?;

        let (backend, members) = match format {
            ArchiveFormat::Zip => {
                let (backend, members) = ZipBackend::open(path)?;
                (Backend::Zip(backend), members)
            }
            ArchiveFormat::Tar(compression) => open_tar(path, compression, options)?,
        };

        check_members(path, &members, options.allow_unsafe_extraction)?;

        tracing::debug!(%format, members = members.len(), scratch = %scratch.path().display(), "Opened archive");
        Ok(Self {
            path: path.to_path_buf(),
            format,
            members,
            backend,
            scratch,
        })
    }

    pub fn path(&self) -> &Path { &self.path }

    pub fn format(&self) -> ArchiveFormat { self.format }

    /// Whether listing and extraction go through the system `tar` tool.
    pub fn is_native(&self) -> bool { matches!(self.backend, Backend::NativeTar(_)) }

    pub fn scratch_dir(&self) -> &Path { self.scratch.path() }

    /// Member names in archive order.
    pub fn members(&self) -> Vec<&str> { self.members.iter().map(|m| m.name.as_str()).collect() }

    pub fn infolist(&self) -> &[ArchiveMember] { &self.members }

    pub fn is_file(&self, member: &ArchiveMember) -> bool { member.is_file() }

    pub fn is_dir(&self, member: &ArchiveMember) -> bool { member.is_dir() }

    pub fn is_link(&self, member: &ArchiveMember) -> bool { member.is_link() }

    /// The regular file holding `member`'s bytes: the member itself, or for a
    /// hard link the listed file it names.
    pub fn content_member<'a>(&'a self, member: &'a ArchiveMember) -> Option<&'a ArchiveMember> {
        match &member.kind {
            MemberKind::File => Some(member),
            MemberKind::HardLink { target } => {
                self.members.iter().find(|m| m.is_file() && m.has_name(target))
            }
            _ => None,
        }
    }

    /// Extract one member below the scratch directory and return where it
    /// landed. A hard link extracts the file it names; symlinks are never
    /// materialized and their path is returned as is.
    pub fn extract(&mut self, member: &ArchiveMember) -> Result<PathBuf> {
        let linked = match member.kind {
            MemberKind::HardLink { .. } => self.content_member(member).cloned(),
            _ => None,
        };
        let member = linked.as_ref().unwrap_or(member);
        let root = self.scratch.path();
        match &mut self.backend {
            Backend::Zip(backend) => backend.extract(member, root),
            Backend::Tar(backend) => backend.extract(member, root),
            Backend::NativeTar(backend) => backend.extract(member, root),
        }
    }

    /// Extract every member and return the scratch directory.
    pub fn extract_all(&mut self) -> Result<PathBuf> {
        let root = self.scratch.path();
        match &mut self.backend {
            Backend::Zip(backend) => backend.extract_all(&self.members, root)?,
            Backend::Tar(backend) => backend.extract_all(root)?,
            Backend::NativeTar(backend) => backend.extract_all(root)?,
        }
        Ok(root.to_path_buf())
    }

    /// Remove the scratch directory now, reporting failure.
    pub fn close(self) -> Result<()> { self.scratch.close() }
}

fn open_tar(
    path: &Path,
    compression: Compression,
    options: &ArchiveOptions,
) -> Result<(Backend, Vec<ArchiveMember>)> {
    let structured = match TarBackend::open(path, compression) {
        Ok((backend, members)) => return Ok((Backend::Tar(backend), members)),
        Err(e) => e,
    };
    if !options.native_fallback {
        return Err(structured);
    }

    tracing::warn!(path = %path.display(), error = %structured, "Falling back to system tar");
    match NativeTarBackend::open(path) {
        Ok((backend, members)) => Ok((Backend::NativeTar(backend), members)),
        Err(native) => Err(Error::ArchiveOpen {
            path:       path.to_path_buf(),
            structured: Box::new(structured),
            native:     Box::new(native),
        }),
    }
}
