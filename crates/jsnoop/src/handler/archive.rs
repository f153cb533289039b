use jsnoop_archive::{Archive, ArchiveFormat, ArchiveMember};

use crate::context::Context;
use crate::error::Result;
use crate::handler::FileInfo;
use crate::record::{FileRecord, HandlerKind, Payload};
use crate::source::{ByteSource, Materialized};

/// A member of an archive, ready to be walked.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChildObject {
    /// Name as listed by the enclosing archive.
    pub name:          String,
    pub source:        ByteSource,
    /// Logical name of the enclosing archive.
    pub parent_path:   String,
    pub parent_sha512: Option<String>,
}

impl ChildObject {
    /// The top of a walk: no enclosing archive.
    pub fn root(name: impl Into<String>, source: ByteSource) -> Self {
        Self {
            name: name.into(),
            source,
            parent_path: String::new(),
            parent_sha512: None,
        }
    }
}

/// A container whose members are walked in turn.
///
/// Owns the opened archive and, for in-memory input, the temporary copy it
/// was opened from; both are removed when the handler is dropped.
pub struct ArchiveFile {
    info:          FileInfo,
    logical_name:  String,
    archive:       Archive,
    _materialized: Materialized,
}

impl ArchiveFile {
    pub fn open(
        ctx: &Context,
        info: FileInfo,
        name: &str,
        source: &ByteSource,
        format: ArchiveFormat,
    ) -> Result<Self> {
        let materialized = source.materialize(name, ctx.options().scratch_root.as_deref())?;
        let archive = Archive::open_as(materialized.path(), format, &ctx.archive_options())?;
        Ok(Self {
            info,
            logical_name: name.to_string(),
            archive,
            _materialized: materialized,
        })
    }

    pub fn info(&self) -> &FileInfo { &self.info }

    pub fn format(&self) -> ArchiveFormat { self.archive.format() }

    pub fn contents(&self) -> &[ArchiveMember] { self.archive.infolist() }

    /// Bytes of one member. Regular files and hard links to them are
    /// extracted; directories, symlinks and special entries read as empty.
    pub fn file_source(&mut self, member: &ArchiveMember) -> Result<ByteSource> {
        if self.archive.content_member(member).is_none() {
            return Ok(ByteSource::empty());
        }
        Ok(ByteSource::Path(self.archive.extract(member)?))
    }

    /// Every member in listing order, linked to this archive.
    pub fn child_objects(&mut self) -> Result<Vec<ChildObject>> {
        let members = self.archive.infolist().to_vec();
        let parent_path = self.logical_name.clone();
        let parent_sha512 = self.info.sha512().to_string();
        members
            .iter()
            .map(|member| {
                Ok(ChildObject {
                    name:          member.name.clone(),
                    source:        self.file_source(member)?,
                    parent_path:   parent_path.clone(),
                    parent_sha512: Some(parent_sha512.clone()),
                })
            })
            .collect()
    }

    pub fn describe(&self) -> FileRecord {
        self.info.record(
            HandlerKind::Archive,
            Some(Payload::Archive {
                format: self.format().to_string(),
            }),
        )
    }
}

impl std::fmt::Debug for ArchiveFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArchiveFile")
            .field("name", &self.logical_name)
            .field("archive", &self.archive)
            .finish()
    }
}
