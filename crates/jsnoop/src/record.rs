use std::collections::BTreeMap;
use std::fmt;
use std::io::{self, Write};
use std::path::Path;

use jsnoop_checksum::Digests;
use serde::{Deserialize, Serialize};

/// Suffix of the persisted manifest file.
pub const MANIFEST_EXTENSION: &str = "manifest";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandlerKind {
    Generic,
    Manifest,
    Signature,
    Class,
    Archive,
}

impl HandlerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Generic => "generic",
            Self::Manifest => "manifest",
            Self::Signature => "signature",
            Self::Class => "class",
            Self::Archive => "archive",
        }
    }
}

impl fmt::Display for HandlerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// Type-specific fields of a record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Payload {
    Manifest(BTreeMap<String, String>),
    #[serde(rename_all = "kebab-case")]
    Class {
        magic:          [u8; 4],
        /// `(major, minor)`
        version:        (u16, u16),
        version_string: String,
    },
    Signature(String),
    Archive {
        format: String,
    },
}

/// One manifest line: a byte stream identified by content, linked to the
/// record of the archive it came from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Directory part of the name, relative to the enclosing archive.
    pub path:      String,
    pub name:      String,
    /// Lowercase extension including the dot, or empty.
    #[serde(rename = "type")]
    pub file_type: String,
    #[serde(flatten)]
    pub digests:   Digests,
    pub handler:   HandlerKind,
    /// sha512 of the enclosing record; `None` for the root.
    pub parent:    Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload:   Option<Payload>,
}

impl FileRecord {
    pub fn sha512(&self) -> &str { &self.digests.sha512 }
}

/// Records of one walk in pre-order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Manifest {
    records: Vec<FileRecord>,
}

impl Manifest {
    pub fn new() -> Self { Self::default() }

    pub fn push(&mut self, record: FileRecord) { self.records.push(record); }

    pub fn records(&self) -> &[FileRecord] { &self.records }

    pub fn root(&self) -> Option<&FileRecord> { self.records.first() }

    pub fn len(&self) -> usize { self.records.len() }

    pub fn is_empty(&self) -> bool { self.records.is_empty() }

    pub fn iter(&self) -> std::slice::Iter<'_, FileRecord> { self.records.iter() }

    /// Every record after the first names the sha512 of an earlier record as
    /// its parent.
    pub fn check_links(&self) -> bool {
        self.records.iter().enumerate().skip(1).all(|(i, record)| {
            record
                .parent
                .as_deref()
                .is_some_and(|parent| self.records[..i].iter().any(|r| r.sha512() == parent))
        })
    }

    /// One JSON object per line.
    pub fn write_lines<W: Write>(&self, mut out: W) -> io::Result<()> {
        for record in &self.records {
            serde_json::to_writer(&mut out, record)?;
            out.write_all(b"\n")?;
        }
        out.flush()
    }
}

impl IntoIterator for Manifest {
    type IntoIter = std::vec::IntoIter<FileRecord>;
    type Item = FileRecord;

    fn into_iter(self) -> Self::IntoIter { self.records.into_iter() }
}

impl<'a> IntoIterator for &'a Manifest {
    type IntoIter = std::slice::Iter<'a, FileRecord>;
    type Item = &'a FileRecord;

    fn into_iter(self) -> Self::IntoIter { self.records.iter() }
}

/// `<basename>.manifest` for an input path.
pub fn manifest_file_name(input: &Path) -> String {
    let base = input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!("{base}.{MANIFEST_EXTENSION}")
}
