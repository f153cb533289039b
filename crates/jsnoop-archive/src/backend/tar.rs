use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::format::{Compression, Decoder};
use crate::member::{ArchiveMember, MemberKind, MemberMeta};
use crate::sanitize::resolve_in;

pub(crate) struct TarBackend {
    path:        PathBuf,
    compression: Compression,
    unpacked:    bool,
}

type TarReader = tar::Archive<Decoder<BufReader<File>>>;

fn member_kind(entry_type: tar::EntryType, link: Option<String>) -> MemberKind {
    if entry_type.is_dir() {
        MemberKind::Directory
    } else if entry_type.is_hard_link() {
        MemberKind::HardLink {
            target: link.unwrap_or_default(),
        }
    } else if entry_type.is_symlink() {
        MemberKind::Symlink { target: link }
    } else if entry_type.is_file() || entry_type.is_contiguous() || entry_type.is_gnu_sparse() {
        MemberKind::File
    } else {
        MemberKind::Other
    }
}

impl TarBackend {
    fn reader(path: &Path, compression: Compression) -> Result<TarReader> {
        let file = BufReader::new(File::open(path)?);
        Ok(tar::Archive::new(compression.decoder(file)?))
    }

    pub(crate) fn open(path: &Path, compression: Compression) -> Result<(Self, Vec<ArchiveMember>)> {
        let mut archive = Self::reader(path, compression)?;
        let mut members = Vec::new();

        for (index, entry) in archive.entries().map_err(Error::Tar)?.enumerate() {
            let entry = entry.map_err(Error::Tar)?;
            let entry_type = entry.header().entry_type();
            let name = String::from_utf8_lossy(&entry.path_bytes()).into_owned();
            let link = entry
                .link_name_bytes()
                .map(|bytes| String::from_utf8_lossy(&bytes).into_owned());
            members.push(ArchiveMember {
                name,
                kind: member_kind(entry_type, link),
                size: entry.size(),
                mode: entry.header().mode().ok(),
                meta: MemberMeta::Tar {
                    index,
                    entry_type: entry_type.as_byte(),
                },
            });
        }

        Ok((
            Self {
                path: path.to_path_buf(),
                compression,
                unpacked: false,
            },
            members,
        ))
    }

    /// Tar is sequential, so the first member request unpacks the whole stream.
    pub(crate) fn extract(&mut self, member: &ArchiveMember, root: &Path) -> Result<PathBuf> {
        if !matches!(member.meta, MemberMeta::Tar { .. }) {
            return Err(Error::ForeignMember {
                name: member.name.clone(),
            });
        }
        if !self.unpacked {
            self.extract_all(root)?;
        }
        Ok(resolve_in(root, &member.name))
    }

    pub(crate) fn extract_all(&mut self, root: &Path) -> Result<()> {
        let mut archive = Self::reader(&self.path, self.compression)?;
        for entry in archive.entries().map_err(Error::Tar)? {
            let mut entry = entry.map_err(Error::Tar)?;
            let entry_type = entry.header().entry_type();
            let name = String::from_utf8_lossy(&entry.path_bytes()).into_owned();
            let target = resolve_in(root, &name);

            match member_kind(entry_type, None) {
                MemberKind::Directory => fs::create_dir_all(&target)?,
                MemberKind::File => {
                    if let Some(parent) = target.parent() {
                        fs::create_dir_all(parent)?;
                    }
                    let mut out = File::create(&target)?;
                    io::copy(&mut entry, &mut out)?;
                }
                MemberKind::Symlink { .. } | MemberKind::HardLink { .. } | MemberKind::Other => {}
            }
        }
        self.unpacked = true;
        Ok(())
    }
}
