use std::fs::{self, File};
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

use zip::ZipArchive;

use crate::error::{Error, Result};
use crate::member::{ArchiveMember, MemberKind, MemberMeta, zip_member_kind};
use crate::sanitize::resolve_in;

pub(crate) struct ZipBackend {
    archive: ZipArchive<BufReader<File>>,
}

impl ZipBackend {
    pub(crate) fn open(path: &Path) -> Result<(Self, Vec<ArchiveMember>)> {
        let mut archive = ZipArchive::new(BufReader::new(File::open(path)?))?;
        let mut members = Vec::with_capacity(archive.len());

        for index in 0..archive.len() {
            let (name, size, unix_mode) = {
                let file = archive.by_index_raw(index)?;
                (file.name().to_string(), file.size(), file.unix_mode())
            };
            let mut kind = zip_member_kind(&name, unix_mode);
            if let MemberKind::Symlink { target } = &mut kind {
                // The link target is the entry's content.
                let mut link = String::new();
                if let Ok(mut file) = archive.by_index(index) {
                    if file.read_to_string(&mut link).is_ok() {
                        *target = Some(link);
                    }
                }
            }
            members.push(ArchiveMember {
                name,
                kind,
                size,
                mode: unix_mode.map(|mode| mode & 0o7777),
                meta: MemberMeta::Zip { index, unix_mode },
            });
        }

        Ok((Self { archive }, members))
    }

    pub(crate) fn extract(&mut self, member: &ArchiveMember, root: &Path) -> Result<PathBuf> {
        let MemberMeta::Zip { index, .. } = member.meta else {
            return Err(Error::ForeignMember {
                name: member.name.clone(),
            });
        };
        let target = resolve_in(root, &member.name);

        match member.kind {
            MemberKind::Directory => fs::create_dir_all(&target)?,
            MemberKind::File => {
                if let Some(parent) = target.parent() {
                    fs::create_dir_all(parent)?;
                }
                let mut entry = self.archive.by_index(index)?;
                let mut out = File::create(&target)?;
                io::copy(&mut entry, &mut out)?;
            }
            MemberKind::Symlink { .. } | MemberKind::HardLink { .. } | MemberKind::Other => {}
        }
        Ok(target)
    }

    pub(crate) fn extract_all(&mut self, members: &[ArchiveMember], root: &Path) -> Result<()> {
        for member in members {
            self.extract(member, root)?;
        }
        Ok(())
    }
}
