use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::member::ArchiveMember;

/// Whether extracting `name` verbatim could write outside the destination:
/// absolute names (leading separator or drive prefix) and any `..` segment.
pub fn is_unsafe_name(name: &str) -> bool {
    if name.starts_with('/') || name.starts_with('\\') || has_drive_prefix(name) {
        return true;
    }
    name.split(['/', '\\']).any(|segment| segment == "..")
}

fn has_drive_prefix(name: &str) -> bool {
    let bytes = name.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

/// Reject the archive if any member name is unsafe, unless explicitly allowed.
pub fn check_members(archive: &Path, members: &[ArchiveMember], allow_unsafe: bool) -> Result<()> {
    if allow_unsafe {
        return Ok(());
    }
    match members.iter().find(|m| is_unsafe_name(&m.name)) {
        Some(member) => Err(Error::UnsafeArchive {
            archive: archive.to_path_buf(),
            member:  member.name.clone(),
        }),
        None => Ok(()),
    }
}

/// Resolve a member name to a location confined to `root`.
///
/// Root and drive components are dropped and `..` never climbs above `root`,
/// so names that were allowed through with unsafe extraction still land
/// inside the scratch directory.
pub fn resolve_in(root: &Path, name: &str) -> PathBuf {
    let mut relative: Vec<&str> = Vec::new();
    for (i, segment) in name.split(['/', '\\']).enumerate() {
        match segment {
            "" | "." => {}
            ".." => {
                relative.pop();
            }
            s if i == 0 && has_drive_prefix(s) && s.len() == 2 => {}
            s => relative.push(s),
        }
    }
    let mut resolved = root.to_path_buf();
    resolved.extend(relative);
    resolved
}
