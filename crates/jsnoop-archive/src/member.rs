/// One named entry of an archive, as listed when the archive was opened.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArchiveMember {
    /// Name exactly as stored in the archive.
    pub name: String,
    pub kind: MemberKind,
    pub size: u64,
    pub mode: Option<u32>,
    pub meta: MemberMeta,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MemberKind {
    File,
    Directory,
    /// Never materialized on disk.
    Symlink { target: Option<String> },
    /// Tar hard link; reads as the bytes of the member it names.
    HardLink { target: String },
    /// Device nodes, fifos and other tar entry types with no byte content.
    Other,
}

/// Backend-native metadata.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MemberMeta {
    Zip {
        index:     usize,
        unix_mode: Option<u32>,
    },
    Tar {
        index:      usize,
        entry_type: u8,
    },
    /// Columns of one `tar -tvf` line.
    Native {
        permissions: String,
        owner:       String,
        group:       String,
        date:        String,
        time:        String,
    },
}

impl ArchiveMember {
    pub fn is_file(&self) -> bool { matches!(self.kind, MemberKind::File) }

    pub fn is_dir(&self) -> bool { matches!(self.kind, MemberKind::Directory) }

    pub fn is_link(&self) -> bool { matches!(self.kind, MemberKind::Symlink { .. } | MemberKind::HardLink { .. }) }

    pub fn link_target(&self) -> Option<&str> {
        match &self.kind {
            MemberKind::Symlink { target } => target.as_deref(),
            MemberKind::HardLink { target } => Some(target),
            _ => None,
        }
    }

    /// Whether this entry is named `name`, ignoring a leading `./`.
    pub fn has_name(&self, name: &str) -> bool {
        self.name.trim_start_matches("./") == name.trim_start_matches("./")
    }
}

const S_IFMT: u32 = 0o170000;
const S_IFLNK: u32 = 0o120000;
const S_IFDIR: u32 = 0o040000;

/// Zip has no entry type field: a trailing slash marks a directory and the
/// unix file type bits kept in the high half of the external attributes
/// mark a symlink.
pub fn zip_member_kind(name: &str, unix_mode: Option<u32>) -> MemberKind {
    let file_type = unix_mode.map(|mode| mode & S_IFMT);
    if name.ends_with('/') || file_type == Some(S_IFDIR) {
        MemberKind::Directory
    } else if file_type == Some(S_IFLNK) {
        MemberKind::Symlink { target: None }
    } else {
        MemberKind::File
    }
}

/// Decode the type character of an `ls -l` style permission string.
pub fn native_member_kind(permissions: &str, target: Option<String>) -> MemberKind {
    match permissions.chars().next() {
        Some('-') => MemberKind::File,
        Some('d') => MemberKind::Directory,
        Some('l') => MemberKind::Symlink { target },
        Some('h') => MemberKind::HardLink {
            target: target.unwrap_or_default(),
        },
        _ => MemberKind::Other,
    }
}

/// Permission bits from the nine `rwx` characters after the type character.
pub fn mode_from_permissions(permissions: &str) -> Option<u32> {
    let bits: Vec<char> = permissions.chars().skip(1).collect();
    if bits.len() != 9 {
        return None;
    }
    let mut mode = 0u32;
    for (i, c) in bits.iter().enumerate() {
        let shift = 8 - i as u32;
        let set = match c {
            '-' | 'S' | 'T' => false,
            'r' | 'w' | 'x' | 's' | 't' => true,
            _ => return None,
        };
        if set {
            mode |= 1 << shift;
        }
    }
    Some(mode)
}
