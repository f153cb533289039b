//! Best-effort fallback over the system `tar` tool, for tar streams the
//! `tar` crate rejects. Listings are parsed from `tar -tvf` output, which is
//! not a stable format; lines the pattern does not match are skipped.

use std::path::{Path, PathBuf};

use jsnoop_platform::Command;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Error, Result};
use crate::member::{ArchiveMember, MemberMeta, mode_from_permissions, native_member_kind};
use crate::sanitize::resolve_in;

const TAR: &str = "tar";

static LISTING_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<perms>[a-zA-Z-]{10})\s+(?P<owner>[^/\s]+)/(?P<group>\S+)\s+(?P<size>\d+)\s+(?P<date>\d{4}-\d{2}-\d{2})\s+(?P<time>\d{2}:\d{2}(?::\d{2})?)\s+(?P<name>.+)$",
    )
    .expect("tar listing pattern")
});

pub(crate) struct NativeTarBackend {
    tool: PathBuf,
    path: PathBuf,
}

impl NativeTarBackend {
    pub(crate) fn open(path: &Path) -> Result<(Self, Vec<ArchiveMember>)> {
        let tool = jsnoop_platform::locate(TAR).map_err(Error::native)?;
        let stdout = Command::new(&tool)
            .env("LC_ALL", "C")
            .arg("-tvf")
            .arg(path)
            .run()
            .map_err(Error::native)?;
        let members = parse_listing(&String::from_utf8_lossy(&stdout))?;

        Ok((
            Self {
                tool,
                path: path.to_path_buf(),
            },
            members,
        ))
    }

    pub(crate) fn extract(&mut self, member: &ArchiveMember, root: &Path) -> Result<PathBuf> {
        if !matches!(member.meta, MemberMeta::Native { .. }) {
            return Err(Error::ForeignMember {
                name: member.name.clone(),
            });
        }
        if member.is_file() || member.is_dir() {
            Command::new(&self.tool)
                .arg("-C")
                .arg(root)
                .arg("-xf")
                .arg(&self.path)
                .arg(&member.name)
                .run()
                .map_err(Error::native)?;
        }
        Ok(resolve_in(root, &member.name))
    }

    pub(crate) fn extract_all(&mut self, root: &Path) -> Result<()> {
        Command::new(&self.tool)
            .arg("-C")
            .arg(root)
            .arg("-xf")
            .arg(&self.path)
            .run()
            .map_err(Error::native)?;
        Ok(())
    }
}

pub(crate) fn parse_listing(listing: &str) -> Result<Vec<ArchiveMember>> {
    listing
        .lines()
        .filter_map(|line| match LISTING_LINE.captures(line) {
            Some(caps) => Some(parse_line(line, &caps)),
            None => {
                tracing::trace!(line, "Skipping unrecognized tar listing line");
                None
            }
        })
        .collect()
}

fn parse_line(line: &str, caps: &regex::Captures<'_>) -> Result<ArchiveMember> {
    let permissions = &caps["perms"];
    let raw_name = &caps["name"];
    let (name, target) = match permissions.chars().next() {
        Some('l') => split_link(raw_name, " -> "),
        Some('h') => split_link(raw_name, " link to "),
        _ => (raw_name, None),
    };
    let size = caps["size"]
        .parse()
        .map_err(|e| Error::native(format!("bad size in listing line {line:?}: {e}")))?;

    Ok(ArchiveMember {
        name: name.to_string(),
        kind: native_member_kind(permissions, target),
        size,
        mode: mode_from_permissions(permissions),
        meta: MemberMeta::Native {
            permissions: permissions.to_string(),
            owner:       caps["owner"].to_string(),
            group:       caps["group"].to_string(),
            date:        caps["date"].to_string(),
            time:        caps["time"].to_string(),
        },
    })
}

fn split_link<'a>(name: &'a str, separator: &str) -> (&'a str, Option<String>) {
    match name.split_once(separator) {
        Some((link, target)) => (link, Some(target.to_string())),
        None => (name, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::member::MemberKind;

    #[test]
    fn parses_gnu_listing() {
        let listing = "\
drwxr-xr-x root/root         0 2013-05-01 12:00 usr/
-rw-r--r-- root/root      1234 2013-05-01 12:00:01 usr/lib/app.jar
lrwxrwxrwx root/root         0 2013-05-01 12:00 usr/lib/current.jar -> app.jar
hrw-r--r-- root/root         0 2013-05-01 12:00 usr/lib/copy.jar link to usr/lib/app.jar
";
        let members = parse_listing(listing).unwrap();
        assert_eq!(members.len(), 4);

        assert_eq!(members[0].name, "usr/");
        assert!(members[0].is_dir());

        assert_eq!(members[1].name, "usr/lib/app.jar");
        assert_eq!(members[1].size, 1234);
        assert_eq!(members[1].mode, Some(0o644));
        assert!(members[1].is_file());

        assert_eq!(members[2].name, "usr/lib/current.jar");
        assert_eq!(members[2].link_target(), Some("app.jar"));

        assert_eq!(members[3].name, "usr/lib/copy.jar");
        assert_eq!(
            members[3].kind,
            MemberKind::HardLink {
                target: "usr/lib/app.jar".into()
            }
        );
    }

    fn docs_tar(dir: &Path) -> PathBuf {
        let path = dir.join("docs.tar");
        let mut builder = tar::Builder::new(std::fs::File::create(&path).unwrap());
        let mut header = tar::Header::new_gnu();
        header.set_entry_type(tar::EntryType::Directory);
        header.set_size(0);
        header.set_mode(0o755);
        builder.append_data(&mut header, "docs", std::io::empty()).unwrap();
        let mut header = tar::Header::new_gnu();
        header.set_size(7);
        header.set_mode(0o644);
        builder.append_data(&mut header, "docs/readme.txt", &b"read me"[..]).unwrap();
        builder.finish().unwrap();
        path
    }

    // Needs a system tar whose listing is the GNU/busybox column layout.
    #[cfg(target_os = "linux")]
    #[test]
    fn extracts_file_and_directory_under_root() {
        if jsnoop_platform::locate(TAR).is_err() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let path = docs_tar(dir.path());
        let root = dir.path().join("scratch");
        std::fs::create_dir(&root).unwrap();

        let (mut backend, members) = NativeTarBackend::open(&path).unwrap();
        assert_eq!(members.len(), 2);
        assert!(members[0].is_dir());
        assert_eq!(members[0].name.trim_end_matches('/'), "docs");
        assert_eq!(members[1].name, "docs/readme.txt");
        assert!(members[1].is_file());
        assert_eq!(members[1].size, 7);

        let file = backend.extract(&members[1], &root).unwrap();
        assert_eq!(file, root.join("docs/readme.txt"));
        assert_eq!(std::fs::read(&file).unwrap(), b"read me");

        let docs = backend.extract(&members[0], &root).unwrap();
        assert!(docs.starts_with(&root));
        assert!(docs.is_dir());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn extract_all_unpacks_everything() {
        if jsnoop_platform::locate(TAR).is_err() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let path = docs_tar(dir.path());
        let root = dir.path().join("scratch");
        std::fs::create_dir(&root).unwrap();

        let (mut backend, _) = NativeTarBackend::open(&path).unwrap();
        backend.extract_all(&root).unwrap();
        assert_eq!(std::fs::read(root.join("docs/readme.txt")).unwrap(), b"read me");
    }

    #[test]
    fn refuses_members_listed_by_another_backend() {
        let member = ArchiveMember {
            name: "a.txt".into(),
            kind: MemberKind::File,
            size: 1,
            mode: None,
            meta: MemberMeta::Tar {
                index:      0,
                entry_type: b'0',
            },
        };
        let mut backend = NativeTarBackend {
            tool: PathBuf::from(TAR),
            path: PathBuf::from("unused.tar"),
        };
        let err = backend.extract(&member, Path::new("/nonexistent")).unwrap_err();
        assert!(matches!(err, Error::ForeignMember { name } if name == "a.txt"));
    }

    #[test]
    fn keeps_owner_columns() {
        let members = parse_listing("-rw------- alice/staff 5 2020-01-02 03:04 notes.txt\n").unwrap();
        match &members[0].meta {
            MemberMeta::Native { owner, group, date, time, .. } => {
                assert_eq!(owner, "alice");
                assert_eq!(group, "staff");
                assert_eq!(date, "2020-01-02");
                assert_eq!(time, "03:04");
            }
            other => panic!("unexpected meta {other:?}"),
        }
    }

    #[test]
    fn names_with_spaces() {
        let members = parse_listing("-rw-r--r-- root/root 3 2020-01-02 03:04 dir/a file.txt\n").unwrap();
        assert_eq!(members[0].name, "dir/a file.txt");
    }

    #[test]
    fn skips_unrecognized_lines() {
        let listing = "\
tar: Removing leading `/' from member names
-rw-r--r-- root/root 3 2020-01-02 03:04 kept.txt
";
        let members = parse_listing(listing).unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].name, "kept.txt");
    }
}
