use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use jsnoop_archive::{Archive, ArchiveFormat, ArchiveOptions, Compression, Error, MemberKind};
use zip::write::SimpleFileOptions;

fn build_zip(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    let mut writer = zip::ZipWriter::new(File::create(&path).unwrap());
    let options = SimpleFileOptions::default();
    writer.add_directory("META-INF/", options).unwrap();
    writer.start_file("META-INF/MANIFEST.MF", options).unwrap();
    writer.write_all(b"Manifest-Version: 1.0\n").unwrap();
    writer.start_file("com/example/Main.class", options).unwrap();
    writer.write_all(&[0xCA, 0xFE, 0xBA, 0xBE, 0, 0, 0, 0x33]).unwrap();
    writer.add_symlink("latest", "com/example/Main.class", options).unwrap();
    writer.finish().unwrap();
    path
}

fn build_tar(dir: &Path, name: &str, entries: &[(&str, &str)]) -> PathBuf {
    let path = dir.join(name);
    let mut builder = tar::Builder::new(File::create(&path).unwrap());
    for (entry_name, data) in entries {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_entry_type(tar::EntryType::Regular);
        // Bypass Builder path validation so traversal names can be written.
        let bytes = header.as_mut_bytes();
        bytes[..100].fill(0);
        bytes[..entry_name.len()].copy_from_slice(entry_name.as_bytes());
        header.set_cksum();
        builder.append(&header, data.as_bytes()).unwrap();
    }
    builder.finish().unwrap();
    path
}

#[test]
fn open_zip_lists_members_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = build_zip(dir.path(), "app.jar");

    let archive = Archive::open(&path, &ArchiveOptions::default()).unwrap();
    assert_eq!(archive.format(), ArchiveFormat::Zip);
    assert!(!archive.is_native());
    assert_eq!(
        archive.members(),
        vec!["META-INF/", "META-INF/MANIFEST.MF", "com/example/Main.class", "latest"]
    );

    let info = archive.infolist();
    assert!(archive.is_dir(&info[0]));
    assert!(archive.is_file(&info[1]));
    assert!(archive.is_link(&info[3]));
    assert_eq!(info[3].link_target(), Some("com/example/Main.class"));
}

#[test]
fn extract_zip_member_into_scratch() {
    let dir = tempfile::tempdir().unwrap();
    let path = build_zip(dir.path(), "app.jar");
    let options = ArchiveOptions::default().scratch_root(dir.path().join("scratch"));

    let mut archive = Archive::open(&path, &options).unwrap();
    let manifest = archive.infolist()[1].clone();
    let extracted = archive.extract(&manifest).unwrap();

    assert!(extracted.starts_with(archive.scratch_dir()));
    assert_eq!(fs::read(&extracted).unwrap(), b"Manifest-Version: 1.0\n");
}

#[test]
fn zip_links_are_not_materialized() {
    let dir = tempfile::tempdir().unwrap();
    let path = build_zip(dir.path(), "app.jar");

    let mut archive = Archive::open(&path, &ArchiveOptions::default()).unwrap();
    let root = archive.extract_all().unwrap();
    assert!(root.join("META-INF/MANIFEST.MF").is_file());
    assert!(root.join("META-INF").is_dir());
    assert!(fs::symlink_metadata(root.join("latest")).is_err());
}

#[test]
fn scratch_removed_when_archive_dropped() {
    let dir = tempfile::tempdir().unwrap();
    let path = build_zip(dir.path(), "app.jar");

    let mut archive = Archive::open(&path, &ArchiveOptions::default()).unwrap();
    archive.extract_all().unwrap();
    let scratch = archive.scratch_dir().to_path_buf();
    assert!(scratch.exists());

    drop(archive);
    assert!(!scratch.exists());
}

#[test]
fn close_removes_scratch() {
    let dir = tempfile::tempdir().unwrap();
    let path = build_zip(dir.path(), "app.jar");

    let archive = Archive::open(&path, &ArchiveOptions::default()).unwrap();
    let scratch = archive.scratch_dir().to_path_buf();
    archive.close().unwrap();
    assert!(!scratch.exists());
}

#[test]
fn open_tar_and_extract_member() {
    let dir = tempfile::tempdir().unwrap();
    let path = build_tar(
        dir.path(),
        "bundle.tar",
        &[("docs/readme.txt", "read me"), ("lib/app.jar", "not really a jar")],
    );

    let mut archive = Archive::open(&path, &ArchiveOptions::default()).unwrap();
    assert_eq!(archive.format(), ArchiveFormat::Tar(Compression::None));
    assert_eq!(archive.members(), vec!["docs/readme.txt", "lib/app.jar"]);
    assert_eq!(archive.infolist()[0].kind, MemberKind::File);
    assert_eq!(archive.infolist()[0].size, 7);

    let member = archive.infolist()[1].clone();
    let extracted = archive.extract(&member).unwrap();
    assert_eq!(fs::read(extracted).unwrap(), b"not really a jar");
}

#[test]
fn open_tar_gz() {
    let dir = tempfile::tempdir().unwrap();
    let plain = build_tar(dir.path(), "bundle.tar", &[("a.txt", "alpha")]);
    let gz_path = dir.path().join("bundle.tgz");
    let mut encoder = flate2::write::GzEncoder::new(
        File::create(&gz_path).unwrap(),
        flate2::Compression::default(),
    );
    encoder.write_all(&fs::read(plain).unwrap()).unwrap();
    encoder.finish().unwrap();

    let mut archive = Archive::open(&gz_path, &ArchiveOptions::default()).unwrap();
    assert_eq!(archive.format(), ArchiveFormat::Tar(Compression::Gzip));
    let member = archive.infolist()[0].clone();
    assert_eq!(fs::read(archive.extract(&member).unwrap()).unwrap(), b"alpha");
}

#[test]
fn tar_hard_link_reads_target_bytes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("links.tar");
    let mut builder = tar::Builder::new(File::create(&path).unwrap());
    let mut header = tar::Header::new_gnu();
    header.set_size(8);
    header.set_mode(0o644);
    builder.append_data(&mut header, "bin/orig.sh", &b"echo hi\n"[..]).unwrap();
    let mut link = tar::Header::new_gnu();
    link.set_entry_type(tar::EntryType::Link);
    link.set_size(0);
    link.set_mode(0o644);
    builder.append_link(&mut link, "bin/copy.sh", "bin/orig.sh").unwrap();
    let mut dangling = tar::Header::new_gnu();
    dangling.set_entry_type(tar::EntryType::Link);
    dangling.set_size(0);
    builder.append_link(&mut dangling, "bin/lost.sh", "bin/missing.sh").unwrap();
    builder.finish().unwrap();
    drop(builder);

    let mut archive = Archive::open(&path, &ArchiveOptions::default()).unwrap();
    let copy = archive.infolist()[1].clone();
    assert_eq!(
        copy.kind,
        MemberKind::HardLink {
            target: "bin/orig.sh".into()
        }
    );
    assert!(archive.is_link(&copy));
    assert_eq!(archive.content_member(&copy).map(|m| m.name.as_str()), Some("bin/orig.sh"));
    assert_eq!(fs::read(archive.extract(&copy).unwrap()).unwrap(), b"echo hi\n");

    let lost = archive.infolist()[2].clone();
    assert!(archive.content_member(&lost).is_none());
}

#[test]
fn zip_behind_launcher_script_opens() {
    let dir = tempfile::tempdir().unwrap();
    let plain = build_zip(dir.path(), "plain.jar");
    let mut bytes = b"#!/bin/sh\nexec java -jar \"$0\" \"$@\"\n".to_vec();
    bytes.extend_from_slice(&fs::read(plain).unwrap());
    let path = dir.path().join("app.jar");
    fs::write(&path, bytes).unwrap();

    let mut archive = Archive::open(&path, &ArchiveOptions::default()).unwrap();
    assert_eq!(archive.format(), ArchiveFormat::Zip);
    let manifest = archive.infolist()[1].clone();
    assert_eq!(manifest.name, "META-INF/MANIFEST.MF");
    assert_eq!(fs::read(archive.extract(&manifest).unwrap()).unwrap(), b"Manifest-Version: 1.0\n");
}

#[test]
fn unsafe_tar_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = build_tar(
        dir.path(),
        "evil.tar",
        &[("ok.txt", "fine"), ("../../etc/passwd", "root:x:0:0")],
    );

    let err = Archive::open(&path, &ArchiveOptions::default()).unwrap_err();
    assert!(err.is_unsafe());
    match err {
        Error::UnsafeArchive { member, .. } => assert_eq!(member, "../../etc/passwd"),
        other => panic!("expected UnsafeArchive, got {other:?}"),
    }
}

#[test]
fn absolute_zip_member_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("evil.zip");
    let mut writer = zip::ZipWriter::new(File::create(&path).unwrap());
    writer.start_file("/etc/passwd", SimpleFileOptions::default()).unwrap();
    writer.write_all(b"root:x:0:0").unwrap();
    writer.finish().unwrap();

    let err = Archive::open(&path, &ArchiveOptions::default()).unwrap_err();
    assert!(matches!(err, Error::UnsafeArchive { .. }));
}

#[test]
fn unsafe_tar_allowed_stays_inside_scratch() {
    let dir = tempfile::tempdir().unwrap();
    let path = build_tar(dir.path(), "evil.tar", &[("../../escape.txt", "caught")]);
    let options = ArchiveOptions::default().allow_unsafe_extraction(true);

    let mut archive = Archive::open(&path, &options).unwrap();
    let member = archive.infolist()[0].clone();
    let extracted = archive.extract(&member).unwrap();

    assert!(extracted.starts_with(archive.scratch_dir()));
    assert_eq!(fs::read(extracted).unwrap(), b"caught");
}

#[test]
fn plain_file_is_unknown_archive_type() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.txt");
    fs::write(&path, b"just some text").unwrap();

    let err = Archive::open(&path, &ArchiveOptions::default()).unwrap_err();
    assert!(matches!(err, Error::UnknownArchiveType { .. }));
}

#[test]
fn corrupt_tar_without_fallback_reports_structured_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.tar");
    fs::write(&path, vec![0x41u8; 1024]).unwrap();
    let options = ArchiveOptions::default().native_fallback(false);

    let err = Archive::open_as(&path, ArchiveFormat::Tar(Compression::None), &options).unwrap_err();
    assert!(!matches!(err, Error::ArchiveOpen { .. }));
}

#[test]
fn corrupt_tar_reports_both_failures() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.tar");
    fs::write(&path, vec![0x41u8; 1024]).unwrap();

    let err = Archive::open_as(&path, ArchiveFormat::Tar(Compression::None), &ArchiveOptions::default())
        .unwrap_err();
    match err {
        Error::ArchiveOpen { native, .. } => assert!(matches!(*native, Error::NativeTar { .. })),
        other => panic!("expected ArchiveOpen, got {other:?}"),
    }
}
