use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;

use crate::format::{ArchiveFormat, Compression};

/// Bytes of leading content needed to decide; compressed tar streams need
/// enough input to inflate one 512-byte header.
pub const HEAD_LEN: usize = 64 * 1024;

/// Trailing bytes that can hold a zip end of central directory record: the
/// fixed 22-byte record plus the longest possible comment.
pub const TAIL_LEN: usize = END_RECORD_LEN + u16::MAX as usize;

const END_RECORD_LEN: usize = 22;
const END_RECORD_SIG: [u8; 4] = [0x50, 0x4B, 0x05, 0x06];
const BLOCK: usize = 512;

/// Decide from content alone whether `data`, a whole stream, is an archive
/// this crate can open. Zip is tried before tar.
pub fn detect_format(data: &[u8]) -> Option<ArchiveFormat> {
    let tail = &data[data.len().saturating_sub(TAIL_LEN)..];
    detect_parts(data, tail)
}

/// Same decision from the first [`HEAD_LEN`] and the last [`TAIL_LEN`] bytes
/// of a stream; the two may overlap.
///
/// A zip is recognized by its end of central directory record, so data in
/// front of the archive (self-extracting stubs, launcher scripts) is fine
/// while a stray `PK` signature at offset 0 is not enough.
pub fn detect_parts(head: &[u8], tail: &[u8]) -> Option<ArchiveFormat> {
    if has_end_record(tail) {
        return Some(ArchiveFormat::Zip);
    }
    let compression = Compression::detect(head);
    first_block(head, compression)
        .filter(|block| is_tar_header(block))
        .map(|_| ArchiveFormat::Tar(compression))
}

pub fn detect_from_reader<R: Read + Seek>(mut reader: R) -> io::Result<Option<ArchiveFormat>> {
    let mut head = Vec::with_capacity(HEAD_LEN);
    (&mut reader).take(HEAD_LEN as u64).read_to_end(&mut head)?;

    let len = reader.seek(SeekFrom::End(0))?;
    let start = len.saturating_sub(TAIL_LEN as u64);
    reader.seek(SeekFrom::Start(start))?;
    let mut tail = Vec::with_capacity((len - start) as usize);
    reader.read_to_end(&mut tail)?;

    Ok(detect_parts(&head, &tail))
}

pub fn detect_path(path: &Path) -> io::Result<Option<ArchiveFormat>> {
    detect_from_reader(File::open(path)?)
}

/// Search backwards for an end record whose comment runs exactly to the end
/// of `tail`.
fn has_end_record(tail: &[u8]) -> bool {
    if tail.len() < END_RECORD_LEN {
        return false;
    }
    (0..=tail.len() - END_RECORD_LEN).rev().any(|pos| {
        let record = &tail[pos..pos + END_RECORD_LEN];
        if record[..4] != END_RECORD_SIG {
            return false;
        }
        let entries_on_disk = u16::from_le_bytes([record[8], record[9]]);
        let entries_total = u16::from_le_bytes([record[10], record[11]]);
        let comment_len = u16::from_le_bytes([record[20], record[21]]) as usize;
        entries_on_disk <= entries_total && pos + END_RECORD_LEN + comment_len == tail.len()
    })
}

/// Decompress just enough of `data` to obtain the first tar block.
fn first_block(data: &[u8], compression: Compression) -> Option<[u8; BLOCK]> {
    let mut decoder = compression.decoder(data).ok()?;
    let mut block = [0u8; BLOCK];
    let mut filled = 0;
    while filled < BLOCK {
        match decoder.read(&mut block[filled..]) {
            Ok(0) => return None,
            Ok(n) => filled += n,
            Err(_) => return None,
        }
    }
    Some(block)
}

/// A ustar magic, or failing that a valid header checksum (v7 tar).
fn is_tar_header(block: &[u8; BLOCK]) -> bool {
    if block.iter().all(|&b| b == 0) {
        return false;
    }
    if &block[257..262] == b"ustar" {
        return true;
    }
    let Some(stored) = parse_octal(&block[148..156]) else {
        return false;
    };
    let computed: u32 = block
        .iter()
        .enumerate()
        .map(|(i, &b)| if (148..156).contains(&i) { u32::from(b' ') } else { u32::from(b) })
        .sum();
    stored == computed
}

fn parse_octal(field: &[u8]) -> Option<u32> {
    let text = std::str::from_utf8(field).ok()?;
    let text = text.trim_matches(|c: char| c == '\0' || c == ' ');
    if text.is_empty() {
        return None;
    }
    u32::from_str_radix(text, 8).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};

    fn tar_bytes() -> Vec<u8> {
        let mut builder = tar::Builder::new(Vec::new());
        let mut header = tar::Header::new_gnu();
        header.set_size(5);
        header.set_mode(0o644);
        builder.append_data(&mut header, "hello.txt", &b"hello"[..]).unwrap();
        builder.into_inner().unwrap()
    }

    fn zip_bytes(comment: &str) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = zip::write::SimpleFileOptions::default();
        writer.start_file("META-INF/MANIFEST.MF", options).unwrap();
        writer.write_all(b"Manifest-Version: 1.0\n").unwrap();
        writer.set_comment(comment);
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn detect_zip_format() {
        assert_eq!(detect_format(&zip_bytes("")), Some(ArchiveFormat::Zip));
    }

    #[test]
    fn detect_zip_with_comment() {
        assert_eq!(detect_format(&zip_bytes("built by jsnoop")), Some(ArchiveFormat::Zip));
    }

    #[test]
    fn detect_empty_zip() {
        let mut eocd = vec![0x50, 0x4B, 0x05, 0x06];
        eocd.extend_from_slice(&[0; 18]);
        assert_eq!(detect_format(&eocd), Some(ArchiveFormat::Zip));
    }

    #[test]
    fn local_header_alone_is_not_a_zip() {
        let junk = b"PK\x03\x04 this is not really a zip, just text after a signature";
        assert_eq!(detect_format(junk), None);
    }

    #[test]
    fn zip_behind_launcher_script() {
        let mut jar = b"#!/bin/sh\nexec java -jar \"$0\" \"$@\"\n".to_vec();
        jar.extend_from_slice(&zip_bytes(""));
        assert_eq!(detect_format(&jar), Some(ArchiveFormat::Zip));
    }

    #[test]
    fn zip_followed_by_padding_is_not_a_zip() {
        // A zip stored as the last member of a tar is followed by zero blocks.
        let mut data = zip_bytes("");
        data.extend_from_slice(&[0u8; 1024]);
        assert_eq!(detect_format(&data), None);
    }

    #[test]
    fn tar_holding_a_zip_is_a_tar() {
        let zip = zip_bytes("");
        let mut builder = tar::Builder::new(Vec::new());
        let mut header = tar::Header::new_gnu();
        header.set_size(zip.len() as u64);
        header.set_mode(0o644);
        builder.append_data(&mut header, "inner.zip", zip.as_slice()).unwrap();
        let tar = builder.into_inner().unwrap();
        assert_eq!(detect_format(&tar), Some(ArchiveFormat::Tar(Compression::None)));
    }

    #[test]
    fn detect_tar_plain_format() {
        let mut tar_header = [0u8; 512];
        tar_header[257..263].copy_from_slice(b"ustar\0");
        assert_eq!(
            detect_format(&tar_header),
            Some(ArchiveFormat::Tar(Compression::None))
        );
    }

    #[test]
    fn detect_v7_tar_by_checksum() {
        let mut block = [0u8; 512];
        block[..8].copy_from_slice(b"old.txt\0");
        let sum: u32 = block
            .iter()
            .enumerate()
            .map(|(i, &b)| if (148..156).contains(&i) { 32 } else { u32::from(b) })
            .sum();
        let field = format!("{sum:06o}\0 ");
        block[148..156].copy_from_slice(field.as_bytes());
        assert_eq!(detect_format(&block), Some(ArchiveFormat::Tar(Compression::None)));
    }

    #[test]
    fn detect_built_tar() {
        assert_eq!(
            detect_format(&tar_bytes()),
            Some(ArchiveFormat::Tar(Compression::None))
        );
    }

    #[test]
    fn detect_tar_gz_format() {
        let mut encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(&tar_bytes()).unwrap();
        let gz = encoder.finish().unwrap();
        assert_eq!(detect_format(&gz), Some(ArchiveFormat::Tar(Compression::Gzip)));
    }

    #[test]
    fn gzip_of_plain_text_is_not_an_archive() {
        let mut encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(&[b'x'; 2048]).unwrap();
        let gz = encoder.finish().unwrap();
        assert_eq!(detect_format(&gz), None);
    }

    #[test]
    fn detect_unknown_format() {
        let random_data = [0xDE, 0xAD, 0xBE, 0xEF, 0x00, 0x00, 0x00, 0x00];
        assert_eq!(detect_format(&random_data), None);
    }

    #[test]
    fn detect_truncated_tar_header() {
        let short_data = [0u8; 256];
        assert_eq!(detect_format(&short_data), None);
    }

    #[test]
    fn detect_all_zero_block() {
        assert_eq!(detect_format(&[0u8; 1024]), None);
    }

    #[test]
    fn class_file_is_not_an_archive() {
        let mut class = vec![0xCA, 0xFE, 0xBA, 0xBE, 0x00, 0x00, 0x00, 0x33];
        class.resize(600, 0x01);
        assert_eq!(detect_format(&class), None);
    }

    #[test]
    fn detect_from_reader_reads_prefix() {
        let cursor = Cursor::new(tar_bytes());
        assert_eq!(
            detect_from_reader(cursor).unwrap(),
            Some(ArchiveFormat::Tar(Compression::None))
        );
    }

    #[test]
    fn detect_from_reader_finds_end_record_past_prefix() {
        let mut jar = vec![b'#'; HEAD_LEN * 2];
        jar.push(b'\n');
        jar.extend_from_slice(&zip_bytes(""));
        assert_eq!(detect_from_reader(Cursor::new(jar)).unwrap(), Some(ArchiveFormat::Zip));
    }
}
