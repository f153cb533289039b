use std::collections::BTreeMap;

use crate::error::HandlerError;
use crate::handler::FileInfo;
use crate::record::{FileRecord, HandlerKind, Payload};
use crate::source::ByteSource;

/// A jar `MANIFEST.MF` and its main-section headers.
#[derive(Debug)]
pub struct ManifestFile {
    info:    FileInfo,
    headers: BTreeMap<String, String>,
}

impl ManifestFile {
    pub fn new(info: FileInfo, source: &ByteSource) -> Result<Self, HandlerError> {
        let bytes = source.read_all()?;
        let headers = parse_manifest(&String::from_utf8_lossy(&bytes));
        Ok(Self { info, headers })
    }

    pub fn info(&self) -> &FileInfo { &self.info }

    pub fn headers(&self) -> &BTreeMap<String, String> { &self.headers }

    pub fn describe(&self) -> FileRecord {
        self.info
            .record(HandlerKind::Manifest, Some(Payload::Manifest(self.headers.clone())))
    }
}

/// Parse the main section of a manifest.
///
/// A line starting with a space continues the previous value. The first
/// colon splits name from value. A blank line after a header ends the main
/// section. Lines that fit none of these are ignored.
pub fn parse_manifest(text: &str) -> BTreeMap<String, String> {
    let mut headers = BTreeMap::new();
    let mut pending: Option<(String, String)> = None;

    for line in text.lines() {
        if let Some(continuation) = line.strip_prefix(' ') {
            if let Some((_, value)) = pending.as_mut() {
                value.push_str(continuation.trim());
            }
        } else if line.trim().is_empty() {
            if pending.is_some() {
                break;
            }
        } else if let Some((name, value)) = line.split_once(':') {
            if let Some((name, value)) = pending.take() {
                headers.insert(name, value);
            }
            pending = Some((name.trim().to_string(), value.trim().to_string()));
        }
    }

    if let Some((name, value)) = pending {
        headers.insert(name, value);
    }
    headers
}
