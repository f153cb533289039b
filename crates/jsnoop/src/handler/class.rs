use crate::error::HandlerError;
use crate::handler::FileInfo;
use crate::record::{FileRecord, HandlerKind, Payload};
use crate::source::ByteSource;

const HEADER_LEN: usize = 8;

/// Magic and version words at the start of a compiled Java class.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClassHeader {
    /// Stored as found; `CA FE BA BE` is not enforced.
    pub magic: [u8; 4],
    pub minor: u16,
    pub major: u16,
}

impl ClassHeader {
    pub fn parse(bytes: &[u8]) -> Result<Self, HandlerError> {
        let Some(header) = bytes.get(..HEADER_LEN) else {
            return Err(HandlerError::TruncatedClassHeader { len: bytes.len() });
        };
        Ok(Self {
            magic: [header[0], header[1], header[2], header[3]],
            minor: u16::from_be_bytes([header[4], header[5]]),
            major: u16::from_be_bytes([header[6], header[7]]),
        })
    }

    /// `(major, minor)`
    pub fn version(&self) -> (u16, u16) { (self.major, self.minor) }

    pub fn version_string(&self) -> &'static str { version_string(self.major) }
}

/// Release name for a class file major version.
pub fn version_string(major: u16) -> &'static str {
    match major {
        0x2D => "JDK 1.1",
        0x2E => "JDK 1.2",
        0x2F => "JDK 1.3",
        0x30 => "JDK 1.4",
        0x31 => "JSE5",
        0x32 => "JSE6",
        0x33 => "JSE7",
        _ => "Unknown",
    }
}

#[derive(Debug)]
pub struct ClassFile {
    info:   FileInfo,
    header: ClassHeader,
}

impl ClassFile {
    pub fn new(info: FileInfo, source: &ByteSource) -> Result<Self, HandlerError> {
        let header = ClassHeader::parse(&source.prefix(HEADER_LEN)?)?;
        Ok(Self { info, header })
    }

    pub fn info(&self) -> &FileInfo { &self.info }

    pub fn header(&self) -> &ClassHeader { &self.header }

    pub fn name(&self) -> &str { &self.info.name }

    pub fn describe(&self) -> FileRecord {
        self.info.record(
            HandlerKind::Class,
            Some(Payload::Class {
                magic:          self.header.magic,
                version:        self.header.version(),
                version_string: self.header.version_string().to_string(),
            }),
        )
    }
}
