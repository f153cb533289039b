use crate::handler::FileInfo;
use crate::record::{FileRecord, HandlerKind};

/// Any byte stream without a more specific handler.
#[derive(Debug)]
pub struct GenericFile {
    info: FileInfo,
}

impl GenericFile {
    pub fn new(info: FileInfo) -> Self { Self { info } }

    pub fn info(&self) -> &FileInfo { &self.info }

    pub fn describe(&self) -> FileRecord { self.info.record(HandlerKind::Generic, None) }
}
