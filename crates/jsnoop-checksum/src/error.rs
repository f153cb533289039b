use std::io;

#[derive(Debug, thiserror::Error)]
pub enum ChecksumError {
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, ChecksumError>;
