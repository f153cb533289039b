use std::io;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("'{cmd}' is not installed or not on PATH")]
    CommandNotFound { cmd: String },

    #[error("could not start '{cmd}': {source}")]
    CommandFailed { cmd: String, source: io::Error },

    /// The tool ran but reported failure; `stderr` is trimmed.
    #[error("'{cmd}' exited with {status}: {stderr}")]
    NonZeroExit {
        cmd:    String,
        status: String,
        stderr: String,
    },
}

impl Error {
    /// The command line that failed.
    pub fn command(&self) -> &str {
        match self {
            Self::CommandNotFound { cmd } | Self::CommandFailed { cmd, .. } | Self::NonZeroExit { cmd, .. } => {
                cmd
            }
        }
    }
}
