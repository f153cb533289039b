use std::path::{Path, PathBuf};

use jsnoop_platform::Command;
use tracing::instrument;

use crate::context::Context;
use crate::error::HandlerError;
use crate::handler::FileInfo;
use crate::record::{FileRecord, HandlerKind, Payload};
use crate::source::ByteSource;

const SIGNER_EXTENSIONS: [&str; 2] = [".rsa", ".dsa"];

/// Turns a jar signature block into openssl's text dump. The signature is
/// not verified.
#[derive(Clone, Debug)]
pub struct SignatureDecoder {
    program: PathBuf,
}

impl Default for SignatureDecoder {
    fn default() -> Self { Self::new("openssl") }
}

impl SignatureDecoder {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path { &self.program }

    /// PKCS#7 DER first, then a bare X.509 certificate.
    #[instrument(skip(self))]
    pub fn decode(&self, path: &Path) -> Result<String, HandlerError> {
        let pkcs7 = Command::new(&self.program)
            .args(["pkcs7", "-inform", "DER", "-in"])
            .arg(path)
            .args(["-noout", "-print_certs", "-text"])
            .run();

        let stdout = match pkcs7 {
            Ok(stdout) => stdout,
            Err(e) => {
                tracing::debug!(cmd = e.command(), error = %e, "Not a PKCS#7 block, trying X.509");
                Command::new(&self.program)
                    .args(["x509", "-in"])
                    .arg(path)
                    .args(["-noout", "-text"])
                    .run()
                    .map_err(HandlerError::SignatureDecode)?
            }
        };
        Ok(String::from_utf8_lossy(&stdout).into_owned())
    }
}

#[derive(Debug)]
pub struct SignatureFile {
    info: FileInfo,
    text: String,
}

impl SignatureFile {
    pub fn new(
        ctx: &Context,
        info: FileInfo,
        name: &str,
        source: &ByteSource,
    ) -> Result<Self, HandlerError> {
        if !SIGNER_EXTENSIONS.contains(&info.file_type.as_str()) {
            return Err(HandlerError::UnsupportedSigner {
                name: name.to_string(),
            });
        }
        let materialized = source.materialize(name, ctx.options().scratch_root.as_deref())?;
        let text = ctx.decoder().decode(materialized.path())?;
        Ok(Self { info, text })
    }

    pub fn info(&self) -> &FileInfo { &self.info }

    pub fn text(&self) -> &str { &self.text }

    pub fn describe(&self) -> FileRecord {
        self.info
            .record(HandlerKind::Signature, Some(Payload::Signature(self.text.clone())))
    }
}
