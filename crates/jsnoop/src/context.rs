use jsnoop_archive::ArchiveOptions;

use crate::handler::SignatureDecoder;
use crate::options::WalkOptions;

/// Services shared by every handler of a walk. Built once by the caller and
/// passed by reference; independent walks may share one across threads.
#[derive(Clone, Debug, Default)]
pub struct Context {
    options: WalkOptions,
    decoder: SignatureDecoder,
}

impl Context {
    pub fn new(options: WalkOptions) -> Self {
        let decoder = SignatureDecoder::new(options.openssl.clone());
        Self { options, decoder }
    }

    pub fn options(&self) -> &WalkOptions { &self.options }

    pub fn decoder(&self) -> &SignatureDecoder { &self.decoder }

    pub fn archive_options(&self) -> ArchiveOptions { self.options.archive_options() }
}
