use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Algorithm, HashingReader, Hasher, MultiHasher, Result};

/// What to hash: a file on disk (streamed) or bytes already in memory.
#[derive(Clone, Copy, Debug)]
pub enum Input<'a> {
    Path(&'a Path),
    Bytes(&'a [u8]),
}

impl<'a> From<&'a Path> for Input<'a> {
    fn from(path: &'a Path) -> Self { Self::Path(path) }
}

impl<'a> From<&'a [u8]> for Input<'a> {
    fn from(bytes: &'a [u8]) -> Self { Self::Bytes(bytes) }
}

/// Lowercase hex digests of one byte stream.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Digests {
    pub md5:    String,
    pub sha1:   String,
    pub sha256: String,
    pub sha512: String,
}

impl Digests {
    /// Compute all four digests in a single pass over `input`.
    pub fn compute<'a>(input: impl Into<Input<'a>>) -> Result<Self> {
        match input.into() {
            Input::Path(path) => {
                let file = BufReader::with_capacity(8192, File::open(path)?);
                let mut reader = HashingReader::new(file, MultiHasher::new());
                io::copy(&mut reader, &mut io::sink())?;
                let (_, hasher) = reader.into_parts();
                Ok(hasher.finalize())
            }
            Input::Bytes(bytes) => {
                let mut hasher = MultiHasher::new();
                hasher.update(bytes);
                Ok(hasher.finalize())
            }
        }
    }

    pub fn get(&self, algorithm: Algorithm) -> &str {
        match algorithm {
            Algorithm::Md5 => &self.md5,
            Algorithm::Sha1 => &self.sha1,
            Algorithm::Sha256 => &self.sha256,
            Algorithm::Sha512 => &self.sha512,
        }
    }
}

/// Hex digest of `input` with a single algorithm.
pub fn hexdigest<'a>(input: impl Into<Input<'a>>, algorithm: Algorithm) -> Result<String> {
    match input.into() {
        Input::Path(path) => {
            let mut file = File::open(path)?;
            let digest = match algorithm {
                Algorithm::Md5 => stream::<md5::Md5>(&mut file)?,
                Algorithm::Sha1 => stream::<sha1::Sha1>(&mut file)?,
                Algorithm::Sha256 => stream::<sha2::Sha256>(&mut file)?,
                Algorithm::Sha512 => stream::<sha2::Sha512>(&mut file)?,
            };
            Ok(hex::encode(digest))
        }
        Input::Bytes(bytes) => Ok(hex::encode(algorithm.digest(bytes))),
    }
}

fn stream<D: digest::Digest + Send>(file: &mut File) -> io::Result<Vec<u8>> {
    let mut reader = HashingReader::new(file, crate::DigestHasher::<D>::new());
    io::copy(&mut reader, &mut io::sink())?;
    let (_, hasher) = reader.into_parts();
    Ok(hasher.finalize())
}
