//! Content digests for files and in-memory buffers.
//!
//! Every record in a manifest carries md5, sha1, sha256 and sha512 of its
//! bytes. [`Digests::compute`] produces all four in one pass; [`hexdigest`]
//! serves callers that need a single algorithm.
//!
//! # Example
//!
//! ```
//! use jsnoop_checksum::{Algorithm, Digests, hexdigest};
//!
//! let digests = Digests::compute(&b"hello world"[..]).unwrap();
//! let sha256 = hexdigest(&b"hello world"[..], Algorithm::Sha256).unwrap();
//! assert_eq!(digests.sha256, sha256);
//! ```

pub use self::digests::{Digests, Input, hexdigest};
pub use self::error::{ChecksumError, Result};
pub use self::hasher::{Algorithm, DigestHasher, Hasher, MultiHasher};
pub use self::reader::HashingReader;

mod digests;
mod error;
mod hasher;
mod reader;
