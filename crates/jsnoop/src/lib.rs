//! Recursive unpacking of nested archives into provenance manifests.
//!
//! Every byte stream reachable from an input file (the file itself, the
//! members of any archive it is, the members of archives inside those, and so
//! on) becomes one [`FileRecord`] carrying md5, sha1, sha256 and sha512 of its
//! content and the sha512 of the archive it came from.
//!
//! # Example
//!
//! ```no_run
//! use jsnoop::{Context, Package, WalkOptions, manifest_file_name};
//! use std::path::Path;
//!
//! let ctx = Context::new(WalkOptions::default().process_all_files(true));
//! let input = Path::new("app.war");
//! let package = Package::build(&ctx, input)?;
//! let out = std::fs::File::create(manifest_file_name(input))?;
//! package.manifest().write_lines(out)?;
//! # Ok::<(), jsnoop::Error>(())
//! ```
//!
//! # Architecture
//!
//! - `dispatch.rs` - Content-first handler selection
//! - `handler/` - Generic, manifest, signature, class and archive handlers
//! - `package.rs` - Tree walker
//! - `record.rs` - Manifest records and persistence
//! - `options.rs` / `context.rs` - Walk configuration and shared services

pub use context::Context;
pub use dispatch::{Resolution, extension_kind, is_known_type, resolve, resolve_source};
pub use error::{Error, HandlerError, Result};
pub use handler::{
    ArchiveFile, ChildObject, ClassFile, ClassHeader, FileInfo, GenericFile, Handler, ManifestFile,
    SignatureDecoder, SignatureFile, parse_manifest, version_string,
};
pub use jsnoop_checksum::{Algorithm, Digests, hexdigest};
pub use options::WalkOptions;
pub use package::Package;
pub use record::{FileRecord, HandlerKind, Manifest, Payload, manifest_file_name};
pub use source::{ByteSource, Materialized};

mod context;
pub mod dispatch;
mod error;
pub mod handler;
pub mod options;
mod package;
pub mod record;
mod source;
