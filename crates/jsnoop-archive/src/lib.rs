//! Read-only access to zip and tar archives for recursive unpacking.
//!
//! # Architecture
//!
//! - `detect.rs` - Format detection from content
//! - `sanitize.rs` - Member name checks (zip-slip prevention)
//! - `scratch.rs` - Per-archive scratch directories
//! - `backend/` - Per-format listing and extraction
//! - `member.rs` - Member listing types

pub use backend::Archive;
pub use detect::{HEAD_LEN, TAIL_LEN, detect_format, detect_from_reader, detect_parts, detect_path};
pub use error::{Error, Result};
pub use format::{ArchiveFormat, Compression};
pub use member::{ArchiveMember, MemberKind, MemberMeta};
pub use options::ArchiveOptions;
pub use sanitize::{check_members, is_unsafe_name, resolve_in};
pub use scratch::ScratchDir;

mod backend;
mod detect;
mod error;
mod format;
pub mod member;
pub mod options;
mod sanitize;
mod scratch;
