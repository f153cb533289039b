//! External tool invocation.
//!
//! The archive and signature code shell out to `tar` and `openssl`; this
//! crate keeps process spawning, lookup and exit-status handling in one place.

pub use command::{Command, locate};
pub use error::{Error, Result};

pub mod command;
mod error;
