use crate::error::{Error, Result};
use std::ffi::OsStr;
use std::path::PathBuf;
use std::process::{Command as StdCommand, Output};

/// Resolve `program` against `PATH`, or accept it as-is when it is already a path.
pub fn locate(program: impl AsRef<OsStr>) -> Result<PathBuf> {
    let program = program.as_ref();
    which::which(program).map_err(|_| Error::CommandNotFound {
        cmd: program.to_string_lossy().into_owned(),
    })
}

#[derive(Debug)]
pub struct Command {
    inner:   StdCommand,
    program: String,
}

impl Command {
    pub fn new(program: impl AsRef<OsStr>) -> Self {
        let program = program.as_ref();
        Self {
            inner:   StdCommand::new(program),
            program: program.to_string_lossy().into_owned(),
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.inner.arg(arg);
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.inner.args(args);
        self
    }

    pub fn env<K, V>(mut self, key: K, val: V) -> Self
    where
        K: AsRef<OsStr>,
        V: AsRef<OsStr>,
    {
        self.inner.env(key, val);
        self
    }

    /// Program name plus arguments, for error messages and logs.
    pub fn display(&self) -> String {
        let mut line = self.program.clone();
        for arg in self.inner.get_args() {
            line.push(' ');
            line.push_str(&arg.to_string_lossy());
        }
        line
    }

    /// Run to completion and capture output, whatever the exit status.
    pub fn output(&mut self) -> Result<Output> {
        self.inner.output().map_err(|e| Error::CommandFailed {
            cmd:    self.display(),
            source: e,
        })
    }

    /// Run to completion and return stdout, treating a non-zero exit as an error.
    pub fn run(mut self) -> Result<Vec<u8>> {
        tracing::trace!(cmd = %self.display(), "Running external command");
        let output = self.output()?;
        if output.status.success() {
            Ok(output.stdout)
        } else {
            Err(Error::NonZeroExit {
                cmd:    self.display(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}
