use nix::errno::Errno;
use std::ffi::NulError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the shell's components.
///
/// Every variant is recoverable: the main loop reports it and reads the next
/// line. Running out of memory is not represented here, it aborts the process.
#[derive(Debug, Error)]
pub enum ShellError {
    #[error("fork failed: {0}")]
    Fork(#[source] Errno),

    #[error("wait failed: {0}")]
    Wait(#[source] Errno),

    #[error("argument contains a NUL byte")]
    NulByte(#[from] NulError),

    #[error("bg: missing command")]
    MissingCommand,

    #[error("cd failed: {}: {source}", path.display())]
    ChangeDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cd failed: no home directory")]
    NoHome,

    #[error("parse error: {0}")]
    Parse(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, ShellError>;
