use std::io;

use thiserror::Error;

use crate::tool::ToolStatus;

/// The exit status used for every failure that doesn't carry its own exit code
pub const EXIT_FAILURE: i32 = 1;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{} not found - is it installed and in your PATH?", _0)]
    ToolNotFound(String),
    #[error("Could not communicate with device {} ({})", device, status)]
    CommunicationError { device: String, status: ToolStatus },
    #[error("Erasing the flash of device {} failed ({})", device, status)]
    EraseFailed { device: String, status: ToolStatus },
    #[error("The firmware could not be written ({})", _0)]
    WriteFailed(ToolStatus),
    #[error("Could not run {}: {}", program, source)]
    SpawnError { program: String, source: io::Error },
}

impl Error {
    /// Returns the process exit status that should be reported for this error.
    ///
    /// A failed write propagates the exit code of the flashing tool, everything else exits with
    /// `EXIT_FAILURE`.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::WriteFailed(ToolStatus::ExitCode(code)) => *code,
            _ => EXIT_FAILURE,
        }
    }
}
