use std::fmt;
use std::path::Path;

use crate::Error;

/// The exit status a shell reports when it could not find the command it was asked to run
pub const COMMAND_NOT_FOUND: i32 = 127;

/// The outcome of a single invocation of a flashing tool.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ToolStatus {
    /// The tool ran and exited with status 0
    Success,
    /// The tool ran and exited with the given non-zero status
    ExitCode(i32),
    /// The tool was terminated without an exit code, e.g. by a signal
    Terminated,
    /// The tool executable could not be started because it doesn't exist
    NotFound,
}

impl fmt::Display for ToolStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolStatus::Success => write!(f, "exit status 0"),
            ToolStatus::ExitCode(code) => write!(f, "exit status {}", code),
            ToolStatus::Terminated => write!(f, "terminated by signal"),
            ToolStatus::NotFound => write!(f, "executable not found"),
        }
    }
}

/// An external utility that knows how to talk to the device.
///
/// Each operation blocks until the tool is done and reports how it went. An `Err` is only
/// returned when the tool could not be started at all for a reason other than it being absent.
pub trait FlashTool {
    /// The name of the tool, as shown to the user
    fn name(&self) -> &str;

    /// Reads the MAC address of `device` to check that it can be reached.
    fn read_mac(&mut self, device: &str) -> Result<ToolStatus, Error>;

    /// Erases the whole flash of `device`.
    fn erase_flash(&mut self, device: &str) -> Result<ToolStatus, Error>;

    /// Writes the contents of `firmware` to the flash of `device` at offset 0.
    fn write_flash(&mut self, device: &str, firmware: &Path) -> Result<ToolStatus, Error>;
}

impl<T: FlashTool + ?Sized> FlashTool for &mut T {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn read_mac(&mut self, device: &str) -> Result<ToolStatus, Error> {
        (**self).read_mac(device)
    }

    fn erase_flash(&mut self, device: &str) -> Result<ToolStatus, Error> {
        (**self).erase_flash(device)
    }

    fn write_flash(&mut self, device: &str, firmware: &Path) -> Result<ToolStatus, Error> {
        (**self).write_flash(device, firmware)
    }
}
