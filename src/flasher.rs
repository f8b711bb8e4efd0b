use std::path::Path;

use log::{info, warn};

use crate::tool::{FlashTool, ToolStatus, COMMAND_NOT_FOUND};
use crate::Error;

/// What to do when erasing the flash fails
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ErasePolicy {
    /// Log the failure and write the firmware anyway
    Ignore,
    /// Abort before writing the firmware
    Fatal,
}

impl Default for ErasePolicy {
    fn default() -> ErasePolicy {
        ErasePolicy::Ignore
    }
}

/// Drives a `FlashTool` through probing, erasing and writing a device.
#[derive(Debug)]
pub struct Flasher<T> {
    tool: T,
    erase_policy: ErasePolicy,
}

impl<T: FlashTool> Flasher<T> {
    pub fn new(tool: T) -> Flasher<T> {
        Flasher {
            tool,
            erase_policy: ErasePolicy::default(),
        }
    }

    /// Sets how a failed erase is handled.
    pub fn erase_policy(mut self, erase_policy: ErasePolicy) -> Flasher<T> {
        self.erase_policy = erase_policy;
        self
    }

    /// Checks that the tool is present and that `device` responds.
    ///
    /// This is the only step where a shell's "command not found" exit status is taken to mean
    /// that the tool is missing.
    pub fn probe(&mut self, device: &str) -> Result<(), Error> {
        info!("Probing device {}", device);

        match self.tool.read_mac(device)? {
            ToolStatus::Success => Ok(()),
            ToolStatus::NotFound => Err(Error::ToolNotFound(self.tool.name().to_owned())),
            ToolStatus::ExitCode(COMMAND_NOT_FOUND) if cfg!(unix) => {
                Err(Error::ToolNotFound(self.tool.name().to_owned()))
            }
            status => Err(Error::CommunicationError {
                device: device.to_owned(),
                status,
            }),
        }
    }

    /// Erases the flash of `device`.
    ///
    /// With `ErasePolicy::Ignore` this never fails; the outcome is only logged.
    pub fn erase(&mut self, device: &str) -> Result<(), Error> {
        info!("Erasing flash of device {}", device);

        let result = self.tool.erase_flash(device);

        let status = match (result, self.erase_policy) {
            (Ok(ToolStatus::Success), _) => return Ok(()),
            (Ok(status), ErasePolicy::Fatal) => status,
            (Err(err), ErasePolicy::Fatal) => return Err(err),
            (Ok(status), ErasePolicy::Ignore) => {
                warn!("Erasing flash of {} failed ({}), continuing", device, status);
                return Ok(());
            }
            (Err(err), ErasePolicy::Ignore) => {
                warn!("Erasing flash of {} failed: {}, continuing", device, err);
                return Ok(());
            }
        };

        match status {
            ToolStatus::NotFound => Err(Error::ToolNotFound(self.tool.name().to_owned())),
            status => Err(Error::EraseFailed {
                device: device.to_owned(),
                status,
            }),
        }
    }

    /// Writes `firmware` to the flash of `device` at offset 0.
    ///
    /// Any exit status other than 0 is a `WriteFailed` carrying that status.
    pub fn write(&mut self, device: &str, firmware: &Path) -> Result<(), Error> {
        info!("Writing {} to device {}", firmware.display(), device);

        match self.tool.write_flash(device, firmware)? {
            ToolStatus::Success => Ok(()),
            ToolStatus::NotFound => Err(Error::ToolNotFound(self.tool.name().to_owned())),
            status => Err(Error::WriteFailed(status)),
        }
    }

    /// Probes, erases and writes `firmware` to `device`, stopping at the first failure.
    pub fn flash(&mut self, device: &str, firmware: &Path) -> Result<(), Error> {
        self.probe(device)?;
        self.erase(device)?;
        self.write(device, firmware)
    }
}
