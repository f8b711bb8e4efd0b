//! `FlashTool` implementation that spawns esptool

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::io;
use std::path::Path;
use std::process::{Command, ExitStatus};
use std::str::FromStr;

use log::{debug, trace};
use thiserror::Error;

use crate::tool::{FlashTool, ToolStatus};
use crate::Error;

/// The executable that is looked up on `PATH` when no other tool is given
pub const DEFAULT_PROGRAM: &str = "esptool.py";

/// The elevated baud rate used when erasing and writing the flash
pub const DEFAULT_BAUD_RATE: u32 = 460_800;

const READ_MAC_COMMAND: &str = "read_mac";
const ERASE_FLASH_COMMAND: &str = "erase_flash";
const WRITE_FLASH_COMMAND: &str = "write_flash";

/// Makes the tool detect the size of the flash chip instead of requiring it
const FLASH_SIZE_DETECT: &str = "--flash_size=detect";

/// The flash offset the firmware image is written to
const FIRMWARE_OFFSET: &str = "0";

/// The SPI flash addressing mode passed to esptool
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum FlashMode {
    Qio,
    Qout,
    Dio,
    Dout,
}

impl FlashMode {
    /// The accepted string representations of all flash modes
    pub const VARIANTS: &'static [&'static str] = &["qio", "qout", "dio", "dout"];

    pub fn as_str(self) -> &'static str {
        match self {
            FlashMode::Qio => "qio",
            FlashMode::Qout => "qout",
            FlashMode::Dio => "dio",
            FlashMode::Dout => "dout",
        }
    }
}

impl Default for FlashMode {
    fn default() -> FlashMode {
        FlashMode::Dio
    }
}

impl fmt::Display for FlashMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("Unknown flash mode {:?} - expected one of qio, qout, dio or dout", _0)]
pub struct ParseFlashModeError(String);

impl FromStr for FlashMode {
    type Err = ParseFlashModeError;

    fn from_str(s: &str) -> Result<FlashMode, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "qio" => Ok(FlashMode::Qio),
            "qout" => Ok(FlashMode::Qout),
            "dio" => Ok(FlashMode::Dio),
            "dout" => Ok(FlashMode::Dout),
            _ => Err(ParseFlashModeError(s.to_owned())),
        }
    }
}

/// Runs esptool (or a compatible executable) as a child process for every operation.
#[derive(Debug, Clone)]
pub struct EspTool {
    program: OsString,
    name: String,
    baud_rate: u32,
    flash_mode: FlashMode,
}

impl Default for EspTool {
    fn default() -> EspTool {
        EspTool::new(DEFAULT_PROGRAM)
    }
}

impl EspTool {
    /// Creates a new `EspTool` that runs the given `program`.
    ///
    /// The program is resolved the same way a shell would, so a bare name is looked up on `PATH`.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use upy_flash::esptool::{EspTool, FlashMode};
    ///
    /// let tool = EspTool::new("esptool.py")
    ///     .baud_rate(115_200)
    ///     .flash_mode(FlashMode::Qio);
    /// ```
    pub fn new<S: AsRef<OsStr>>(program: S) -> EspTool {
        let program = program.as_ref().to_os_string();
        let name = program.to_string_lossy().into_owned();

        EspTool {
            program,
            name,
            baud_rate: DEFAULT_BAUD_RATE,
            flash_mode: FlashMode::default(),
        }
    }

    /// Sets the baud rate used for erasing and writing.
    pub fn baud_rate(mut self, baud_rate: u32) -> EspTool {
        self.baud_rate = baud_rate;
        self
    }

    /// Sets the flash mode used when writing.
    pub fn flash_mode(mut self, flash_mode: FlashMode) -> EspTool {
        self.flash_mode = flash_mode;
        self
    }

    pub fn read_mac_args(&self, device: &str) -> Vec<OsString> {
        vec!["--port".into(), device.into(), READ_MAC_COMMAND.into()]
    }

    pub fn erase_flash_args(&self, device: &str) -> Vec<OsString> {
        vec![
            "--port".into(),
            device.into(),
            "--baud".into(),
            self.baud_rate.to_string().into(),
            ERASE_FLASH_COMMAND.into(),
            FLASH_SIZE_DETECT.into(),
        ]
    }

    pub fn write_flash_args(&self, device: &str, firmware: &Path) -> Vec<OsString> {
        vec![
            "--port".into(),
            device.into(),
            "--baud".into(),
            self.baud_rate.to_string().into(),
            WRITE_FLASH_COMMAND.into(),
            FLASH_SIZE_DETECT.into(),
            "-fm".into(),
            self.flash_mode.as_str().into(),
            FIRMWARE_OFFSET.into(),
            firmware.as_os_str().to_os_string(),
        ]
    }

    /// Spawns the tool with `args` and waits for it to exit.
    fn run(&self, args: &[OsString]) -> Result<ToolStatus, Error> {
        debug!(
            "Running {} {}",
            self.name,
            args.iter()
                .map(|arg| arg.to_string_lossy())
                .collect::<Vec<_>>()
                .join(" ")
        );

        match Command::new(&self.program).args(args).status() {
            Ok(status) => {
                trace!("{} exited with {:?}", self.name, status);

                Ok(tool_status(status))
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!("Could not find {}: {}", self.name, err);

                Ok(ToolStatus::NotFound)
            }
            Err(err) => Err(Error::SpawnError {
                program: self.name.clone(),
                source: err,
            }),
        }
    }
}

/// Converts the exit status of a finished child process to a `ToolStatus`
fn tool_status(status: ExitStatus) -> ToolStatus {
    match status.code() {
        Some(0) => ToolStatus::Success,
        Some(code) => ToolStatus::ExitCode(code),
        None => ToolStatus::Terminated,
    }
}

impl FlashTool for EspTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn read_mac(&mut self, device: &str) -> Result<ToolStatus, Error> {
        self.run(&self.read_mac_args(device))
    }

    fn erase_flash(&mut self, device: &str) -> Result<ToolStatus, Error> {
        self.run(&self.erase_flash_args(device))
    }

    fn write_flash(&mut self, device: &str, firmware: &Path) -> Result<ToolStatus, Error> {
        self.run(&self.write_flash_args(device, firmware))
    }
}
