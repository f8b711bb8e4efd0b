//! Flash MicroPython firmware onto ESP8266 boards.
//!
//! The device is never talked to directly. Probing, erasing and writing is delegated to an
//! external flashing tool (esptool by default) through the `FlashTool` trait, and `Flasher`
//! sequences those steps and turns their outcome into an `Error`.

mod error;
pub mod esptool;
pub mod flasher;
pub mod tool;

pub use error::{Error, EXIT_FAILURE};
pub use esptool::{EspTool, FlashMode};
pub use flasher::{ErasePolicy, Flasher};
pub use tool::{FlashTool, ToolStatus};
