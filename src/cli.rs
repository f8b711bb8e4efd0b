use std::path::PathBuf;

use structopt::StructOpt;
use upy_flash::FlashMode;

fn parse_baud_rate(s: &str) -> Result<u32, String> {
    match s.parse::<u32>() {
        Ok(0) => Err("the baud rate must be greater than 0".to_owned()),
        Ok(baud_rate) => Ok(baud_rate),
        Err(err) => Err(format!("invalid baud rate {:?}: {}", s, err)),
    }
}

#[derive(StructOpt, Debug)]
pub struct Opts {
    /// The serial device the board is connected to
    pub device: String,
    /// The firmware image to write
    #[structopt(name = "firmware-file", parse(from_os_str))]
    pub firmware: PathBuf,

    /// The flashing tool to run
    #[structopt(
        env = "ESPTOOL",
        short = "t",
        long = "tool",
        default_value = "esptool.py"
    )]
    pub tool: String,
    /// The serial baud rate to use when erasing and writing
    #[structopt(
        env = "BAUD_RATE",
        short = "b",
        long = "baud-rate",
        default_value = "460800",
        parse(try_from_str = parse_baud_rate)
    )]
    pub baud_rate: u32,
    /// The flash mode to write the firmware with
    #[structopt(
        env = "FLASH_MODE",
        short = "m",
        long = "flash-mode",
        default_value = "dio",
        possible_values = FlashMode::VARIANTS,
        case_insensitive = true
    )]
    pub flash_mode: FlashMode,
    /// Abort without writing when erasing the flash fails
    #[structopt(long = "strict-erase")]
    pub strict_erase: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_should_require_device_and_firmware() {
        assert!(Opts::from_iter_safe(&["upy-flash"]).is_err());
        assert!(Opts::from_iter_safe(&["upy-flash", "/dev/ttyUSB0"]).is_err());
        assert!(Opts::from_iter_safe(&["upy-flash", "/dev/ttyUSB0", "a.bin", "b.bin"]).is_err());
    }

    #[test]
    fn it_should_reject_a_zero_baud_rate() {
        let args = &["upy-flash", "-b", "0", "/dev/ttyUSB0", "app.bin"];

        assert!(Opts::from_iter_safe(args).is_err());
    }

    #[test]
    fn it_should_parse_options() {
        let args = &[
            "upy-flash",
            "--tool",
            "esptool",
            "--baud-rate",
            "115200",
            "--flash-mode",
            "QIO",
            "--strict-erase",
            "/dev/ttyUSB0",
            "app.bin",
        ];
        let opts = Opts::from_iter_safe(args).unwrap();

        assert_eq!(opts.device, "/dev/ttyUSB0");
        assert_eq!(opts.firmware, PathBuf::from("app.bin"));
        assert_eq!(opts.tool, "esptool");
        assert_eq!(opts.baud_rate, 115_200);
        assert_eq!(opts.flash_mode, FlashMode::Qio);
        assert!(opts.strict_erase);
    }
}
