use std::ffi::OsString;
use std::{env, process};

use log::debug;
use structopt::clap::ErrorKind;
use structopt::StructOpt;
use upy_flash::{ErasePolicy, EspTool, Flasher, EXIT_FAILURE};

mod cli;

/// The program name shown in the usage line when argv[0] is missing
const DEFAULT_PROGRAM_NAME: &str = "upy-flash";

fn usage(program: &str) -> String {
    format!("Usage: {} [OPTIONS] <device> <firmware-file>", program)
}

/// Parses the command-line arguments, exiting with `EXIT_FAILURE` and a usage line on error
fn parse_args(args: Vec<OsString>) -> cli::Opts {
    let program = args
        .first()
        .map(|arg| arg.to_string_lossy().into_owned())
        .unwrap_or_else(|| DEFAULT_PROGRAM_NAME.to_owned());

    match cli::Opts::from_iter_safe(args) {
        Ok(opts) => opts,
        Err(err) => match err.kind {
            ErrorKind::HelpDisplayed | ErrorKind::VersionDisplayed => err.exit(),
            _ => {
                debug!("{:?}: {}", err.kind, err.message);

                if let Some(reason) = err.message.lines().next() {
                    eprintln!("{}", reason);
                }
                eprintln!("{}", usage(&program));

                process::exit(EXIT_FAILURE);
            }
        },
    }
}

fn flash(opts: &cli::Opts) -> Result<(), upy_flash::Error> {
    let tool = EspTool::new(&opts.tool)
        .baud_rate(opts.baud_rate)
        .flash_mode(opts.flash_mode);
    let erase_policy = if opts.strict_erase {
        ErasePolicy::Fatal
    } else {
        ErasePolicy::Ignore
    };

    Flasher::new(tool)
        .erase_policy(erase_policy)
        .flash(&opts.device, &opts.firmware)
}

fn main() {
    // Create a logger with a timestamp, controlled through RUST_LOG
    pretty_env_logger::init_timed();

    let opts = parse_args(env::args_os().collect());

    debug!("{:?}", opts);

    match flash(&opts) {
        Ok(()) => {
            println!(
                "Firmware {} was successfully written to {}",
                opts.firmware.display(),
                opts.device
            );
        }
        Err(err) => {
            eprintln!("Error: {}", err);

            process::exit(err.exit_code());
        }
    }
}
