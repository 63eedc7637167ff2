use std::env::args_os;
use std::process::ExitCode;

use bilinear_resampler::{resize_netpbm, CLIParser};

fn main() -> ExitCode {
    let mut cli_parser = CLIParser::default();
    let arguments = cli_parser.parse(args_os());
    match resize_netpbm(&arguments) {
        Ok(_) => {
            println!("Resize successful");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Resize failed because of: {}", e);
            ExitCode::FAILURE
        }
    }
}
