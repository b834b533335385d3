//! crow - inline command expansion
//!
//! Usage:
//!   crow cmd args -[ nested cmd ]- more args

mod cli;

use crow::Config;
use std::env;
use std::ffi::OsString;
use std::process::ExitCode;

fn main() -> ExitCode {
    let config = Config::from_env();
    cli::init_tracing(&config);

    let tokens: Vec<OsString> = env::args_os().skip(1).collect();
    if tokens.is_empty() {
        cli::print_help();
        return ExitCode::SUCCESS;
    }

    cli::run(&tokens, &config)
}
