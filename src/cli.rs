use crow::{run_tokens, Config, DispatchError};
use std::ffi::OsString;
use std::process::ExitCode;

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub(crate) fn print_help() {
    println!(
        r#"crow-{} - inline command expansion

USAGE:
    crow [options] expansion

OPTIONS:
    -c                      Run expansion as a shell command ($SHELL -c)
    -q                      Pass arguments as one joined argument instead of running them
    -n                      Expect newline as a delimiter (default)
    -0                      Expect NUL instead of newline as a delimiter
    --                      Stop option processing

EXPANSION:
    Any command contained within delimiters like these -[ example ]-
    will be executed and each line of its standard output turned into
    a single argument. The result is executed, with the first word as
    the command. Expansions nest. Spaces are required around -[ and ]-
    or they are taken literally. Options may be used within expansions.

ENVIRONMENT:
    SHELL                   Shell used by -c
    CROW_LOG                Log filter, e.g. crow=debug

EXAMPLES:
    Play all ogg files:
        crow vlc -[ locate .ogg ]-
    Play all ogg files, even if some have newlines in their names:
        crow vlc -[ -0 locate -0 .ogg ]-
"#,
        VERSION
    );
}

/// Install a stderr tracing subscriber when a log filter is configured
pub(crate) fn init_tracing(config: &Config) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let Some(directives) = &config.log_filter else {
        return;
    };
    let filter = EnvFilter::new(directives);
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_level(true),
        )
        .with(filter)
        .init();
}

/// Expand and run the command line, translating the outcome to an exit code
pub(crate) fn run(tokens: &[OsString], config: &Config) -> ExitCode {
    match run_tokens(tokens, config) {
        Ok(status) => to_exit_code(status),
        Err(e @ DispatchError::Unmatched { .. }) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("crow: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn to_exit_code(status: i32) -> ExitCode {
    if status == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(status.clamp(1, 255) as u8)
    }
}
