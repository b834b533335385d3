//! Runtime configuration read from the environment
//!
//! - `SHELL`    - shell used by `-c` (unset disables `-c`)
//! - `CROW_LOG` - tracing filter, e.g. `crow=debug` (unset disables logging)

use std::env;
use std::ffi::OsString;

/// Environment variable naming the shell for `-c`
pub const SHELL_VAR: &str = "SHELL";

/// Environment variable holding the log filter
pub const LOG_VAR: &str = "CROW_LOG";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Shell program appended by `-c`
    pub shell: Option<OsString>,
    /// Tracing filter directive
    pub log_filter: Option<String>,
}

impl Config {
    /// Capture configuration from the process environment
    pub fn from_env() -> Self {
        Config {
            shell: env::var_os(SHELL_VAR),
            log_filter: env::var(LOG_VAR).ok(),
        }
    }

    /// Configuration with the given shell and no logging
    pub fn with_shell(shell: impl Into<OsString>) -> Self {
        Config {
            shell: Some(shell.into()),
            log_filter: None,
        }
    }
}
