//! Logger setup.
//!
//! The terminal interface owns stdout and stderr while it runs, so interactive sessions only log
//! when a file is given. Headless runs log to stderr. The filter is read from `RUST_LOG` and
//! defaults to `info`.

use std::fs::File;

use color_eyre::eyre::{Result, WrapErr as _};
use env_logger::{Builder, Env, Target};

use crate::config::Config;

/// Where log records end up.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Destination {
    /// Records are dropped.
    Disabled,
    /// Records go to standard error.
    Stderr,
    /// Records are appended to the configured file.
    File,
}

/// Chooses the log destination for a configuration.
pub(crate) const fn destination(config: &Config) -> Destination {
    if config.log_file.is_some() {
        Destination::File
    } else if config.headless {
        Destination::Stderr
    } else {
        Destination::Disabled
    }
}

/// Installs the global logger according to the configuration.
///
/// # Errors
///
/// Fails when the log file cannot be created or a logger is already installed.
pub fn init(config: &Config) -> Result<()> {
    let mut builder = Builder::from_env(Env::default().default_filter_or("info"));
    let _ = builder.format_timestamp_millis();

    match (destination(config), &config.log_file) {
        (Destination::File, Some(path)) => {
            let file = File::create(path)
                .wrap_err_with(|| format!("failed to create log file {}", path.display()))?;
            let _ = builder.target(Target::Pipe(Box::new(file)));
        }
        (Destination::Stderr, _) => {
            let _ = builder.target(Target::Stderr);
        }
        (Destination::Disabled | Destination::File, _) => return Ok(()),
    }

    builder
        .try_init()
        .wrap_err("failed to install the logger")
}
