//! # ctlrelay
//!
//! Writes a command token to a control file, then optionally replaces the
//! running process with another executable.

use std::ffi::OsString;

use anyhow::{Context, Result};
use clap::Parser;
use ctlrelay_config::logging::{init_logging, LogLevel};
use ctlrelay_config::{log_relay_debug, Config};

mod relay;

use relay::{Invocation, Relay};

/// Relay a command to a control file and optionally exec a program
#[derive(Parser)]
#[command(name = "ctlrelay")]
#[command(disable_help_flag = true, disable_version_flag = true)]
struct Cli {
    /// COMMAND, then EXEC_TARGET; anything later is ignored
    #[arg(raw = true, value_name = "ARGS")]
    args: Vec<OsString>,
}

impl Cli {
    /// Parse `argv` with every argument after the program name taken as a
    /// positional value, flag-shaped ones and `--` included.
    fn parse_verbatim<I>(argv: I) -> Self
    where
        I: IntoIterator<Item = OsString>,
    {
        let mut argv = argv.into_iter();
        let bin = argv.next().unwrap_or_else(|| OsString::from("ctlrelay"));
        Self::parse_from(
            std::iter::once(bin)
                .chain(std::iter::once(OsString::from("--")))
                .chain(argv),
        )
    }

    fn into_invocation(self) -> Invocation {
        let mut args = self.args.into_iter();
        let invocation = Invocation {
            command: args.next(),
            exec_target: args.next(),
        };
        let ignored = args.count();
        if ignored > 0 {
            log_relay_debug!("Ignoring extra arguments", count = ignored);
        }
        invocation
    }
}

fn main() -> Result<()> {
    init_logging(LogLevel::Warn);

    let invocation = Cli::parse_verbatim(std::env::args_os()).into_invocation();
    if invocation.command.is_none() {
        return Ok(());
    }

    let config = Config::load().context("Failed to load configuration")?;
    let relay = Relay::new(config.control.path);
    log_relay_debug!(
        "Using control file",
        path = tracing::field::display(relay.control_path().display())
    );

    relay::run(&invocation, &relay).map_err(|err| {
        log_relay_debug!("Relay aborted", error = tracing::field::display(&err));
        anyhow::Error::new(err)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invocation(args: &[&str]) -> Invocation {
        let argv = std::iter::once("ctlrelay")
            .chain(args.iter().copied())
            .map(OsString::from);
        Cli::parse_verbatim(argv).into_invocation()
    }

    fn expect(command: Option<&str>, exec_target: Option<&str>) -> Invocation {
        Invocation {
            command: command.map(OsString::from),
            exec_target: exec_target.map(OsString::from),
        }
    }

    #[test]
    fn test_no_arguments() {
        assert_eq!(invocation(&[]), Invocation::default());
    }

    #[test]
    fn test_help_and_version_are_commands() {
        for flag in ["--help", "-h", "--version", "-V"] {
            assert_eq!(invocation(&[flag]), expect(Some(flag), None));
        }
    }

    #[test]
    fn test_flag_shaped_exec_target() {
        assert_eq!(
            invocation(&["boost", "--help"]),
            expect(Some("boost"), Some("--help"))
        );
    }

    #[test]
    fn test_double_dash_is_a_command() {
        assert_eq!(invocation(&["--", "boost"]), expect(Some("--"), Some("boost")));
        assert_eq!(
            invocation(&["boost", "--", "x"]),
            expect(Some("boost"), Some("--"))
        );
    }

    #[test]
    fn test_empty_command_is_kept() {
        assert_eq!(invocation(&[""]), expect(Some(""), None));
    }

    #[test]
    fn test_extra_arguments_are_dropped() {
        assert_eq!(
            invocation(&["boost", "/bin/true", "a", "--b"]),
            expect(Some("boost"), Some("/bin/true"))
        );
    }
}
