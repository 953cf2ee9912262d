//! Command relay.
//!
//! Writes a command token to the control file, then optionally replaces
//! the current process image with another executable.

use std::ffi::{CString, OsStr, OsString};
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};

use ctlrelay_config::{log_exec_debug, log_relay_debug};
use nix::errno::Errno;

#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("failed to open control file {}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write command to control file {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("exec target {0:?} contains a NUL byte")]
    InvalidTarget(OsString),
    #[error("failed to exec {target:?}")]
    Exec {
        target: OsString,
        #[source]
        source: Errno,
    },
}

/// Positional arguments of one invocation. Anything past the exec target
/// has already been dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Invocation {
    pub command: Option<OsString>,
    pub exec_target: Option<OsString>,
}

/// Writer for a single control file.
#[derive(Debug, Clone)]
pub struct Relay {
    control_path: PathBuf,
}

impl Relay {
    pub fn new(control_path: impl Into<PathBuf>) -> Self {
        Self {
            control_path: control_path.into(),
        }
    }

    pub fn control_path(&self) -> &Path {
        &self.control_path
    }

    /// Write `command` as raw bytes, no terminator. The file is never
    /// created; the handle is closed on return whether or not the write
    /// succeeded.
    pub fn issue(&self, command: &OsStr) -> Result<(), RelayError> {
        let mut file = OpenOptions::new()
            .write(true)
            .truncate(true)
            .open(&self.control_path)
            .map_err(|source| RelayError::Open {
                path: self.control_path.clone(),
                source,
            })?;

        file.write_all(command.as_bytes())
            .map_err(|source| RelayError::Write {
                path: self.control_path.clone(),
                source,
            })?;

        log_relay_debug!(
            "Command written",
            path = tracing::field::display(self.control_path.display()),
            bytes = command.len()
        );
        Ok(())
    }
}

/// Replace the process image with `target`, called with a single empty
/// argument. No `PATH` lookup; environment and descriptors are inherited.
/// Only returns on failure.
pub fn exec_replace(target: &OsStr) -> RelayError {
    let path = match CString::new(target.as_bytes()) {
        Ok(path) => path,
        Err(_) => return RelayError::InvalidTarget(target.to_owned()),
    };
    let argv = [CString::default()];

    log_exec_debug!("Replacing process image", target = tracing::field::debug(target));

    match nix::unistd::execv(&path, &argv) {
        Ok(never) => match never {},
        Err(source) => RelayError::Exec {
            target: target.to_owned(),
            source,
        },
    }
}

/// Run both steps in order. Returns `Ok` only when no exec was requested.
pub fn run(invocation: &Invocation, relay: &Relay) -> Result<(), RelayError> {
    let Some(command) = &invocation.command else {
        log_relay_debug!("No command given");
        return Ok(());
    };

    relay.issue(command)?;

    match &invocation.exec_target {
        Some(target) => Err(exec_replace(target)),
        None => Ok(()),
    }
}
