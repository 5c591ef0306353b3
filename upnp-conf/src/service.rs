//! Service manager control.

use std::fmt::{self, Display, Formatter};
use std::path::PathBuf;
use std::process::Command;

use thiserror::Error;
use tracing::{debug, info};

pub const DEFAULT_UNIT: &str = "miniupnpd.service";
pub const DEFAULT_SYSTEMCTL: &str = "systemctl";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceAction {
    Start,
    Stop,
    Restart,
}

impl ServiceAction {
    pub fn as_str(self) -> &'static str {
        match self {
            ServiceAction::Start => "start",
            ServiceAction::Stop => "stop",
            ServiceAction::Restart => "restart",
        }
    }
}

impl Display for ServiceAction {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },
    #[error("{action} {unit} failed ({status}): {stderr}")]
    Failed {
        unit: String,
        action: ServiceAction,
        status: String,
        stderr: String,
    },
}

pub trait ServiceControl {
    fn invoke(&self, unit: &str, action: ServiceAction) -> Result<(), ServiceError>;
}

/// Runs `systemctl <action> <unit>` and waits for it to finish.
#[derive(Debug, Clone)]
pub struct Systemctl {
    program: PathBuf,
}

impl Systemctl {
    pub fn new() -> Self {
        Self::with_program(DEFAULT_SYSTEMCTL)
    }

    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for Systemctl {
    fn default() -> Self {
        Self::new()
    }
}

impl ServiceControl for Systemctl {
    fn invoke(&self, unit: &str, action: ServiceAction) -> Result<(), ServiceError> {
        debug!(program = %self.program.display(), %unit, %action, "invoking service manager");
        let output = Command::new(&self.program)
            .arg(action.as_str())
            .arg(unit)
            .output()
            .map_err(|source| ServiceError::Spawn {
                program: self.program.display().to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err(ServiceError::Failed {
                unit: unit.to_string(),
                action,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        info!(%unit, %action, "service action completed");
        Ok(())
    }
}
