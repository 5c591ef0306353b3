//! Service reconciliation.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::service::{ServiceAction, ServiceControl, ServiceError};
use crate::settings::UpnpConfig;

#[derive(Debug, Error)]
pub enum ApplyError {
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error("failed to remove {}: {source}", path.display())]
    Remove {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Bring `unit` in line with `config`.
///
/// `Present` restarts the unit so the freshly rendered file is picked up.
/// `Absent` stops the unit and deletes `config_file`; a file that is already
/// gone is not an error.
pub fn apply<C>(
    config: &UpnpConfig,
    service: &C,
    unit: &str,
    config_file: &Path,
) -> Result<(), ApplyError>
where
    C: ServiceControl + ?Sized,
{
    match config {
        UpnpConfig::Present(_) => {
            service.invoke(unit, ServiceAction::Restart)?;
        }
        UpnpConfig::Absent => {
            service.invoke(unit, ServiceAction::Stop)?;
            remove_if_exists(config_file)?;
        }
    }
    Ok(())
}

fn remove_if_exists(path: &Path) -> Result<(), ApplyError> {
    match fs::remove_file(path) {
        Ok(()) => {
            info!(path = %path.display(), "removed miniupnpd configuration");
            Ok(())
        }
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
        Err(source) => Err(ApplyError::Remove {
            path: path.to_path_buf(),
            source,
        }),
    }
}
