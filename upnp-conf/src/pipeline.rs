//! One configuration commit: extract, verify, render, apply.
//!
//! Stages run strictly in order. An extraction or validation failure returns
//! before anything on disk or in the service manager is touched.

use std::path::PathBuf;

use config_tree::ConfigStore;
use thiserror::Error;
use tracing::info;

use crate::apply::{apply, ApplyError};
use crate::environment::{Environment, EnvironmentError};
use crate::extract::{get_config, ExtractError, BASE_PATH};
use crate::render::{generate, RenderError, DEFAULT_CONFIG_FILE};
use crate::service::{ServiceControl, DEFAULT_UNIT};
use crate::settings::UpnpConfig;
use crate::verify::{verify, ValidationError, VerifyError};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Extract(#[from] ExtractError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Environment(#[from] EnvironmentError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Apply(#[from] ApplyError),
}

impl From<VerifyError> for Error {
    fn from(err: VerifyError) -> Self {
        match err {
            VerifyError::Invalid(err) => Error::Validation(err),
            VerifyError::Environment(err) => Error::Environment(err),
        }
    }
}

/// Where the feature lives in the config tree and what it controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    pub base_path: Vec<String>,
    pub config_file: PathBuf,
    pub unit: String,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            base_path: BASE_PATH.iter().map(|s| (*s).to_string()).collect(),
            config_file: PathBuf::from(DEFAULT_CONFIG_FILE),
            unit: DEFAULT_UNIT.to_string(),
        }
    }
}

impl RunOptions {
    fn base_path(&self) -> Vec<&str> {
        self.base_path.iter().map(String::as_str).collect()
    }
}

/// Extract and verify without side effects.
pub fn prepare<S, E>(store: &S, env: &E, opts: &RunOptions) -> Result<UpnpConfig, Error>
where
    S: ConfigStore + ?Sized,
    E: Environment + ?Sized,
{
    let config = get_config(store, &opts.base_path(), env)?;
    verify(&config, env)?;
    Ok(config)
}

/// Run the whole pipeline and return the settings that were applied.
pub fn run<S, E, C>(
    store: &S,
    env: &E,
    service: &C,
    opts: &RunOptions,
) -> Result<UpnpConfig, Error>
where
    S: ConfigStore + ?Sized,
    E: Environment + ?Sized,
    C: ServiceControl + ?Sized,
{
    let config = prepare(store, env, opts)?;
    generate(&config, &opts.config_file)?;
    apply(&config, service, &opts.unit, &opts.config_file)?;
    info!(
        unit = %opts.unit,
        enabled = config.is_present(),
        "upnp configuration applied"
    );
    Ok(config)
}
