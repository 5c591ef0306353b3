//! Settings validation against the running system.
//!
//! Checks run in a fixed order and stop at the first failure:
//!
//! 1. `outbound-interface` is set
//! 2. the outbound interface exists
//! 3. at least one `listen-on` interface is set
//! 4. every listen interface exists

use thiserror::Error;
use tracing::debug;

use crate::environment::{Environment, EnvironmentError};
use crate::settings::UpnpConfig;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Must define the outbound-interface!")]
    MissingOutboundInterface,
    #[error("outbound-interface \"{0}\" does not exist")]
    UnknownOutboundInterface(String),
    #[error("Must define at least 1 listen-on interface!")]
    NoListenInterfaces,
    #[error("listen-on interface \"{0}\" does not exist")]
    UnknownListenInterface(String),
}

#[derive(Debug, Error)]
pub enum VerifyError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error(transparent)]
    Environment(#[from] EnvironmentError),
}

/// Check `config` for completeness and that every referenced interface exists.
///
/// `Absent` always passes. No state is changed, so this is safe to repeat.
pub fn verify<E>(config: &UpnpConfig, env: &E) -> Result<(), VerifyError>
where
    E: Environment + ?Sized,
{
    let UpnpConfig::Present(upnp) = config else {
        return Ok(());
    };

    let outbound = upnp
        .outbound_interface
        .as_deref()
        .ok_or(ValidationError::MissingOutboundInterface)?;

    let present = env.interfaces()?;
    if !present.contains(outbound) {
        return Err(ValidationError::UnknownOutboundInterface(outbound.to_string()).into());
    }

    if upnp.listen_interfaces.is_empty() {
        return Err(ValidationError::NoListenInterfaces.into());
    }

    if let Some(missing) = upnp
        .listen_interfaces
        .iter()
        .find(|interface| !present.contains(interface.as_str()))
    {
        return Err(ValidationError::UnknownListenInterface(missing.clone()).into());
    }

    debug!("upnp settings verified");
    Ok(())
}
