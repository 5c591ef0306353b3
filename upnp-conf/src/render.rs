//! miniupnpd configuration rendering.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::settings::{FeatureSettings, UpnpConfig};

pub const DEFAULT_CONFIG_FILE: &str = "/etc/miniupnpd/miniupnpd.conf";

#[derive(Debug, Error)]
#[error("failed to write {}: {source}", path.display())]
pub struct RenderError {
    pub path: PathBuf,
    pub source: std::io::Error,
}

/// Write the daemon configuration for `config` to `path`.
///
/// `Absent` writes nothing; removing a stale file is left to
/// [`crate::apply::apply`]. Existing files are overwritten.
pub fn generate(config: &UpnpConfig, path: &Path) -> Result<(), RenderError> {
    let UpnpConfig::Present(upnp) = config else {
        return Ok(());
    };

    let wrap = |source: std::io::Error| RenderError {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(wrap)?;
    }
    fs::write(path, render_config(upnp)).map_err(wrap)?;
    info!(path = %path.display(), "wrote miniupnpd configuration");
    Ok(())
}

/// Render `upnp` in miniupnpd.conf syntax.
///
/// Output depends only on the settings; two renders of equal settings differ
/// at most in the `uuid=` line.
pub fn render_config(upnp: &FeatureSettings) -> String {
    let mut out = String::new();
    out.push_str("### Autogenerated by upnp-conf ###\n\n");
    out.push_str("# WAN network interface\n");
    if let Some(outbound) = &upnp.outbound_interface {
        out.push_str(&format!("ext_ifname={outbound}\n"));
    }
    out.push_str("\n# LAN networks to listen on\n");
    for network in &upnp.listen_networks {
        out.push_str(&format!("listening_ip={network}\n"));
    }
    out.push_str("\n# HTTP port for descriptions and SOAP, 0 selects a free port\n");
    out.push_str("port=0\n\n");
    out.push_str("enable_upnp=yes\n");
    out.push_str("enable_natpmp=yes\n\n");
    out.push_str("# only allow mappings to the requesting client's address\n");
    out.push_str(&format!("secure_mode={}\n\n", yes_no(upnp.secure_mode)));
    out.push_str("# report system uptime instead of daemon uptime\n");
    out.push_str(&format!(
        "system_uptime={}\n\n",
        yes_no(upnp.report_system_uptime)
    ));
    out.push_str("# seconds between SSDP announcements\n");
    out.push_str(&format!(
        "notify_interval={}\n\n",
        upnp.notify_interval_seconds
    ));
    out.push_str("# seconds between removal of unused port mappings\n");
    out.push_str(&format!(
        "clean_ruleset_interval={}\n\n",
        upnp.clean_ruleset_interval_seconds
    ));
    out.push_str(&format!("uuid={}\n\n", upnp.instance_id.hyphenated()));
    out.push_str("# deny everything not explicitly allowed above\n");
    out.push_str("deny 0-65535 0.0.0.0/0 0-65535\n");
    out
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}
