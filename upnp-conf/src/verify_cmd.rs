use anyhow::Result;
use upnp_conf::pipeline::{prepare, RunOptions};
use upnp_conf::settings::UpnpConfig;

use crate::cli::VerifyArgs;
use crate::{load_environment, load_tree};

pub fn run_verify(args: VerifyArgs) -> Result<()> {
    let tree = load_tree(&args.source.config)?;
    let env = load_environment(&args.source)?;

    let config = prepare(&tree, &*env, &RunOptions::default())?;
    match config {
        UpnpConfig::Present(upnp) => println!(
            "result ok upnp=enabled outbound={} listen={}",
            upnp.outbound_interface.as_deref().unwrap_or("none"),
            upnp.listen_interfaces.join(",")
        ),
        UpnpConfig::Absent => println!("result ok upnp=absent"),
    }
    Ok(())
}
