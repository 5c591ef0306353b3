use anyhow::Result;
use upnp_conf::pipeline::{prepare, RunOptions};
use upnp_conf::render::render_config;
use upnp_conf::settings::UpnpConfig;

use crate::cli::{OutputFormat, ShowArgs};
use crate::{load_environment, load_tree};

pub fn run_show(args: ShowArgs) -> Result<()> {
    let tree = load_tree(&args.source.config)?;
    let env = load_environment(&args.source)?;

    let config = prepare(&tree, &*env, &RunOptions::default())?;
    let settings = match &config {
        UpnpConfig::Present(upnp) => Some(upnp),
        UpnpConfig::Absent => None,
    };

    match args.format {
        OutputFormat::Text => match settings {
            Some(upnp) => print!("{}", render_config(upnp)),
            None => println!("# upnp not configured"),
        },
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&settings)?),
    }
    Ok(())
}
