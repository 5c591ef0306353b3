use anyhow::Result;
use upnp_conf::pipeline::{run, RunOptions};
use upnp_conf::service::Systemctl;

use crate::cli::ApplyArgs;
use crate::{load_environment, load_tree};

pub fn run_apply(args: ApplyArgs) -> Result<()> {
    let tree = load_tree(&args.source.config)?;
    let env = load_environment(&args.source)?;
    let service = Systemctl::with_program(&args.systemctl);
    let opts = RunOptions {
        config_file: args.output,
        unit: args.unit,
        ..RunOptions::default()
    };

    run(&tree, &*env, &service, &opts)?;
    Ok(())
}
