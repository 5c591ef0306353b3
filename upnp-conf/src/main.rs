use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use config_tree::{parse_file, ConfigNode};
use tracing_subscriber::EnvFilter;
use upnp_conf::environment::{Environment, StaticEnvironment, SystemEnvironment};

mod apply_cmd;
mod cli;
mod show_cmd;
mod verify_cmd;

use cli::{Cli, Command, SourceArgs};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Apply(args) => apply_cmd::run_apply(args),
        Command::Verify(args) => verify_cmd::run_verify(args),
        Command::Show(args) => show_cmd::run_show(args),
    }
}

/// Log to stderr so `apply` stays silent on stdout.
fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

pub(crate) fn load_tree(path: &Path) -> Result<ConfigNode> {
    parse_file(path).with_context(|| format!("failed to parse {}", path.display()))
}

pub(crate) fn load_environment(source: &SourceArgs) -> Result<Box<dyn Environment>> {
    match &source.interfaces {
        Some(path) => {
            let env = StaticEnvironment::load(path)?;
            tracing::debug!(path = %path.display(), "using static interface table");
            Ok(Box::new(env))
        }
        None => Ok(Box::new(SystemEnvironment)),
    }
}
