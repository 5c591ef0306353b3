use std::path::PathBuf;

use clap::{Args, Parser, ValueEnum};
use upnp_conf::render::DEFAULT_CONFIG_FILE;
use upnp_conf::service::{DEFAULT_SYSTEMCTL, DEFAULT_UNIT};

#[derive(Parser, Debug)]
#[command(name = "upnp-conf")]
#[command(about = "Render miniupnpd configuration and reconcile the UPnP service")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Validate, write miniupnpd.conf and restart or stop the service.
    Apply(ApplyArgs),
    /// Validate the UPnP settings without changing anything.
    Verify(VerifyArgs),
    /// Print the configuration that apply would write.
    Show(ShowArgs),
}

#[derive(Args, Debug)]
pub struct SourceArgs {
    /// Configuration tree (XML) to read `service upnp` from.
    pub config: PathBuf,
    /// Interface table (TOML) to use instead of the live system interfaces.
    #[arg(long)]
    pub interfaces: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct ApplyArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    /// Path of the rendered miniupnpd configuration.
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    pub output: PathBuf,
    /// Service unit to restart or stop.
    #[arg(long, default_value = DEFAULT_UNIT)]
    pub unit: String,
    /// Service manager executable.
    #[arg(long, default_value = DEFAULT_SYSTEMCTL)]
    pub systemctl: PathBuf,
}

#[derive(Parser, Debug)]
pub struct VerifyArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}

#[derive(Parser, Debug)]
pub struct ShowArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
