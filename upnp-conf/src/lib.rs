//! UPnP IGD service configuration for a router config tree.
//!
//! Turns the `service upnp` subtree into a miniupnpd configuration file and
//! keeps `miniupnpd.service` in step with it.
//!
//! # Pipeline
//!
//! Each commit runs four stages in order, passing [`settings::UpnpConfig`]
//! from one to the next:
//!
//! 1. [`extract`]: read the subtree and live interface addresses
//! 2. [`verify`]: require an existing outbound interface and at least one
//!    existing listen interface
//! 3. [`render`]: write `miniupnpd.conf`
//! 4. [`apply`]: restart the daemon, or stop it and delete the file when the
//!    subtree is gone
//!
//! [`pipeline::run`] drives all four and stops at the first error.
//!
//! # Collaborators
//!
//! The config tree is read through [`config_tree::ConfigStore`], interfaces
//! through [`environment::Environment`], and the service manager through
//! [`service::ServiceControl`]. Each has a production implementation and can
//! be replaced in tests.
//!
//! # Examples
//!
//! ```ignore
//! use config_tree::parse_file;
//! use upnp_conf::environment::SystemEnvironment;
//! use upnp_conf::pipeline::{run, RunOptions};
//! use upnp_conf::service::Systemctl;
//!
//! let tree = parse_file("config.xml".as_ref())?;
//! run(&tree, &SystemEnvironment, &Systemctl::new(), &RunOptions::default())?;
//! ```

pub mod apply;
pub mod environment;
pub mod extract;
pub mod pipeline;
pub mod render;
pub mod service;
pub mod settings;
pub mod verify;
