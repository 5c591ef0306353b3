//! Configuration tree loading and key-path queries used by service
//! configuration tools.

pub mod parser;
pub mod store;
pub mod tree;

pub use parser::{parse, parse_file, ParseError};
pub use store::{ConfigStore, ScopedStore};
pub use tree::ConfigNode;
